//! Face-set playback of a command stream.
//!
//! The decoder's view of a mesh is simpler than the encoder's: a set of
//! vertices and a set of oriented faces. Playing a level's records forward
//! against the decimated mesh reconstructs the mesh that level started from,
//! so playing all levels newest-first reconstructs the original input. This
//! is what the round-trip tests and the `verify` command use.

use crate::command::Command;
use crate::mesh::math::Point;
use crate::mesh::{TriangleMesh, VertexId};

use std::collections::{HashMap, HashSet};
use std::fmt;

/// A face keyed by its cyclic order: `(a, b, c)`, `(b, c, a)` and
/// `(c, a, b)` are the same face, `(a, c, b)` is not.
fn normalize(face: [VertexId; 3]) -> [VertexId; 3] {
    let [a, b, c] = face;
    if a <= b && a <= c {
        [a, b, c]
    } else if b <= a && b <= c {
        [b, c, a]
    } else {
        [c, a, b]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplayError {
    /// A `DeleteFace` record matched no present face.
    UnknownFace(VertexId, VertexId, VertexId),
    /// A `Face` record would duplicate a present face.
    DuplicateFace(VertexId, VertexId, VertexId),
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::UnknownFace(a, b, c) => {
                write!(f, "No face ({:?}, {:?}, {:?}) to delete", a, b, c)
            }
            ReplayError::DuplicateFace(a, b, c) => {
                write!(f, "Face ({:?}, {:?}, {:?}) is already present", a, b, c)
            }
        }
    }
}

impl std::error::Error for ReplayError {}

/// The decoder-side mesh state: vertex positions and an oriented face set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FaceSet {
    vertices: HashMap<VertexId, Point>,
    faces: HashSet<[VertexId; 3]>,
}

impl FaceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extracts the active vertices and faces of a mesh.
    pub fn from_mesh(mesh: &TriangleMesh) -> Self {
        let mut set = FaceSet::new();
        for v in mesh.active_vertices() {
            set.vertices.insert(v, mesh.position(v));
        }
        for (gate, target) in mesh.gates() {
            set.faces.insert(normalize([gate.from, gate.to, target]));
        }
        set
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn contains_face(&self, a: VertexId, b: VertexId, c: VertexId) -> bool {
        self.faces.contains(&normalize([a, b, c]))
    }

    /// Plays a record slice forward.
    pub fn apply(&mut self, commands: &[Command]) -> Result<(), ReplayError> {
        for command in commands {
            match *command {
                Command::Vertex { vertex, position } => {
                    self.vertices.insert(vertex, position);
                }
                Command::Face { vertex, a, b } => {
                    if !self.faces.insert(normalize([vertex, a, b])) {
                        return Err(ReplayError::DuplicateFace(vertex, a, b));
                    }
                }
                Command::DeleteFace { a, b, c } => {
                    if !self.faces.remove(&normalize([a, b, c]))
                        // The progressive format matches `df` records by
                        // vertex set, so accept the flipped orientation too.
                        && !self.faces.remove(&normalize([a, c, b]))
                    {
                        return Err(ReplayError::UnknownFace(a, b, c));
                    }
                }
            }
        }
        Ok(())
    }
}
