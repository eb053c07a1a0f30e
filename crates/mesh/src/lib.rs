#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]

//! Connectivity storage for closed oriented triangle meshes.
//!
//! The central type is [`TriangleMesh`](mesh/struct.TriangleMesh.html): an
//! arena of vertices indexed by [`VertexId`](struct.VertexId.html), plus a
//! table of directed half-edges ("gates") mapping each oriented edge of an
//! active face to the opposite vertex. For every active vertex the mesh also
//! maintains its *patch ring*, the cyclic counter-clockwise sequence of its
//! neighbors, and its *valence* (the number of incident active faces).
//!
//! This crate only stores and rewrites connectivity. The decimation passes
//! that consume it live in `maille_decimation`, and file I/O lives in
//! `maille_obj`. This crate is reexported in [maille](https://docs.rs/maille/).
//!
//! # Examples
//!
//! ```
//! use maille_mesh::MeshBuilder;
//! use maille_mesh::math::point;
//!
//! let mut builder = MeshBuilder::new();
//! let a = builder.vertex(point(0.0, 0.0, 0.0));
//! let b = builder.vertex(point(1.0, 0.0, 0.0));
//! let c = builder.vertex(point(0.0, 1.0, 0.0));
//! let d = builder.vertex(point(0.0, 0.0, 1.0));
//! builder.triangle(a, b, c);
//! builder.triangle(a, c, d);
//! builder.triangle(a, d, b);
//! builder.triangle(b, d, c);
//! let mesh = builder.build().unwrap();
//!
//! assert_eq!(mesh.face_count(), 4);
//! assert_eq!(mesh.valence(a), 3);
//! ```

pub mod builder;
pub mod mesh;

#[doc(inline)]
pub use crate::builder::MeshBuilder;
#[doc(inline)]
pub use crate::mesh::TriangleMesh;

use std::fmt;

pub mod math {
    //! f64 versions of the euclid types used everywhere. The pipeline is
    //! lossless, so positions are carried around untouched as `f64`.

    /// Alias for `euclid::default::Point3D<f64>`.
    pub type Point = euclid::default::Point3D<f64>;

    /// Shorthand for `Point::new`.
    #[inline]
    pub fn point(x: f64, y: f64, z: f64) -> Point {
        Point::new(x, y, z)
    }
}

/// A stable identifier for a vertex of the mesh.
///
/// Ids are dense indices into the mesh's vertex arena. They are never reused:
/// a retired vertex keeps its id, and vertices added by non-manifold fan
/// duplication get fresh ids at the end of the arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct VertexId(pub u32);

impl VertexId {
    pub const INVALID: VertexId = VertexId(u32::MAX);

    #[inline]
    pub fn to_usize(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn from_usize(v: usize) -> Self {
        VertexId(v as u32)
    }
}

impl From<u32> for VertexId {
    fn from(v: u32) -> Self {
        VertexId(v)
    }
}

impl From<VertexId> for u32 {
    fn from(v: VertexId) -> Self {
        v.0
    }
}

/// A directed half-edge.
///
/// For every active face `(a, b, c)` in counter-clockwise order the mesh
/// records the three gates `(a, b) -> c`, `(b, c) -> a` and `(c, a) -> b`,
/// each mapping to the vertex opposite the edge (the gate's *target*).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Gate {
    pub from: VertexId,
    pub to: VertexId,
}

impl Gate {
    #[inline]
    pub fn new(from: VertexId, to: VertexId) -> Self {
        Gate { from, to }
    }

    /// The same edge walked in the opposite direction.
    #[inline]
    pub fn reversed(self) -> Self {
        Gate {
            from: self.to,
            to: self.from,
        }
    }
}

/// Shorthand for `Gate::new`.
#[inline]
pub fn gate(from: VertexId, to: VertexId) -> Gate {
    Gate { from, to }
}

/// Errors produced while building or rewriting a mesh.
#[derive(Clone, Debug, PartialEq)]
pub enum MeshError {
    /// A face references a vertex that does not exist or is retired.
    InvalidVertex(VertexId),
    /// A face repeats one of its vertices.
    DegenerateFace(VertexId, VertexId, VertexId),
    /// Registering a face would overwrite an existing gate. With closed
    /// counter-clockwise input this means a flipped or duplicated face.
    DuplicateGate(Gate),
    /// A gate expected by a rewrite is not in the table.
    MissingGate(Gate),
    /// The incident edges of a vertex do not chain into cycles.
    OpenFan(VertexId),
    /// A ring operation did not find the neighbor it was given.
    NotInRing { vertex: VertexId, missing: VertexId },
    /// Inserting a face would require tearing an existing ring apart.
    NonManifoldRing(VertexId),
    /// Invariant check: a ring's length disagrees with the stored valence.
    RingValenceMismatch {
        vertex: VertexId,
        ring_len: usize,
        valence: u32,
    },
    /// Invariant check: a gate exists but its reverse does not.
    GateAsymmetry(Gate),
    /// Invariant check: a ring and the gate table disagree about a face.
    RingGateDisagreement { vertex: VertexId, gate: Gate },
    /// Invariant check: the valences do not add up to three per face.
    ValenceSum { total: u64, faces: usize },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::InvalidVertex(v) => {
                write!(f, "Reference to an invalid vertex {:?}", v)
            }
            MeshError::DegenerateFace(a, b, c) => {
                write!(f, "Degenerate face ({:?}, {:?}, {:?})", a, b, c)
            }
            MeshError::DuplicateGate(g) => {
                write!(f, "Gate {:?} -> {:?} is already registered", g.from, g.to)
            }
            MeshError::MissingGate(g) => {
                write!(f, "Gate {:?} -> {:?} is not registered", g.from, g.to)
            }
            MeshError::OpenFan(v) => {
                write!(f, "The faces incident to {:?} do not close into cycles", v)
            }
            MeshError::NotInRing { vertex, missing } => {
                write!(f, "{:?} is not in the ring of {:?}", missing, vertex)
            }
            MeshError::NonManifoldRing(v) => {
                write!(f, "Inserting the face would tear the ring of {:?}", v)
            }
            MeshError::RingValenceMismatch {
                vertex,
                ring_len,
                valence,
            } => write!(
                f,
                "Ring of {:?} has {} entries but valence {}",
                vertex, ring_len, valence
            ),
            MeshError::GateAsymmetry(g) => {
                write!(f, "Gate {:?} -> {:?} has no reverse gate", g.from, g.to)
            }
            MeshError::RingGateDisagreement { vertex, gate } => write!(
                f,
                "Ring of {:?} disagrees with gate {:?} -> {:?}",
                vertex, gate.from, gate.to
            ),
            MeshError::ValenceSum { total, faces } => write!(
                f,
                "Valences add up to {} for {} active faces",
                total, faces
            ),
        }
    }
}

impl std::error::Error for MeshError {}
