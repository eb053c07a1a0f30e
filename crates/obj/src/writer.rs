//! OBJ and OBJA serialization.

use maille_decimation::{Command, LevelCommands};
use maille_mesh::{TriangleMesh, VertexId};

use std::collections::{BTreeSet, HashMap};
use std::io::{self, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObjaError {
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A record references a vertex that is neither in the residual mesh
    /// nor re-introduced by any level.
    #[error("A record references the unknown vertex {0:?}.")]
    UnknownVertex(VertexId),
}

/// Keeps a face's orientation but fixes its rotation, for deduplication and
/// deterministic output order.
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

fn sorted(mut face: [VertexId; 3]) -> [VertexId; 3] {
    face.sort();
    face
}

/// The active faces of a mesh, one entry each, in sorted order.
fn active_faces(mesh: &TriangleMesh) -> BTreeSet<[VertexId; 3]> {
    mesh.gates()
        .map(|(gate, target)| normalize([gate.from, gate.to, target]))
        .collect()
}

/// Writes the active mesh as a plain OBJ document.
///
/// Active vertices are renumbered densely in id order; faces come out
/// deduplicated from the gate table in sorted order, so equal meshes produce
/// byte-identical documents.
pub fn write_obj<W: Write>(mesh: &TriangleMesh, output: &mut W) -> io::Result<()> {
    let mut renumber = HashMap::new();
    for v in mesh.active_vertices() {
        renumber.insert(v, renumber.len() + 1);
        let p = mesh.position(v);
        writeln!(output, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for face in active_faces(mesh) {
        writeln!(
            output,
            "f {} {} {}",
            renumber[&face[0]], renumber[&face[1]], renumber[&face[2]]
        )?;
    }
    Ok(())
}

enum ObjaLine {
    Vertex(VertexId, maille_mesh::math::Point),
    Face([VertexId; 3]),
    DeleteFace([VertexId; 3]),
}

/// Writes a finished run as a progressive OBJA document.
///
/// The stream starts with the residual mesh, followed by the levels newest
/// to oldest, each level's records in emission order. Vertex references are
/// renumbered to the position of their `v` line in the file, and `df`
/// records become `df n` where `n` is the 1-based ordinal of the matching
/// `f` line (vertex-set match, last occurrence wins).
pub fn write_obja<W: Write>(
    residual: &TriangleMesh,
    levels: &[LevelCommands],
    output: &mut W,
) -> Result<(), ObjaError> {
    // Assemble the final line sequence and the vertex numbering.
    let mut lines = Vec::new();
    let mut renumber: HashMap<VertexId, usize> = HashMap::new();
    for v in residual.active_vertices() {
        renumber.insert(v, renumber.len() + 1);
        lines.push(ObjaLine::Vertex(v, residual.position(v)));
    }
    for face in active_faces(residual) {
        lines.push(ObjaLine::Face(face));
    }
    for level in levels.iter().rev() {
        for command in &level.commands {
            match *command {
                Command::Vertex { vertex, position } => {
                    renumber.insert(vertex, renumber.len() + 1);
                    lines.push(ObjaLine::Vertex(vertex, position));
                }
                Command::Face { vertex, a, b } => lines.push(ObjaLine::Face([vertex, a, b])),
                Command::DeleteFace { a, b, c } => {
                    lines.push(ObjaLine::DeleteFace([a, b, c]))
                }
            }
        }
    }

    let mut ordinals: HashMap<[VertexId; 3], usize> = HashMap::new();
    let mut face_count = 0;
    for line in &lines {
        if let ObjaLine::Face(face) = line {
            face_count += 1;
            ordinals.insert(sorted(*face), face_count);
        }
    }

    for line in &lines {
        match line {
            ObjaLine::Vertex(_, p) => writeln!(output, "v {} {} {}", p.x, p.y, p.z)?,
            ObjaLine::Face(face) => {
                let a = resolve(&renumber, face[0])?;
                let b = resolve(&renumber, face[1])?;
                let c = resolve(&renumber, face[2])?;
                writeln!(output, "f {} {} {}", a, b, c)?;
            }
            ObjaLine::DeleteFace(face) => match ordinals.get(&sorted(*face)) {
                Some(ordinal) => writeln!(output, "df {}", ordinal)?,
                // The reference decoder drops delete records it cannot
                // match, so do the same here.
                None => log::warn!("dropping unmatched df record {:?}", face),
            },
        }
    }
    Ok(())
}

fn resolve(renumber: &HashMap<VertexId, usize>, v: VertexId) -> Result<usize, ObjaError> {
    renumber.get(&v).copied().ok_or(ObjaError::UnknownVertex(v))
}

#[cfg(test)]
mod tests {
    use super::{write_obj, write_obja};
    use crate::parser::parse_obj;
    use maille_decimation::replay::FaceSet;
    use maille_decimation::{DecimateOptions, Decimator};

    const OCTAHEDRON: &str = "\
v 1 0 0
v -1 0 0
v 0 1 0
v 0 -1 0
v 0 0 1
v 0 0 -1
f 1 3 5
f 3 2 5
f 2 4 5
f 4 1 5
f 3 1 6
f 2 3 6
f 4 2 6
f 1 4 6
";

    #[test]
    fn obj_round_trip() {
        let mesh = parse_obj(OCTAHEDRON).unwrap();
        let mut text = Vec::new();
        write_obj(&mesh, &mut text).unwrap();
        let reparsed = parse_obj(std::str::from_utf8(&text).unwrap()).unwrap();
        assert_eq!(FaceSet::from_mesh(&reparsed), FaceSet::from_mesh(&mesh));
    }

    #[test]
    fn obja_structure() {
        let mut mesh = parse_obj(OCTAHEDRON).unwrap();
        let options = DecimateOptions::seed(3).with_min_vertices(4);
        let levels = Decimator::new().simplify(&mut mesh, 1, &options).unwrap();
        assert_eq!(levels.len(), 1);

        let mut text = Vec::new();
        write_obja(&mesh, &levels, &mut text).unwrap();
        let text = String::from_utf8(text).unwrap();

        let total_faces = text.lines().filter(|l| l.starts_with("f ")).count();
        let mut v_count = 0;
        for line in text.lines() {
            let mut tokens = line.split_whitespace();
            match tokens.next() {
                Some("v") => {
                    v_count += 1;
                    assert_eq!(tokens.count(), 3);
                }
                Some("f") => {
                    for t in tokens {
                        let index: usize = t.parse().unwrap();
                        assert!(index >= 1 && index <= 6);
                    }
                }
                Some("df") => {
                    let ordinal: usize = tokens.next().unwrap().parse().unwrap();
                    assert!(ordinal >= 1 && ordinal <= total_faces);
                }
                other => panic!("unexpected line {:?}", other),
            }
        }
        // Every original vertex appears exactly once, in the residual block
        // or as a level record.
        assert_eq!(v_count, 6);
    }
}
