//! A line-oriented parser for the connectivity subset of Wavefront OBJ.

use maille_mesh::math::point;
use maille_mesh::{MeshBuilder, MeshError, TriangleMesh, VertexId};

use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ParseError {
    #[error("Line {line}: expected a number, got {src:?}.")]
    Number { src: String, line: usize },
    #[error("Line {line}: expected a vertex index, got {src:?}.")]
    Index { src: String, line: usize },
    #[error("Line {line}: a face needs exactly three vertices.")]
    FaceArity { line: usize },
    #[error("Line {line}: vertex index {index} is out of range.")]
    IndexRange { index: i64, line: usize },
}

/// Failure to turn an OBJ document into a mesh.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum LoadError {
    #[error("{0}")]
    Parse(#[from] ParseError),
    /// The faces parsed fine but do not form a closed oriented manifold
    /// (flipped faces, duplicated faces, open fans).
    #[error("Malformed mesh: {0}")]
    Mesh(#[from] MeshError),
}

/// Parses an OBJ document and builds the connectivity.
pub fn parse_obj(src: &str) -> Result<TriangleMesh, LoadError> {
    let builder = parse_obj_builder(src)?;
    Ok(builder.build()?)
}

/// Parses an OBJ document into a [`MeshBuilder`], leaving assembly to the
/// caller.
///
/// Only `v` and `f` lines carry connectivity; comments, normals, texture
/// coordinates, groups and material references are skipped. Face indices are
/// 1-based in the file and may use the `f a/at/an` tuple form, of which only
/// the leading vertex index is read.
pub fn parse_obj_builder(src: &str) -> Result<MeshBuilder, ParseError> {
    let mut builder = MeshBuilder::new();
    for (idx, line) in src.lines().enumerate() {
        let line_no = idx + 1;
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let x = parse_number(tokens.next(), line_no)?;
                let y = parse_number(tokens.next(), line_no)?;
                let z = parse_number(tokens.next(), line_no)?;
                builder.vertex(point(x, y, z));
            }
            Some("f") => {
                let a = parse_index(tokens.next(), line_no, builder.num_vertices())?;
                let b = parse_index(tokens.next(), line_no, builder.num_vertices())?;
                let c = parse_index(tokens.next(), line_no, builder.num_vertices())?;
                if tokens.next().is_some() {
                    return Err(ParseError::FaceArity { line: line_no });
                }
                builder.triangle(a, b, c);
            }
            _ => {}
        }
    }
    Ok(builder)
}

fn parse_number(token: Option<&str>, line: usize) -> Result<f64, ParseError> {
    let src = token.ok_or_else(|| ParseError::Number {
        src: String::new(),
        line,
    })?;
    src.parse().map_err(|_| ParseError::Number {
        src: src.to_string(),
        line,
    })
}

fn parse_index(
    token: Option<&str>,
    line: usize,
    num_vertices: usize,
) -> Result<VertexId, ParseError> {
    let src = token.ok_or(ParseError::FaceArity { line })?;
    // Tuple form: only the leading vertex index matters here.
    let first = src.split('/').next().unwrap_or(src);
    let index: i64 = first.parse().map_err(|_| ParseError::Index {
        src: src.to_string(),
        line,
    })?;
    if index < 1 || index as usize > num_vertices {
        return Err(ParseError::IndexRange { index, line });
    }
    Ok(VertexId((index - 1) as u32))
}

#[cfg(test)]
mod tests {
    use super::{parse_obj, parse_obj_builder, ParseError};

    const TETRAHEDRON: &str = "\
# a tetrahedron
v 0 0 0
v 1 0 0
v 0 1 0
v 0 0 1
vn 0 0 1
f 1 2 3
f 1 3 4
f 1 4 2
f 2 4 3
";

    #[test]
    fn parse_tetrahedron() {
        let mesh = parse_obj(TETRAHEDRON).unwrap();
        assert_eq!(mesh.active_vertex_count(), 4);
        assert_eq!(mesh.face_count(), 4);
        mesh.check_invariants().unwrap();
    }

    #[test]
    fn parse_index_tuples() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 0 1\nf 1/1/1 2/2/2 3/3/3\nf 1 3 4\nf 1 4 2\nf 2 4 3\n";
        let mesh = parse_obj(src).unwrap();
        assert_eq!(mesh.face_count(), 4);
    }

    #[test]
    fn bad_number_reports_the_line() {
        let err = parse_obj_builder("v 0 0 0\nv 1 x 0\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::Number {
                src: "x".to_string(),
                line: 2,
            }
        );
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let err = parse_obj_builder("v 0 0 0\nf 1 2 3\n").unwrap_err();
        assert_eq!(err, ParseError::IndexRange { index: 2, line: 2 });
    }

    #[test]
    fn quads_are_rejected() {
        let err = parse_obj_builder("v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 0 1\nf 1 2 3 4\n").unwrap_err();
        assert_eq!(err, ParseError::FaceArity { line: 5 });
    }
}
