//! Construction of a [`TriangleMesh`](../mesh/struct.TriangleMesh.html) from
//! a vertex/face list.

use crate::math::Point;
use crate::mesh::TriangleMesh;
use crate::{Gate, MeshError, VertexId};

/// Accumulates vertices and counter-clockwise faces, then assembles the
/// connectivity in one go.
///
/// Assembly registers the three gates of every face (rejecting duplicates,
/// which with closed CCW input can only come from flipped or repeated
/// faces), then builds each vertex's patch ring by chaining the unordered
/// consecutive-neighbor fragments contributed by its incident faces.
///
/// When the fragments of a vertex chain into more than one cycle the vertex
/// is *pinched*: two independent fans meet at a single position. The builder
/// recovers by duplicating the vertex (each extra cycle gets a fresh id at
/// the same position and the gates of its fan are re-targeted) so that the
/// decimation passes only ever see clean one-cycle rings.
#[derive(Clone, Debug, Default)]
pub struct MeshBuilder {
    positions: Vec<Point>,
    faces: Vec<[VertexId; 3]>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        MeshBuilder {
            positions: Vec::new(),
            faces: Vec::new(),
        }
    }

    pub fn vertex(&mut self, position: Point) -> VertexId {
        let id = VertexId::from_usize(self.positions.len());
        self.positions.push(position);
        id
    }

    /// Adds a counter-clockwise face.
    pub fn triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        self.faces.push([a, b, c]);
    }

    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn build(self) -> Result<TriangleMesh, MeshError> {
        let mut mesh = TriangleMesh::new();
        for &position in &self.positions {
            mesh.add_vertex(position);
        }

        // Per-vertex fragments: for a face (a, b, c), vertex a learns that
        // (b, c) are consecutive in its ring.
        let mut fragments: Vec<Vec<(VertexId, VertexId)>> =
            vec![Vec::new(); self.positions.len()];

        for &[a, b, c] in &self.faces {
            if a == b || b == c || a == c {
                return Err(MeshError::DegenerateFace(a, b, c));
            }
            for &v in &[a, b, c] {
                if v.to_usize() >= self.positions.len() {
                    return Err(MeshError::InvalidVertex(v));
                }
            }
            for &(g, t) in &[
                (Gate::new(a, b), c),
                (Gate::new(b, c), a),
                (Gate::new(c, a), b),
            ] {
                if mesh.gate_target(g).is_some() {
                    return Err(MeshError::DuplicateGate(g));
                }
                mesh.set_gate(g, t);
            }
            mesh.add_valence(a, 1);
            mesh.add_valence(b, 1);
            mesh.add_valence(c, 1);
            fragments[a.to_usize()].push((b, c));
            fragments[b.to_usize()].push((c, a));
            fragments[c.to_usize()].push((a, b));
        }

        // First chain every ring; the pinched fans are split afterwards so
        // that the neighbor rings they re-target already exist.
        let mut to_split = Vec::new();
        for i in 0..fragments.len() {
            let v = VertexId::from_usize(i);
            let mut pending = std::mem::take(&mut fragments[i]);
            if pending.is_empty() {
                // An isolated vertex; keep it around but inactive.
                mesh.retire(v);
                continue;
            }
            let mut cycles = Vec::new();
            while !pending.is_empty() {
                cycles.push(chain_cycle(v, &mut pending)?);
            }

            let first = cycles.remove(0);
            mesh.set_valence(v, first.len() as u32);
            mesh.set_ring(v, first);
            for cycle in cycles {
                to_split.push((v, cycle));
            }
        }

        // Each extra cycle is a disjoint fan: split it off onto a duplicated
        // vertex and re-target the fan's gates.
        for (v, cycle) in to_split {
            let dup = mesh.duplicate_vertex(v);
            log::warn!(
                "non-manifold fan at {:?}: {} faces moved to {:?}",
                v,
                cycle.len(),
                dup
            );
            let len = cycle.len();
            for k in 0..len {
                let (a, b) = (cycle[k], cycle[(k + 1) % len]);
                // The fan's outer gates now target the duplicate.
                mesh.set_gate(Gate::new(a, b), dup);
                // And its interior gates are re-keyed onto it.
                if let Some(t) = mesh.remove_gate(Gate::new(v, a)) {
                    mesh.set_gate(Gate::new(dup, a), t);
                }
                if let Some(t) = mesh.remove_gate(Gate::new(a, v)) {
                    mesh.set_gate(Gate::new(a, dup), t);
                }
                mesh.replace_in_ring(a, v, dup)?;
            }
            mesh.set_valence(dup, len as u32);
            mesh.set_ring(dup, cycle);
        }

        mesh.check_invariants()?;
        Ok(mesh)
    }
}

/// Chains fragments into one cycle, consuming the fragments it uses.
fn chain_cycle(
    v: VertexId,
    pending: &mut Vec<(VertexId, VertexId)>,
) -> Result<Vec<VertexId>, MeshError> {
    let (start, mut end) = pending.remove(0);
    let mut cycle = vec![start, end];
    loop {
        match pending.iter().position(|&(from, _)| from == end) {
            Some(i) => {
                let (_, to) = pending.remove(i);
                if to == start {
                    return Ok(cycle);
                }
                cycle.push(to);
                end = to;
            }
            // The chain never closed: an open fan, which a closed mesh
            // cannot contain.
            None => return Err(MeshError::OpenFan(v)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MeshBuilder;
    use crate::math::point;
    use crate::VertexId;

    #[test]
    fn shared_vertex_is_duplicated() {
        // Two tetrahedra touching at a single vertex (id 0).
        let mut builder = MeshBuilder::new();
        for k in 0..7 {
            builder.vertex(point(k as f64, 0.0, 0.0));
        }
        let v = |i: u32| VertexId(i);
        // First tetrahedron: 0, 1, 2, 3.
        builder.triangle(v(0), v(1), v(2));
        builder.triangle(v(0), v(2), v(3));
        builder.triangle(v(0), v(3), v(1));
        builder.triangle(v(1), v(3), v(2));
        // Second tetrahedron: 0, 4, 5, 6.
        builder.triangle(v(0), v(4), v(5));
        builder.triangle(v(0), v(5), v(6));
        builder.triangle(v(0), v(6), v(4));
        builder.triangle(v(4), v(6), v(5));

        let mesh = builder.build().unwrap();

        // One new vertex, and both copies carry a clean 3-ring.
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.active_vertex_count(), 8);
        let dup = VertexId(7);
        assert_eq!(mesh.position(dup), mesh.position(v(0)));
        assert_eq!(mesh.valence(v(0)), 3);
        assert_eq!(mesh.valence(dup), 3);
        assert_eq!(mesh.ring(v(0)).len(), 3);
        assert_eq!(mesh.ring(dup).len(), 3);
        mesh.check_invariants().unwrap();
    }

    #[test]
    fn single_cycle_is_not_duplicated() {
        let mut builder = MeshBuilder::new();
        let a = builder.vertex(point(0.0, 0.0, 0.0));
        let b = builder.vertex(point(1.0, 0.0, 0.0));
        let c = builder.vertex(point(0.0, 1.0, 0.0));
        let d = builder.vertex(point(0.0, 0.0, 1.0));
        builder.triangle(a, b, c);
        builder.triangle(a, c, d);
        builder.triangle(a, d, b);
        builder.triangle(b, d, c);
        let mesh = builder.build().unwrap();
        assert_eq!(mesh.vertex_count(), 4);
    }
}
