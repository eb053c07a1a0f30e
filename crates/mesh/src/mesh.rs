//! The triangle connectivity store.

use crate::math::Point;
use crate::{Gate, MeshError, VertexId};

use std::collections::HashMap;

#[derive(Clone, Debug)]
struct VertexData {
    position: Point,
    /// Cyclic counter-clockwise neighbor sequence. `(v, ring[i], ring[i+1])`
    /// is an active face for every i (indices mod ring length).
    ring: Vec<VertexId>,
    valence: u32,
    active: bool,
}

/// Connectivity of a closed oriented triangle mesh.
///
/// The mesh owns the vertex arena and the gate table. All queries used by the
/// decimation passes are O(1) hash lookups or O(valence) ring scans. The
/// rewrite operations are low level on purpose: a conquest pass edits gates
/// and rings directly, the same way it reasons about them.
#[derive(Clone, Debug, Default)]
pub struct TriangleMesh {
    verts: Vec<VertexData>,
    gates: HashMap<Gate, VertexId>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        TriangleMesh {
            verts: Vec::new(),
            gates: HashMap::new(),
        }
    }

    /// Allocates a new active vertex with an empty ring.
    pub fn add_vertex(&mut self, position: Point) -> VertexId {
        let id = VertexId::from_usize(self.verts.len());
        self.verts.push(VertexData {
            position,
            ring: Vec::new(),
            valence: 0,
            active: true,
        });
        id
    }

    /// Allocates a new vertex at the same position as `v`.
    ///
    /// Used when a non-manifold fan or a ring pinch forces two logical
    /// vertices to share one position.
    pub fn duplicate_vertex(&mut self, v: VertexId) -> VertexId {
        let position = self.verts[v.to_usize()].position;
        self.add_vertex(position)
    }

    /// Total number of allocated vertices, retired ones included.
    pub fn vertex_count(&self) -> usize {
        self.verts.len()
    }

    pub fn active_vertex_count(&self) -> usize {
        self.verts.iter().filter(|v| v.active).count()
    }

    /// Active vertex ids in increasing order.
    pub fn active_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.verts
            .iter()
            .enumerate()
            .filter(|(_, v)| v.active)
            .map(|(i, _)| VertexId::from_usize(i))
    }

    pub fn is_active(&self, v: VertexId) -> bool {
        self.verts[v.to_usize()].active
    }

    pub fn position(&self, v: VertexId) -> Point {
        self.verts[v.to_usize()].position
    }

    pub fn valence(&self, v: VertexId) -> u32 {
        self.verts[v.to_usize()].valence
    }

    /// The cyclic neighbor sequence of `v` in storage order.
    pub fn ring(&self, v: VertexId) -> &[VertexId] {
        &self.verts[v.to_usize()].ring
    }

    /// Number of active faces. Each face contributes exactly three gates.
    pub fn face_count(&self) -> usize {
        self.gates.len() / 3
    }

    pub fn gate_target(&self, gate: Gate) -> Option<VertexId> {
        self.gates.get(&gate).copied()
    }

    pub fn gates(&self) -> impl Iterator<Item = (Gate, VertexId)> + '_ {
        self.gates.iter().map(|(&g, &t)| (g, t))
    }

    /// Registers or redirects a gate.
    pub fn set_gate(&mut self, gate: Gate, target: VertexId) {
        self.gates.insert(gate, target);
    }

    /// Removes a gate, returning its target if it was registered.
    pub fn remove_gate(&mut self, gate: Gate) -> Option<VertexId> {
        self.gates.remove(&gate)
    }

    /// Clears the active flag of `v`. The caller is responsible for removing
    /// its gates and patching the neighbor rings.
    pub fn retire(&mut self, v: VertexId) {
        self.verts[v.to_usize()].active = false;
    }

    pub fn add_valence(&mut self, v: VertexId, delta: i32) {
        let valence = &mut self.verts[v.to_usize()].valence;
        *valence = (*valence as i32 + delta) as u32;
    }

    pub fn set_valence(&mut self, v: VertexId, valence: u32) {
        self.verts[v.to_usize()].valence = valence;
    }

    pub(crate) fn set_ring(&mut self, v: VertexId, ring: Vec<VertexId>) {
        self.verts[v.to_usize()].ring = ring;
    }

    /// Position of `w` in the ring of `v`, if present.
    pub fn ring_index_of(&self, v: VertexId, w: VertexId) -> Option<usize> {
        self.verts[v.to_usize()].ring.iter().position(|&n| n == w)
    }

    /// Returns the ring of `v` rotated so that `first` comes first.
    pub fn rotate_ring_to(
        &self,
        v: VertexId,
        first: VertexId,
    ) -> Result<Vec<VertexId>, MeshError> {
        let ring = &self.verts[v.to_usize()].ring;
        let i = ring
            .iter()
            .position(|&n| n == first)
            .ok_or(MeshError::NotInRing {
                vertex: v,
                missing: first,
            })?;
        let mut rotated = Vec::with_capacity(ring.len());
        rotated.extend_from_slice(&ring[i..]);
        rotated.extend_from_slice(&ring[..i]);
        Ok(rotated)
    }

    /// Replaces the single occurrence of `old` in the ring of `v` by `new`.
    pub fn replace_in_ring(
        &mut self,
        v: VertexId,
        old: VertexId,
        new: VertexId,
    ) -> Result<(), MeshError> {
        let ring = &mut self.verts[v.to_usize()].ring;
        let i = ring
            .iter()
            .position(|&n| n == old)
            .ok_or(MeshError::NotInRing {
                vertex: v,
                missing: old,
            })?;
        ring[i] = new;
        Ok(())
    }

    /// Removes the first occurrence of `w` from the ring of `v`, returning
    /// the position it occupied.
    pub fn remove_from_ring(&mut self, v: VertexId, w: VertexId) -> Result<usize, MeshError> {
        let ring = &mut self.verts[v.to_usize()].ring;
        let i = ring
            .iter()
            .position(|&n| n == w)
            .ok_or(MeshError::NotInRing {
                vertex: v,
                missing: w,
            })?;
        ring.remove(i);
        Ok(i)
    }

    /// Inserts `items` in the ring of `v` at position `pos`, preserving the
    /// cyclic order of the existing entries.
    pub fn splice_in_ring(&mut self, v: VertexId, pos: usize, items: &[VertexId]) {
        let ring = &mut self.verts[v.to_usize()].ring;
        debug_assert!(pos <= ring.len());
        for (k, &item) in items.iter().enumerate() {
            ring.insert(pos + k, item);
        }
    }

    /// Registers an active face, updating gates, valences and rings.
    ///
    /// Rejects faces that repeat a vertex, reference a retired vertex, or
    /// would overwrite an existing gate (a flipped or duplicated face).
    pub fn add_face(
        &mut self,
        a: VertexId,
        b: VertexId,
        c: VertexId,
    ) -> Result<(), MeshError> {
        if a == b || b == c || a == c {
            return Err(MeshError::DegenerateFace(a, b, c));
        }
        for &v in &[a, b, c] {
            if v.to_usize() >= self.verts.len() || !self.verts[v.to_usize()].active {
                return Err(MeshError::InvalidVertex(v));
            }
        }
        for &g in &[Gate::new(a, b), Gate::new(b, c), Gate::new(c, a)] {
            if self.gates.contains_key(&g) {
                return Err(MeshError::DuplicateGate(g));
            }
        }

        // Rings first: they can still fail, and the gate table must not be
        // left half-updated when they do.
        self.insert_ring_pair(a, b, c)?;
        self.insert_ring_pair(b, c, a)?;
        self.insert_ring_pair(c, a, b)?;

        self.gates.insert(Gate::new(a, b), c);
        self.gates.insert(Gate::new(b, c), a);
        self.gates.insert(Gate::new(c, a), b);
        self.add_valence(a, 1);
        self.add_valence(b, 1);
        self.add_valence(c, 1);
        Ok(())
    }

    /// Unregisters an active face. Inverse of [`add_face`](#method.add_face).
    pub fn remove_face(
        &mut self,
        a: VertexId,
        b: VertexId,
        c: VertexId,
    ) -> Result<(), MeshError> {
        for &(g, t) in &[
            (Gate::new(a, b), c),
            (Gate::new(b, c), a),
            (Gate::new(c, a), b),
        ] {
            if self.gates.get(&g) != Some(&t) {
                return Err(MeshError::MissingGate(g));
            }
        }
        for &g in &[Gate::new(a, b), Gate::new(b, c), Gate::new(c, a)] {
            self.gates.remove(&g);
        }
        self.add_valence(a, -1);
        self.add_valence(b, -1);
        self.add_valence(c, -1);

        // A neighbor leaves a ring only once the edge is gone in both
        // directions, i.e. once neither adjacent face remains.
        for &(v, n1, n2) in &[(a, b, c), (b, c, a), (c, a, b)] {
            for &n in &[n1, n2] {
                if !self.gates.contains_key(&Gate::new(v, n))
                    && !self.gates.contains_key(&Gate::new(n, v))
                {
                    self.remove_from_ring(v, n)?;
                }
            }
        }
        Ok(())
    }

    /// Makes `from, to` a consecutive pair in the ring of `v`.
    fn insert_ring_pair(
        &mut self,
        v: VertexId,
        from: VertexId,
        to: VertexId,
    ) -> Result<(), MeshError> {
        let ring = &mut self.verts[v.to_usize()].ring;
        let i = ring.iter().position(|&n| n == from);
        let j = ring.iter().position(|&n| n == to);
        match (i, j) {
            (None, None) if ring.is_empty() => {
                ring.push(from);
                ring.push(to);
                Ok(())
            }
            // A face disconnected from the rest of the fan cannot be
            // represented by a single cycle.
            (None, None) => Err(MeshError::NonManifoldRing(v)),
            (Some(i), None) => {
                ring.insert(i + 1, to);
                Ok(())
            }
            (None, Some(j)) => {
                ring.insert(j, from);
                Ok(())
            }
            (Some(i), Some(j)) => {
                if (i + 1) % ring.len() == j {
                    Ok(())
                } else {
                    Err(MeshError::NonManifoldRing(v))
                }
            }
        }
    }

    /// Verifies the invariants that every rewrite must preserve: each active
    /// vertex's ring length equals its valence, and every gate has a reverse
    /// gate.
    ///
    /// This deliberately tolerates the doubled-edge states the cleaning and
    /// sew passes create and repair; [`check_invariants`](#method.check_invariants)
    /// is the strict variant for states known to be clean.
    pub fn check_rewrite_invariants(&self) -> Result<(), MeshError> {
        for (i, vert) in self.verts.iter().enumerate() {
            if !vert.active {
                continue;
            }
            if vert.ring.len() != vert.valence as usize {
                return Err(MeshError::RingValenceMismatch {
                    vertex: VertexId::from_usize(i),
                    ring_len: vert.ring.len(),
                    valence: vert.valence,
                });
            }
        }
        for &g in self.gates.keys() {
            if !self.gates.contains_key(&g.reversed()) {
                return Err(MeshError::GateAsymmetry(g));
            }
        }
        Ok(())
    }

    /// Verifies the full structural invariants of a clean store:
    ///
    /// - everything [`check_rewrite_invariants`](#method.check_rewrite_invariants)
    ///   verifies,
    /// - rings and gates agree on every face,
    /// - valences add up to three per active face.
    pub fn check_invariants(&self) -> Result<(), MeshError> {
        let mut total: u64 = 0;
        for (i, vert) in self.verts.iter().enumerate() {
            if !vert.active {
                continue;
            }
            let v = VertexId::from_usize(i);
            if vert.ring.len() != vert.valence as usize {
                return Err(MeshError::RingValenceMismatch {
                    vertex: v,
                    ring_len: vert.ring.len(),
                    valence: vert.valence,
                });
            }
            total += vert.valence as u64;
            let len = vert.ring.len();
            for k in 0..len {
                let g = Gate::new(v, vert.ring[k]);
                if self.gates.get(&g) != Some(&vert.ring[(k + 1) % len]) {
                    return Err(MeshError::RingGateDisagreement { vertex: v, gate: g });
                }
            }
        }
        for &g in self.gates.keys() {
            if !self.gates.contains_key(&g.reversed()) {
                return Err(MeshError::GateAsymmetry(g));
            }
        }
        if self.gates.len() % 3 != 0 || total != self.gates.len() as u64 {
            return Err(MeshError::ValenceSum {
                total,
                faces: self.face_count(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::math::point;
    use crate::{Gate, MeshBuilder, MeshError, VertexId};

    fn tetrahedron() -> crate::TriangleMesh {
        let mut builder = MeshBuilder::new();
        let a = builder.vertex(point(0.0, 0.0, 0.0));
        let b = builder.vertex(point(1.0, 0.0, 0.0));
        let c = builder.vertex(point(0.0, 1.0, 0.0));
        let d = builder.vertex(point(0.0, 0.0, 1.0));
        builder.triangle(a, b, c);
        builder.triangle(a, c, d);
        builder.triangle(a, d, b);
        builder.triangle(b, d, c);
        builder.build().unwrap()
    }

    #[test]
    fn tetrahedron_connectivity() {
        let mesh = tetrahedron();
        assert_eq!(mesh.face_count(), 4);
        assert_eq!(mesh.active_vertex_count(), 4);
        for v in mesh.active_vertices() {
            assert_eq!(mesh.valence(v), 3);
            assert_eq!(mesh.ring(v).len(), 3);
        }
        assert_eq!(
            mesh.gate_target(Gate::new(VertexId(1), VertexId(2))),
            Some(VertexId(0))
        );
        assert_eq!(
            mesh.gate_target(Gate::new(VertexId(2), VertexId(1))),
            Some(VertexId(3))
        );
        mesh.check_invariants().unwrap();
    }

    #[test]
    fn rotate_ring() {
        let mesh = tetrahedron();
        let ring = mesh.ring(VertexId(0)).to_vec();
        let rotated = mesh.rotate_ring_to(VertexId(0), ring[2]).unwrap();
        assert_eq!(rotated[0], ring[2]);
        assert_eq!(rotated[1], ring[0]);
        assert_eq!(rotated[2], ring[1]);

        assert_eq!(
            mesh.rotate_ring_to(VertexId(0), VertexId(0)),
            Err(MeshError::NotInRing {
                vertex: VertexId(0),
                missing: VertexId(0),
            })
        );
    }

    #[test]
    fn remove_and_add_face() {
        let mut mesh = tetrahedron();
        let (b, c, d) = (VertexId(1), VertexId(2), VertexId(3));

        mesh.remove_face(b, d, c).unwrap();
        assert_eq!(mesh.face_count(), 3);
        assert_eq!(mesh.valence(b), 2);
        // The edges are still held by the other faces, so the rings keep
        // their entries.
        assert_eq!(mesh.ring(b).len(), 3);

        mesh.add_face(b, d, c).unwrap();
        assert_eq!(mesh.face_count(), 4);
        mesh.check_invariants().unwrap();
    }

    #[test]
    fn flipped_face_is_rejected() {
        let mut builder = MeshBuilder::new();
        let a = builder.vertex(point(0.0, 0.0, 0.0));
        let b = builder.vertex(point(1.0, 0.0, 0.0));
        let c = builder.vertex(point(0.0, 1.0, 0.0));
        let d = builder.vertex(point(0.0, 0.0, 1.0));
        builder.triangle(a, b, c);
        builder.triangle(a, c, d);
        builder.triangle(a, d, b);
        // Flipped: walks the (d, c) edge in the same direction as (a, c, d).
        builder.triangle(b, c, d);
        assert!(matches!(
            builder.build(),
            Err(MeshError::DuplicateGate(_))
        ));
    }
}
