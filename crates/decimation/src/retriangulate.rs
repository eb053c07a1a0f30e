//! Patch retriangulation (used internally by the decimating conquest).
//!
//! When the conquest removes a vertex of valence v in 3..=6, the hole left
//! behind is a v-gon bounded by the removed vertex's ring. This module tiles
//! it with v-2 triangles chosen by a fixed case table, keyed by the valence
//! and the parities of the two endpoints of the gate the conquest entered
//! through.

use crate::command::CommandSink;
use crate::error::{DecimationError, InternalError};
use crate::mesh::{Gate, TriangleMesh, VertexId};
use crate::Parity;

use arrayvec::ArrayVec;
use std::collections::HashMap;

type PatchFaces = ArrayVec<[VertexId; 3], 4>;
type ParityPattern = ArrayVec<Parity, 4>;

/// Tiles the patch left by removing `front`, whose ring (rotated so that the
/// entry gate's `right` endpoint comes first) is `ring`.
///
/// Emits one `Face` record per original face of the patch and one
/// `DeleteFace` record per new face, updates the gates of every edge whose
/// opposing face changed, splices the rings of all patch vertices, and
/// assigns parity to ring vertices that do not have one yet. The caller has
/// already removed `front` from the active set and deleted its gates.
pub(crate) fn retriangulate(
    mesh: &mut TriangleMesh,
    parity: &mut HashMap<VertexId, Parity>,
    output: &mut dyn CommandSink,
    front: VertexId,
    ring: &[VertexId],
) -> Result<(), DecimationError> {
    let valence = ring.len();
    let right = ring[0];
    let left = ring[valence - 1];
    let right_sign = *parity
        .get(&right)
        .ok_or(InternalError::MissingParity(right))?;
    let left_sign = *parity
        .get(&left)
        .ok_or(InternalError::MissingParity(left))?;

    let (faces, pattern) = select_case(ring, left, right, left_sign, right_sign)?;

    // One record per original face of the patch, for the decoder to restore.
    for i in 0..valence {
        output.add_face(front, ring[i], ring[(i + 1) % valence]);
    }

    // The final gate state of the table: every edge of a new face, boundary
    // and interior diagonal alike.
    for &[a, b, c] in &faces {
        mesh.set_gate(Gate::new(a, b), c);
        mesh.set_gate(Gate::new(b, c), a);
        mesh.set_gate(Gate::new(c, a), b);
    }

    // Splice the rings. In the ring of a patch vertex, `front` sat between
    // the vertex's two boundary neighbors; its replacement is the fan of new
    // interior partners, read off the freshly written gates.
    for i in 0..valence {
        let c = ring[i];
        let next = ring[(i + 1) % valence];
        let prev = ring[(i + valence - 1) % valence];
        let partners = walk_partners(mesh, c, next, prev)?;
        let pos = mesh.remove_from_ring(c, front)?;
        mesh.splice_in_ring(c, pos, &partners);
        let new_valence = mesh.ring(c).len() as u32;
        mesh.set_valence(c, new_valence);
    }

    // The table's fixed alternating pattern for ring vertices between
    // `right` and `left`. Parity already assigned is never overwritten.
    for (k, &sign) in pattern.iter().enumerate() {
        parity.entry(ring[k + 1]).or_insert(sign);
    }

    for &[a, b, c] in &faces {
        output.delete_face(a, b, c);
    }
    Ok(())
}

/// The new interior neighbors of `center`, walking the new faces from the
/// boundary edge towards `next` around to the one towards `prev`.
fn walk_partners(
    mesh: &TriangleMesh,
    center: VertexId,
    next: VertexId,
    prev: VertexId,
) -> Result<ArrayVec<VertexId, 4>, DecimationError> {
    let mut partners = ArrayVec::new();
    let mut w = next;
    loop {
        let t = mesh
            .gate_target(Gate::new(center, w))
            .ok_or(InternalError::BrokenPatchWalk(center))?;
        if t == prev {
            return Ok(partners);
        }
        if partners.try_push(t).is_err() {
            return Err(InternalError::BrokenPatchWalk(center).into());
        }
        w = t;
    }
}

/// The case table. `c[0]` is the entry gate's `right` endpoint, `c[v-1]` its
/// `left`; the sign decisions are driven by whatever parity they carry.
fn select_case(
    ring: &[VertexId],
    left: VertexId,
    right: VertexId,
    left_sign: Parity,
    right_sign: Parity,
) -> Result<(PatchFaces, ParityPattern), DecimationError> {
    use crate::Parity::{Minus, Plus};

    let mut faces = PatchFaces::new();
    let mut pattern = ParityPattern::new();
    let c = ring;

    match ring.len() {
        3 => {
            faces.push([left, right, c[1]]);
            pattern.push(if left_sign == Plus && right_sign == Plus {
                Minus
            } else {
                Plus
            });
        }
        4 => {
            if right_sign.is_minus() {
                faces.push([left, right, c[1]]);
                faces.push([left, c[1], c[2]]);
                pattern.extend([Plus, Minus]);
            } else {
                faces.push([left, right, c[2]]);
                faces.push([right, c[1], c[2]]);
                pattern.extend([Minus, Plus]);
            }
        }
        5 => {
            if right_sign.is_minus() {
                faces.push([left, right, c[1]]);
                faces.push([left, c[1], c[3]]);
                faces.push([c[1], c[2], c[3]]);
                pattern.extend([Plus, Minus, Plus]);
            } else if left_sign.is_minus() {
                faces.push([left, right, c[3]]);
                faces.push([right, c[1], c[3]]);
                faces.push([c[1], c[2], c[3]]);
                pattern.extend([Plus, Minus, Plus]);
            } else {
                faces.push([left, right, c[2]]);
                faces.push([right, c[1], c[2]]);
                faces.push([left, c[2], c[3]]);
                pattern.extend([Minus, Plus, Minus]);
            }
        }
        6 => {
            if right_sign.is_minus() {
                faces.push([left, right, c[1]]);
                faces.push([left, c[1], c[3]]);
                faces.push([c[1], c[2], c[3]]);
                faces.push([left, c[3], c[4]]);
                pattern.extend([Plus, Minus, Plus, Minus]);
            } else {
                faces.push([right, c[1], c[2]]);
                faces.push([right, c[2], c[4]]);
                faces.push([c[2], c[3], c[4]]);
                faces.push([left, right, c[4]]);
                pattern.extend([Minus, Plus, Minus, Plus]);
            }
        }
        v => return Err(InternalError::UnsupportedValence(v as u32).into()),
    }
    Ok((faces, pattern))
}
