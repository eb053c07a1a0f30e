//! The Decimating Conquest.
//!
//! A breadth-first traversal over gates. Each dequeued gate looks at the
//! vertex facing it: an unvisited vertex of valence at most 6 is removed and
//! its patch retriangulated, anything else produces a null face and the
//! traversal slides around it. The traversal front expands outward through
//! the gates pushed at each step, so the removed vertices form a maximal
//! independent set.

use crate::command::CommandSink;
use crate::error::{DecimationError, InternalError};
use crate::mesh::{Gate, TriangleMesh, VertexId};
use crate::retriangulate::retriangulate;
use crate::{FaceStatus, Parity};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet, VecDeque};

/// Runs one decimating conquest over the mesh, appending the removal records
/// to `output`.
///
/// The initial gate is drawn from an RNG seeded with `seed`, which makes the
/// whole pass deterministic: the FIFO discipline orders everything else.
pub fn decimating_pass(
    mesh: &mut TriangleMesh,
    output: &mut dyn CommandSink,
    seed: u64,
) -> Result<(), DecimationError> {
    DecimatingConquest {
        mesh,
        output,
        parity: HashMap::new(),
        conquered: HashSet::new(),
        face_status: HashMap::new(),
        fifo: VecDeque::new(),
    }
    .run(seed)
}

struct DecimatingConquest<'l> {
    mesh: &'l mut TriangleMesh,
    output: &'l mut dyn CommandSink,
    parity: HashMap<VertexId, Parity>,
    conquered: HashSet<VertexId>,
    face_status: HashMap<Gate, FaceStatus>,
    fifo: VecDeque<Gate>,
}

impl<'l> DecimatingConquest<'l> {
    fn run(mut self, seed: u64) -> Result<(), DecimationError> {
        let first = match self.pick_first_gate(seed) {
            Some(gate) => gate,
            None => return Ok(()),
        };
        self.parity.insert(first.from, Parity::Minus);
        self.parity.insert(first.to, Parity::Plus);
        self.fifo.push_back(first);

        let mut removed = 0usize;
        while let Some(gate) = self.fifo.pop_front() {
            let (left, right) = (gate.from, gate.to);
            self.conquered.insert(left);
            self.conquered.insert(right);

            let front = match self.mesh.gate_target(gate) {
                Some(front) => front,
                // The edge was consumed by an earlier rewrite.
                None => continue,
            };
            if self.face_status.contains_key(&gate) {
                continue;
            }

            let valence = self.mesh.valence(front);
            if valence <= 6 && !self.conquered.contains(&front) {
                self.conquer_patch(gate, front)?;
                removed += 1;
            } else if self.conquered.contains(&front) || valence > 6 {
                // Null face: tag it and slide around its two other edges.
                self.face_status.insert(gate, FaceStatus::Null);
                self.parity.entry(front).or_insert(Parity::Plus);
                self.fifo.push_back(Gate::new(front, right));
                self.fifo.push_back(Gate::new(left, front));
            } else {
                return Err(InternalError::UnexpectedFrontState(front).into());
            }
        }

        log::debug!(
            "decimating conquest: {} vertices removed, {} active left",
            removed,
            self.mesh.active_vertex_count()
        );
        self.mesh.check_rewrite_invariants()?;
        Ok(())
    }

    /// Removes `front` and retriangulates its patch.
    fn conquer_patch(&mut self, gate: Gate, front: VertexId) -> Result<(), DecimationError> {
        let ring = self.mesh.rotate_ring_to(front, gate.to)?;
        for &w in &ring {
            self.conquered.insert(w);
        }
        // Push the patch border outward so the front keeps expanding, and
        // close the inner faces to later arrivals.
        for pair in ring.windows(2) {
            self.fifo.push_back(Gate::new(pair[1], pair[0]));
            self.face_status
                .insert(Gate::new(pair[0], pair[1]), FaceStatus::Conquered);
        }

        self.mesh.retire(front);
        self.output.add_vertex(front, self.mesh.position(front));
        for &w in &ring {
            self.mesh.remove_gate(Gate::new(front, w));
            self.mesh.remove_gate(Gate::new(w, front));
        }

        retriangulate(self.mesh, &mut self.parity, self.output, front, &ring)
    }

    /// Deterministic choice of the starting gate: the seeded RNG indexes
    /// into the sorted gate list.
    fn pick_first_gate(&self, seed: u64) -> Option<Gate> {
        let mut gates: Vec<Gate> = self.mesh.gates().map(|(g, _)| g).collect();
        if gates.is_empty() {
            return None;
        }
        gates.sort();
        let mut rng = StdRng::seed_from_u64(seed);
        Some(gates[rng.gen_range(0..gates.len())])
    }
}
