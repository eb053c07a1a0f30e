//! The Cleaning Conquest.
//!
//! The decimating pass leaves behind valence-3 vertices that a further
//! decimating pass could not remove (their whole neighborhood is conquered).
//! This second breadth-first traversal removes them: deleting a valence-3
//! vertex merges its three faces into one, which needs no case table and no
//! parity.

use crate::command::CommandSink;
use crate::error::{DecimationError, InternalError};
use crate::mesh::{Gate, TriangleMesh, VertexId};
use crate::FaceStatus;

use std::collections::{HashMap, HashSet, VecDeque};

/// Runs one cleaning conquest over the mesh. A no-op if no active vertex has
/// valence 3.
pub fn cleaning_pass(
    mesh: &mut TriangleMesh,
    output: &mut dyn CommandSink,
) -> Result<(), DecimationError> {
    CleaningConquest {
        mesh,
        output,
        conquered: HashSet::new(),
        face_status: HashMap::new(),
        done: HashSet::new(),
        fifo: VecDeque::new(),
    }
    .run()
}

struct CleaningConquest<'l> {
    mesh: &'l mut TriangleMesh,
    output: &'l mut dyn CommandSink,
    conquered: HashSet<VertexId>,
    face_status: HashMap<Gate, FaceStatus>,
    /// Gates already dequeued once. Duplicate enqueues are harmless, this
    /// just keeps them from being processed twice.
    done: HashSet<Gate>,
    fifo: VecDeque<Gate>,
}

impl<'l> CleaningConquest<'l> {
    fn run(mut self) -> Result<(), DecimationError> {
        // Seed from the ring of the first valence-3 vertex in id order.
        let seed = self
            .mesh
            .active_vertices()
            .find(|&v| self.mesh.valence(v) == 3);
        let seed = match seed {
            Some(v) => v,
            None => return Ok(()),
        };
        let ring = self.mesh.ring(seed);
        self.fifo.push_back(Gate::new(ring[0], ring[1]));

        let mut removed = 0usize;
        while let Some(gate) = self.fifo.pop_front() {
            if !self.done.insert(gate) {
                continue;
            }
            let (left, right) = (gate.from, gate.to);
            let front = match self.mesh.gate_target(gate) {
                Some(front) => front,
                None => continue,
            };
            if self.face_status.contains_key(&gate) {
                continue;
            }

            let valence = self.mesh.valence(front);
            if valence == 3 && !self.conquered.contains(&front) {
                self.remove_valence3(front)?;
                removed += 1;
            } else if valence <= 6 && !self.conquered.contains(&front) {
                // Walk through the patch without removing anything.
                let ring = match self.mesh.rotate_ring_to(front, right) {
                    Ok(ring) => ring,
                    // The ring was rewritten under this gate; skip it.
                    Err(_) => continue,
                };
                for pair in ring.windows(2) {
                    self.fifo.push_back(Gate::new(pair[1], pair[0]));
                    self.face_status
                        .insert(Gate::new(pair[0], pair[1]), FaceStatus::Conquered);
                }
            } else {
                // Null face, as in the decimating conquest.
                self.face_status.insert(gate, FaceStatus::Null);
                self.fifo.push_back(Gate::new(front, right));
                self.fifo.push_back(Gate::new(left, front));
            }
        }

        log::debug!("cleaning conquest: {} vertices removed", removed);
        self.mesh.check_rewrite_invariants()?;
        Ok(())
    }

    /// Removes a valence-3 vertex: its three faces merge into the one formed
    /// by its ring.
    fn remove_valence3(&mut self, front: VertexId) -> Result<(), DecimationError> {
        let chain = self.mesh.ring(front).to_vec();
        debug_assert_eq!(chain.len(), 3);

        self.mesh.retire(front);
        // Anything queued towards the removed vertex is dead.
        self.fifo.retain(|g| g.from != front && g.to != front);
        self.output.add_vertex(front, self.mesh.position(front));

        for &p in &chain {
            self.mesh.add_valence(p, -1);
            self.mesh.remove_gate(Gate::new(front, p));
            self.mesh.remove_gate(Gate::new(p, front));
        }
        self.mesh.set_gate(Gate::new(chain[0], chain[1]), chain[2]);
        self.mesh.set_gate(Gate::new(chain[1], chain[2]), chain[0]);
        self.mesh.set_gate(Gate::new(chain[2], chain[0]), chain[1]);
        for &p in &chain {
            self.mesh.remove_from_ring(p, front)?;
            self.conquered.insert(p);
        }

        // The far faces across the first two edges of the new triangle are
        // decided; the conquest continues beyond them.
        self.face_status
            .insert(Gate::new(chain[1], chain[0]), FaceStatus::Conquered);
        self.face_status
            .insert(Gate::new(chain[2], chain[1]), FaceStatus::Conquered);
        let far1 = self
            .mesh
            .gate_target(Gate::new(chain[1], chain[0]))
            .ok_or(InternalError::MissingFarFace(Gate::new(chain[1], chain[0])))?;
        let far2 = self
            .mesh
            .gate_target(Gate::new(chain[2], chain[1]))
            .ok_or(InternalError::MissingFarFace(Gate::new(chain[2], chain[1])))?;
        self.fifo.push_back(Gate::new(far1, chain[0]));
        self.fifo.push_back(Gate::new(chain[1], far1));
        self.fifo.push_back(Gate::new(far2, chain[1]));
        self.fifo.push_back(Gate::new(chain[2], far2));

        self.output.add_face(front, chain[0], chain[1]);
        self.output.add_face(front, chain[1], chain[2]);
        self.output.add_face(front, chain[2], chain[0]);
        self.output.delete_face(chain[0], chain[1], chain[2]);
        Ok(())
    }
}
