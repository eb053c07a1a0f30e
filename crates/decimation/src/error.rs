use crate::mesh::{Gate, MeshError, VertexId};

/// Result alias for the conquest passes.
pub type DecimationResult = Result<(), DecimationError>;

/// Describes an unexpected state encountered during a conquest.
///
/// These indicate a bug or an input outside the supported class (closed
/// oriented 2-manifolds); the pass aborts when one occurs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InternalError {
    /// A gate endpoint reached the retriangulator without a parity.
    MissingParity(VertexId),
    /// A patch with a valence outside 3..=6 reached the retriangulator.
    UnsupportedValence(u32),
    /// Walking the freshly written gates around a patch vertex did not
    /// close back onto its ring.
    BrokenPatchWalk(VertexId),
    /// The face beyond a cleaned patch is missing from the gate table.
    MissingFarFace(Gate),
    /// A dequeued gate's front vertex matched no traversal case.
    UnexpectedFrontState(VertexId),
}

impl core::fmt::Display for InternalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InternalError::MissingParity(v) => {
                write!(f, "No parity recorded for vertex {:?}", v)
            }
            InternalError::UnsupportedValence(v) => {
                write!(f, "Cannot retriangulate a patch of valence {}", v)
            }
            InternalError::BrokenPatchWalk(v) => {
                write!(f, "Patch walk around {:?} did not close", v)
            }
            InternalError::MissingFarFace(g) => {
                write!(f, "No face beyond gate {:?} -> {:?}", g.from, g.to)
            }
            InternalError::UnexpectedFrontState(v) => {
                write!(f, "Front vertex {:?} matched no traversal case", v)
            }
        }
    }
}

impl std::error::Error for InternalError {}

/// The decimation error enumeration.
#[derive(Clone, Debug, PartialEq)]
pub enum DecimationError {
    /// The connectivity store reported a breach of its invariants.
    Mesh(MeshError),
    /// A conquest reached a state it cannot handle.
    Internal(InternalError),
}

impl core::fmt::Display for DecimationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecimationError::Mesh(e) => write!(f, "Mesh error: {}", e),
            DecimationError::Internal(e) => write!(f, "Internal error: {}", e),
        }
    }
}

impl std::error::Error for DecimationError {}

impl From<MeshError> for DecimationError {
    fn from(value: MeshError) -> Self {
        DecimationError::Mesh(value)
    }
}

impl From<InternalError> for DecimationError {
    fn from(value: InternalError) -> Self {
        DecimationError::Internal(value)
    }
}
