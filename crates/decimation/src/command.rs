//! The reversible record stream emitted by the passes.
//!
//! A pass does not know where its records end up: it writes into a
//! [`CommandSink`](trait.CommandSink.html), and the caller decides whether
//! that is a plain [`CommandBuffer`](struct.CommandBuffer.html), a serializer
//! or a test probe.

use crate::mesh::math::Point;
use crate::mesh::VertexId;

/// A single reversible record.
///
/// Played forward by a decoder, a level's records undo that level:
/// `Vertex` re-introduces a removed vertex, `Face` restores a face that
/// surrounded it, and `DeleteFace` removes a face the rewrite had introduced.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Command {
    /// Re-introduction of a removed vertex (a `v` line in the OBJA form).
    Vertex { vertex: VertexId, position: Point },
    /// A face incident to the removed vertex (an `f` line).
    Face {
        vertex: VertexId,
        a: VertexId,
        b: VertexId,
    },
    /// A face introduced by the rewrite, deleted on playback (a `df` line).
    DeleteFace {
        a: VertexId,
        b: VertexId,
        c: VertexId,
    },
}

/// Receives the records emitted by a conquest pass.
pub trait CommandSink {
    fn add_vertex(&mut self, vertex: VertexId, position: Point);
    fn add_face(&mut self, vertex: VertexId, a: VertexId, b: VertexId);
    fn delete_face(&mut self, a: VertexId, b: VertexId, c: VertexId);
}

/// An append-only buffer of records.
///
/// Besides the records themselves the buffer keeps the order in which
/// vertices were removed: the n-th entry of [`removed`](#method.removed) is
/// the vertex of the n-th `Vertex` record, which is what the OBJA
/// postprocessing uses to renumber vertex references.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommandBuffer {
    commands: Vec<Command>,
    removed: Vec<VertexId>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        CommandBuffer {
            commands: Vec::new(),
            removed: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Removed vertices in emission order (the per-pass `v` sequence).
    pub fn removed(&self) -> &[VertexId] {
        &self.removed
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Moves all records of `other` to the end of this buffer.
    pub fn append(&mut self, mut other: CommandBuffer) {
        self.commands.append(&mut other.commands);
        self.removed.append(&mut other.removed);
    }

    pub fn into_parts(self) -> (Vec<Command>, Vec<VertexId>) {
        (self.commands, self.removed)
    }
}

impl CommandSink for CommandBuffer {
    fn add_vertex(&mut self, vertex: VertexId, position: Point) {
        self.commands.push(Command::Vertex { vertex, position });
        self.removed.push(vertex);
    }

    fn add_face(&mut self, vertex: VertexId, a: VertexId, b: VertexId) {
        self.commands.push(Command::Face { vertex, a, b });
    }

    fn delete_face(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        self.commands.push(Command::DeleteFace { a, b, c });
    }
}
