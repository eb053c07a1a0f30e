#![deny(bare_trait_objects)]

//! OBJ input and progressive OBJA output.
//!
//! The parser reads the subset of Wavefront OBJ that carries connectivity
//! (`v` and `f` lines) into a `maille_mesh::TriangleMesh`. The writers
//! produce either a plain OBJ snapshot of the active mesh or the
//! line-oriented progressive OBJA stream: the decimated mesh followed by the
//! per-level command records, `df` references renumbered to face ordinals
//! and vertex references renumbered to their position in the file.
//!
//! This crate is reexported in [maille](https://docs.rs/maille/) behind the
//! `obj` feature.

pub mod parser;
pub mod writer;

#[doc(inline)]
pub use crate::parser::{parse_obj, parse_obj_builder, LoadError, ParseError};
#[doc(inline)]
pub use crate::writer::{write_obj, write_obja, ObjaError};
