#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]

//! Progressive decimation of closed triangle meshes.
//!
//! ## Overview
//!
//! One decimation level chains three traversals over the connectivity store
//! of [maille_mesh](https://docs.rs/maille_mesh/):
//!
//! * The **Decimating Conquest** walks the mesh breadth-first over gates,
//!   removes a maximal independent set of low-valence vertices and
//!   retriangulates each patch left behind, driven by a two-coloring
//!   (*parity*) of the conquered vertices.
//! * The **Cleaning Conquest** walks again and removes the valence-3
//!   vertices the first pass left behind.
//! * The **Sew Conquest** sweeps the surviving vertices, collapses the
//!   degenerate valence-2 bubbles the cleaning created and flags pinched
//!   rings.
//!
//! Every removal appends reversible records to a [`CommandBuffer`]: the
//! removed vertex, the faces that surrounded it, and the faces the rewrite
//! introduced. Played back in reverse level order the records rebuild the
//! original mesh exactly, so the scheme is lossless. Serialization of the
//! records to the line-oriented progressive format lives in `maille_obj`.
//!
//! The initial gate of the decimating traversal is drawn from a seeded RNG;
//! two runs with the same seed on the same input produce identical command
//! streams.
//!
//! This crate is reexported in [maille](https://docs.rs/maille/).
//!
//! ## Example
//!
//! ```
//! use maille_decimation::{DecimateOptions, Decimator};
//! use maille_decimation::mesh::MeshBuilder;
//! use maille_decimation::mesh::math::point;
//!
//! let mut builder = MeshBuilder::new();
//! let a = builder.vertex(point(0.0, 0.0, 0.0));
//! let b = builder.vertex(point(1.0, 0.0, 0.0));
//! let c = builder.vertex(point(0.0, 1.0, 0.0));
//! let d = builder.vertex(point(0.0, 0.0, 1.0));
//! builder.triangle(a, b, c);
//! builder.triangle(a, c, d);
//! builder.triangle(a, d, b);
//! builder.triangle(b, d, c);
//! let mut mesh = builder.build().unwrap();
//!
//! let options = DecimateOptions::DEFAULT.with_min_vertices(4);
//! let levels = Decimator::new()
//!     .simplify(&mut mesh, 1, &options)
//!     .unwrap();
//! assert_eq!(levels.len(), 1);
//! ```

pub use maille_mesh as mesh;

mod cleaning;
mod command;
mod decimating;
mod error;
mod level;
pub mod replay;
mod retriangulate;
mod sew;

#[cfg(test)]
mod conquest_tests;

#[doc(inline)]
pub use crate::command::*;

#[doc(inline)]
pub use crate::error::*;

#[doc(inline)]
pub use crate::level::*;

pub use crate::cleaning::cleaning_pass;
pub use crate::decimating::decimating_pass;
pub use crate::sew::sew_pass;

/// The two-coloring of conquered vertices that drives the retriangulation
/// case table. Pass-local: it never survives into the next pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Parity {
    Plus,
    Minus,
}

impl Parity {
    pub fn is_minus(self) -> bool {
        self == Parity::Minus
    }
}

/// Per-gate traversal state. Presence in the status map is what the passes
/// test for; the two variants record how the face was decided.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FaceStatus {
    Conquered,
    Null,
}

/// Parameters for the decimation driver.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
#[non_exhaustive]
pub struct DecimateOptions {
    /// Seed for the initial-gate choice of every decimating traversal.
    ///
    /// Default value: `0`.
    pub seed: u64,

    /// The driver stops once fewer active vertices remain.
    ///
    /// Default value: `DecimateOptions::DEFAULT_MIN_VERTICES`.
    pub min_vertices: usize,
}

impl DecimateOptions {
    pub const DEFAULT_MIN_VERTICES: usize = 10;

    pub const DEFAULT: Self = DecimateOptions {
        seed: 0,
        min_vertices: Self::DEFAULT_MIN_VERTICES,
    };

    #[inline]
    pub fn seed(seed: u64) -> Self {
        Self::DEFAULT.with_seed(seed)
    }

    #[inline]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[inline]
    pub const fn with_min_vertices(mut self, min_vertices: usize) -> Self {
        self.min_vertices = min_vertices;
        self
    }
}

impl Default for DecimateOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}
