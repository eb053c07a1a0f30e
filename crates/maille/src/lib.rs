#![deny(bare_trait_objects)]

//! Progressive, lossless triangle-mesh compression by valence-driven
//! conquest.
//!
//! # Crates
//!
//! This meta-crate (`maille`) reexports the following sub-crates for
//! convenience:
//!
//! * **maille_mesh** - The triangle connectivity store: vertices, gates
//!   (directed half-edges) and patch rings.
//! * **maille_decimation** - The decimation engine: the decimating,
//!   cleaning and sew conquests, the reversible command stream and the
//!   level driver.
//! * **maille_obj** - OBJ input and progressive OBJA output (behind the
//!   `obj` feature flag).
//!
//! Each `maille_<name>` crate is reexported as a `<name>` module here, so
//! `use maille::decimation::Decimator;` is equivalent to
//! `use maille_decimation::Decimator;`.
//!
//! # Example
//!
//! ```
//! use maille::decimation::{DecimateOptions, Decimator};
//! use maille::mesh::MeshBuilder;
//! use maille::mesh::math::point;
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
//! let options = DecimateOptions::seed(1).with_min_vertices(4);
//! let levels = Decimator::new().simplify(&mut mesh, 2, &options).unwrap();
//! assert!(!levels.is_empty());
//! ```

pub use maille_decimation as decimation;
pub use maille_mesh as mesh;
#[cfg(feature = "obj")]
pub use maille_obj as obj;
