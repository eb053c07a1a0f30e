//! One decimation level, and the driver that chains levels.

use crate::cleaning::cleaning_pass;
use crate::command::{Command, CommandBuffer};
use crate::decimating::decimating_pass;
use crate::error::DecimationError;
use crate::mesh::{TriangleMesh, VertexId};
use crate::sew::sew_pass;
use crate::DecimateOptions;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The records of one decimation level, assembled in decoder order.
///
/// Within a level the decoder must undo the sew pass first and the
/// decimating pass last, so the buffers are concatenated in reverse pass
/// order.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelCommands {
    pub commands: Vec<Command>,
    /// Removed vertices, parallel to the `Vertex` records in `commands`.
    pub removed: Vec<VertexId>,
}

/// Runs the three passes of one decimation level.
pub fn decimate_one_level(
    mesh: &mut TriangleMesh,
    seed: u64,
) -> Result<LevelCommands, DecimationError> {
    let mut decimating = CommandBuffer::new();
    decimating_pass(mesh, &mut decimating, seed)?;

    let mut cleaning = CommandBuffer::new();
    cleaning_pass(mesh, &mut cleaning)?;

    let mut level = CommandBuffer::new();
    sew_pass(mesh, &mut level)?;

    level.append(cleaning);
    level.append(decimating);
    let (commands, removed) = level.into_parts();
    Ok(LevelCommands { commands, removed })
}

/// Drives [`decimate_one_level`](fn.decimate_one_level.html) until the mesh
/// is small enough.
///
/// # Examples
///
/// ```
/// use maille_decimation::{DecimateOptions, Decimator};
/// # use maille_decimation::mesh::MeshBuilder;
/// # use maille_decimation::mesh::math::point;
/// # let mut builder = MeshBuilder::new();
/// # let a = builder.vertex(point(0.0, 0.0, 0.0));
/// # let b = builder.vertex(point(1.0, 0.0, 0.0));
/// # let c = builder.vertex(point(0.0, 1.0, 0.0));
/// # let d = builder.vertex(point(0.0, 0.0, 1.0));
/// # builder.triangle(a, b, c);
/// # builder.triangle(a, c, d);
/// # builder.triangle(a, d, b);
/// # builder.triangle(b, d, c);
/// # let mut mesh = builder.build().unwrap();
/// let options = DecimateOptions::seed(7).with_min_vertices(4);
/// let levels = Decimator::new().simplify(&mut mesh, 4, &options).unwrap();
/// ```
#[derive(Clone, Debug, Default)]
pub struct Decimator {}

impl Decimator {
    pub fn new() -> Self {
        Decimator {}
    }

    /// Runs up to `max_levels` decimation levels.
    ///
    /// Stops early when fewer than `options.min_vertices` active vertices
    /// remain or when a level removes nothing. Returns the levels oldest
    /// first; the decoder plays them back newest first.
    pub fn simplify(
        &mut self,
        mesh: &mut TriangleMesh,
        max_levels: usize,
        options: &DecimateOptions,
    ) -> Result<Vec<LevelCommands>, DecimationError> {
        let mut rng = StdRng::seed_from_u64(options.seed);
        let mut levels = Vec::new();
        for index in 0..max_levels {
            if mesh.active_vertex_count() < options.min_vertices {
                break;
            }
            let level = decimate_one_level(mesh, rng.gen())?;
            if level.commands.is_empty() {
                // Nothing left that any pass can remove.
                break;
            }
            log::debug!(
                "level {}: {} vertices removed, {} active left",
                index,
                level.removed.len(),
                mesh.active_vertex_count()
            );
            levels.push(level);
        }
        Ok(levels)
    }
}
