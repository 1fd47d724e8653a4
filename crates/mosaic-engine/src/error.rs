use thiserror::Error;

use crate::geometry::Axis;
use crate::render::ShaderStage;

/// Errors raised by the normalization and polygon rendering pipeline.
///
/// None of these are transient. They signal malformed input or an unusable
/// shader pipeline, and the caller decides whether to abort.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The scene has no polygons, or none of its polygons have points.
    #[error("scene contains no points to normalize")]
    EmptyInput,

    /// All points share one coordinate on `axis`, so the scale would be infinite.
    #[error("degenerate geometry: every point has the same {axis} coordinate")]
    DegenerateGeometry { axis: Axis },

    /// The palette has no skin colors to choose from.
    #[error("palette has no skin colors")]
    EmptyPalette,

    #[error("failed to compile {stage} shader:\n{diagnostic}")]
    ShaderCompile {
        stage: ShaderStage,
        diagnostic: String,
    },

    #[error("failed to link shader program: {diagnostic}")]
    ShaderLink { diagnostic: String },

    /// A draw operation was issued before `Renderer::initialize` succeeded.
    #[error("renderer is not initialized")]
    NotInitialized,

    /// A triangle fan needs at least three vertices.
    #[error("polygon has {count} points; a filled fan needs at least 3")]
    TooFewVertices { count: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
