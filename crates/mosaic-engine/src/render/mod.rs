//! Polygon rendering.
//!
//! The [`Renderer`] turns a scene into surface commands (clear, vertex upload,
//! color, triangle fan) against any [`DrawSurface`]. [`DrawList`] records those
//! commands; [`PolygonPipeline`] replays a recorded list on the GPU with wgpu.
//!
//! Convention:
//! - vertices reach the surface already in NDC (+Y up)
//! - colors are straight RGBA written without conversion

mod ctx;
mod list;
mod pipeline;
mod renderer;
mod surface;

pub mod fan;
pub mod shader;

pub use ctx::{RenderCtx, RenderTarget};
pub use list::{DrawCmd, DrawList, FanDraw};
pub use pipeline::PolygonPipeline;
pub use renderer::Renderer;
pub use shader::{ShaderProgram, ShaderStage};
pub use surface::DrawSurface;
