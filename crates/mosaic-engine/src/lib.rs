//! Mosaic engine crate.
//!
//! Normalizes a set of 2D polygons into clip space, classifies them against
//! known eye shapes, picks their colors and renders them as filled fans. The
//! platform side (window, GPU device, frame loop) lives here as well so the
//! studio binary stays a thin shell.

pub mod classify;
pub mod core;
pub mod device;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod paint;
pub mod render;
pub mod window;

pub use error::{Error, Result};
