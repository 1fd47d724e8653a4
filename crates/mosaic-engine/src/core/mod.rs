//! Contracts between the window runtime and the application.
//!
//! The runtime drives an [`App`]; each redraw hands it a [`FrameCtx`] that
//! knows how to acquire, record and present one frame.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
