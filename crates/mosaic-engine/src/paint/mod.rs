//! Colors and color selection.
//!
//! Scope:
//! - color representation (straight RGBA)
//! - the fixed eye/skin palette
//! - eye/skin color selection with an injected RNG

pub mod color;
pub mod palette;
pub mod selector;

pub use color::Color;
pub use palette::Palette;
pub use selector::{select_color, ColorSelector};
