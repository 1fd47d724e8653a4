//! Source-space geometry and the normalization transform.
//!
//! Source space:
//! - pixel-like units, arbitrary origin
//! - +X right, +Y down
//!
//! `Transform` maps a scene's bounding box onto `[-1, 1] x [-1, 1]`. The
//! vertical flip into NDC (+Y up) happens in `Transform::to_ndc`.

mod bounds;
mod point;
mod polygon;
mod transform;

pub use bounds::{Axis, BoundingBox};
pub use point::Point;
pub use polygon::{Polygon, Scene};
pub use transform::{compute_transform, Transform};
