//! Eye/skin classification by exact outline match.
//!
//! A polygon is an eye only if it is structurally identical to a known eye
//! outline: same points, same order, same count. There is no geometric
//! similarity test, so a reordered copy of an eye outline is skin.

use crate::geometry::Polygon;

/// Region a polygon represents in the mosaic.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Classification {
    Eye,
    Skin,
}

/// Canonical eye outlines, compared by value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnownEyeShapes {
    shapes: Vec<Polygon>,
}

impl KnownEyeShapes {
    pub fn new(shapes: Vec<Polygon>) -> Self {
        Self { shapes }
    }

    /// The two eye outlines of the face mosaic dataset, in source coordinates.
    pub fn face_mosaic() -> Self {
        Self::new(vec![
            // right eye
            Polygon::from_coords(&[(534.0, 516.0), (581.0, 514.0), (583.0, 556.0), (536.0, 559.0)]),
            // left eye
            Polygon::from_coords(&[(205.0, 509.0), (249.0, 512.0), (245.0, 552.0), (204.0, 552.0)]),
        ])
    }

    #[inline]
    pub fn shapes(&self) -> &[Polygon] {
        &self.shapes
    }

    pub fn classify(&self, polygon: &Polygon) -> Classification {
        if self.shapes.iter().any(|eye| eye == polygon) {
            Classification::Eye
        } else {
            Classification::Skin
        }
    }
}
