use std::fmt;

use super::Point;

/// Coordinate axis, used to report which extent collapsed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}

/// Smallest axis-aligned rectangle containing a set of points (source space).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    /// Folds `points` into their bounding box in a single pass.
    ///
    /// Returns `None` when the iterator is empty. A NaN coordinate poisons the
    /// corresponding `min`/`max` instead of being skipped, so callers can
    /// detect it with [`is_finite`](Self::is_finite).
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => BoundingBox { min: p, max: p },
                Some(b) => b.include(p),
            })
        })
    }

    /// Grows the box to contain `p`.
    #[inline]
    pub fn include(self, p: Point) -> Self {
        Self {
            min: Point::new(nan_min(self.min.x, p.x), nan_min(self.min.y, p.y)),
            max: Point::new(nan_max(self.max.x, p.x), nan_max(self.max.y, p.y)),
        }
    }

    /// True when both corners on `axis` are finite.
    #[inline]
    pub fn is_finite(self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.min.x.is_finite() && self.max.x.is_finite(),
            Axis::Y => self.min.y.is_finite() && self.max.y.is_finite(),
        }
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(self) -> Point {
        Point::new((self.max.x + self.min.x) / 2.0, (self.max.y + self.min.y) / 2.0)
    }
}

// `f32::min`/`f32::max` drop NaN operands; these keep them.
#[inline]
fn nan_min(a: f32, b: f32) -> f32 {
    if a.is_nan() || b.is_nan() {
        f32::NAN
    } else {
        a.min(b)
    }
}

#[inline]
fn nan_max(a: f32, b: f32) -> f32 {
    if a.is_nan() || b.is_nan() {
        f32::NAN
    } else {
        a.max(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_has_no_box() {
        assert_eq!(BoundingBox::from_points(std::iter::empty()), None);
    }

    #[test]
    fn tracks_each_axis_independently() {
        let b = BoundingBox::from_points([
            Point::new(3.0, -1.0),
            Point::new(-2.0, 4.0),
            Point::new(1.0, 1.0),
        ])
        .unwrap();

        assert_eq!(b.min, Point::new(-2.0, -1.0));
        assert_eq!(b.max, Point::new(3.0, 4.0));
        assert_eq!(b.width(), 5.0);
        assert_eq!(b.height(), 5.0);
        assert_eq!(b.center(), Point::new(0.5, 1.5));
    }

    #[test]
    fn nan_coordinate_is_not_skipped() {
        let b = BoundingBox::from_points([
            Point::new(0.0, 0.0),
            Point::new(f32::NAN, 2.0),
            Point::new(4.0, 4.0),
        ])
        .unwrap();

        assert!(b.min.x.is_nan() && b.max.x.is_nan());
        assert!(!b.is_finite(Axis::X));
        assert!(b.is_finite(Axis::Y));
    }

    #[test]
    fn infinite_coordinate_is_not_finite() {
        let b = BoundingBox::from_points([Point::new(0.0, f32::NEG_INFINITY), Point::new(1.0, 1.0)])
            .unwrap();

        assert!(b.is_finite(Axis::X));
        assert!(!b.is_finite(Axis::Y));
    }
}
