use crate::error::{Error, Result};

use super::{Axis, BoundingBox, Point, Scene};

/// Per-axis scale + translate from source space into `[-1, 1] x [-1, 1]`.
///
/// Scale factors are independent, so the scene's aspect ratio is not kept.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub scale_x: f32,
    pub scale_y: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl Transform {
    /// Maps a source point into the unit square, without the vertical flip.
    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        (p + Point::new(self.translate_x, self.translate_y))
            * Point::new(self.scale_x, self.scale_y)
    }

    /// Maps a source point into NDC.
    ///
    /// Source +Y points down while NDC +Y points up, so `y` is negated.
    #[inline]
    pub fn to_ndc(&self, p: Point) -> [f32; 2] {
        let n = self.apply(p);
        [n.x, -n.y]
    }
}

/// Derives the transform mapping `scene`'s bounding box onto the unit square.
///
/// Errors:
/// - [`Error::EmptyInput`] if the scene has no points at all
/// - [`Error::DegenerateGeometry`] if the box has zero extent on an axis
pub fn compute_transform(scene: &Scene) -> Result<Transform> {
    let bounds = BoundingBox::from_points(scene.points()).ok_or(Error::EmptyInput)?;

    let (scale_x, translate_x) = axis_mapping(bounds, Axis::X)?;
    let (scale_y, translate_y) = axis_mapping(bounds, Axis::Y)?;

    let transform = Transform {
        scale_x,
        scale_y,
        translate_x,
        translate_y,
    };

    log::debug!("scene bounds {bounds:?} -> {transform:?}");
    Ok(transform)
}

/// Scale and translation for one axis.
///
/// Every intermediate must be finite: NaN or infinite coordinates, a zero
/// extent, and extents or centers that overflow `f32` are all degenerate.
fn axis_mapping(bounds: BoundingBox, axis: Axis) -> Result<(f32, f32)> {
    let (extent, center) = match axis {
        Axis::X => (bounds.width(), bounds.center().x),
        Axis::Y => (bounds.height(), bounds.center().y),
    };
    let scale = 2.0 / extent;

    let usable = bounds.is_finite(axis)
        && extent.is_finite()
        && extent > 0.0
        && scale.is_finite()
        && center.is_finite();

    if usable {
        Ok((scale, -center))
    } else {
        Err(Error::DegenerateGeometry { axis })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;

    const EPS: f32 = 1e-6;

    fn scene(polys: &[&[(f32, f32)]]) -> Scene {
        polys.iter().map(|p| Polygon::from_coords(p)).collect()
    }

    fn assert_close(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn bounding_box_corners_map_to_unit_square() {
        let s = scene(&[
            &[(63.0, 41.0), (400.0, 500.0), (730.0, 900.0)],
            &[(300.0, 1080.0), (500.0, 600.0), (100.0, 200.0)],
        ]);
        let t = compute_transform(&s).unwrap();

        assert_close(t.apply(Point::new(63.0, 41.0)), Point::new(-1.0, -1.0));
        assert_close(t.apply(Point::new(730.0, 1080.0)), Point::new(1.0, 1.0));
    }

    #[test]
    fn scales_axes_independently() {
        let s = scene(&[&[(0.0, 0.0), (10.0, 0.0), (10.0, 2.0)]]);
        let t = compute_transform(&s).unwrap();

        assert_eq!(t.scale_x, 0.2);
        assert_eq!(t.scale_y, 1.0);
        assert_eq!(t.translate_x, -5.0);
        assert_eq!(t.translate_y, -1.0);
    }

    #[test]
    fn ndc_flips_the_vertical_axis() {
        let s = scene(&[&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0)]]);
        let t = compute_transform(&s).unwrap();

        // Source top-left (y = 0) is the top of NDC (y = +1).
        assert_eq!(t.to_ndc(Point::new(0.0, 0.0)), [-1.0, 1.0]);
        assert_eq!(t.to_ndc(Point::new(2.0, 2.0)), [1.0, -1.0]);
    }

    #[test]
    fn empty_scene_is_rejected() {
        assert_eq!(compute_transform(&Scene::default()), Err(Error::EmptyInput));
        let only_empty = Scene::new(vec![Polygon::default(), Polygon::default()]);
        assert_eq!(compute_transform(&only_empty), Err(Error::EmptyInput));
    }

    #[test]
    fn single_point_is_degenerate() {
        let s = scene(&[&[(5.0, 5.0)]]);
        assert_eq!(
            compute_transform(&s),
            Err(Error::DegenerateGeometry { axis: Axis::X })
        );
    }

    #[test]
    fn shared_x_is_degenerate() {
        let s = scene(&[&[(3.0, 0.0), (3.0, 4.0), (3.0, 9.0)]]);
        assert_eq!(
            compute_transform(&s),
            Err(Error::DegenerateGeometry { axis: Axis::X })
        );
    }

    #[test]
    fn shared_y_is_degenerate() {
        let s = scene(&[&[(0.0, 7.0), (4.0, 7.0)], &[(9.0, 7.0)]]);
        assert_eq!(
            compute_transform(&s),
            Err(Error::DegenerateGeometry { axis: Axis::Y })
        );
    }

    #[test]
    fn nan_coordinate_is_degenerate() {
        let s = scene(&[&[(f32::NAN, 0.0), (0.0, 0.0), (4.0, 4.0)]]);
        assert_eq!(
            compute_transform(&s),
            Err(Error::DegenerateGeometry { axis: Axis::X })
        );

        // Not only when it comes first.
        let s = scene(&[&[(0.0, 0.0), (4.0, 4.0), (2.0, f32::NAN)]]);
        assert_eq!(
            compute_transform(&s),
            Err(Error::DegenerateGeometry { axis: Axis::Y })
        );
    }

    #[test]
    fn infinite_coordinate_is_degenerate() {
        let s = scene(&[&[(f32::INFINITY, 0.0), (0.0, 0.0), (4.0, 4.0)]]);
        assert_eq!(
            compute_transform(&s),
            Err(Error::DegenerateGeometry { axis: Axis::X })
        );
    }

    #[test]
    fn overflowing_extent_is_degenerate() {
        let s = scene(&[&[(-3e38, 0.0), (3e38, 0.0), (0.0, 4.0)]]);
        assert_eq!(
            compute_transform(&s),
            Err(Error::DegenerateGeometry { axis: Axis::X })
        );
    }

    #[test]
    fn overflowing_center_is_degenerate() {
        let s = scene(&[&[(0.0, 3e38), (4.0, 3.2e38), (2.0, 3.1e38)]]);
        assert_eq!(
            compute_transform(&s),
            Err(Error::DegenerateGeometry { axis: Axis::Y })
        );
    }
}
