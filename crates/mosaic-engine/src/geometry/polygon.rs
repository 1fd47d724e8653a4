use serde::{Deserialize, Serialize};

use super::Point;

/// Ordered fan-vertex list of a filled shape.
///
/// Point order is preserved exactly: it defines the fan triangulation and takes
/// part in structural equality.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    #[inline]
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Builds a polygon from `(x, y)` pairs.
    pub fn from_coords(coords: &[(f32, f32)]) -> Self {
        Self::new(coords.iter().copied().map(Point::from).collect())
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromIterator<Point> for Polygon {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Ordered polygon list. Order is paint order: later polygons cover earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scene {
    polygons: Vec<Polygon>,
}

impl Scene {
    #[inline]
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    #[inline]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Iterates every point of every polygon in scene order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.polygons.iter().flat_map(|p| p.points().iter().copied())
    }
}

impl FromIterator<Polygon> for Scene {
    fn from_iter<I: IntoIterator<Item = Polygon>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
