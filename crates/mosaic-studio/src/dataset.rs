//! Face mosaic dataset loading.
//!
//! The dataset is JSON: `polygons` is the scene in draw order and `eyes` holds
//! the exact eye outlines. Every polygon is an array of `[x, y]` pairs.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use mosaic_engine::classify::KnownEyeShapes;
use mosaic_engine::geometry::{Polygon, Scene};

/// Dataset bundled with the binary.
const FACE_MOSAIC_JSON: &str = include_str!("../assets/face_mosaic.json");

#[derive(Debug, Deserialize)]
struct RawDataset {
    #[serde(default)]
    eyes: Vec<Polygon>,
    polygons: Vec<Polygon>,
}

/// A scene plus the eye outlines it is classified against.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub scene: Scene,
    pub eyes: KnownEyeShapes,
    /// Entries dropped for having fewer than three points.
    pub skipped: usize,
}

impl Dataset {
    pub fn embedded() -> Result<Self> {
        Self::parse(FACE_MOSAIC_JSON).context("bundled face mosaic dataset is invalid")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset {}", path.display()))?;
        Self::parse(&json).with_context(|| format!("failed to parse dataset {}", path.display()))
    }

    /// Parses a dataset, dropping polygons that cannot form a filled fan.
    pub fn parse(json: &str) -> Result<Self> {
        let raw: RawDataset = serde_json::from_str(json)?;

        let total = raw.polygons.len();
        let scene: Scene = raw
            .polygons
            .into_iter()
            .enumerate()
            .filter(|(index, polygon)| {
                let keep = polygon.len() >= 3;
                if !keep {
                    log::warn!("skipping polygon #{index}: {} point(s)", polygon.len());
                }
                keep
            })
            .map(|(_, polygon)| polygon)
            .collect();

        let skipped = total - scene.len();
        log::debug!(
            "dataset: {} polygons ({skipped} skipped), {} eye outlines",
            scene.len(),
            raw.eyes.len()
        );

        Ok(Self {
            scene,
            eyes: KnownEyeShapes::new(raw.eyes),
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_engine::classify::Classification;
    use mosaic_engine::geometry::compute_transform;

    #[test]
    fn bundled_dataset_loads() {
        let dataset = Dataset::embedded().unwrap();

        assert_eq!(dataset.scene.len(), 195);
        assert_eq!(dataset.skipped, 4);
        assert_eq!(dataset.eyes, KnownEyeShapes::face_mosaic());
        assert!(dataset.scene.polygons().iter().all(|p| p.len() >= 3));
    }

    #[test]
    fn bundled_dataset_contains_both_eyes() {
        let dataset = Dataset::embedded().unwrap();
        let eyes = dataset
            .scene
            .polygons()
            .iter()
            .filter(|p| dataset.eyes.classify(p) == Classification::Eye)
            .count();

        assert_eq!(eyes, 2);
    }

    #[test]
    fn bundled_dataset_normalizes() {
        let dataset = Dataset::embedded().unwrap();
        let t = compute_transform(&dataset.scene).unwrap();

        const EPS: f32 = 1e-5;
        for p in dataset.scene.points() {
            let [x, y] = t.to_ndc(p);
            assert!(x.abs() <= 1.0 + EPS, "x out of range: {x}");
            assert!(y.abs() <= 1.0 + EPS, "y out of range: {y}");
        }
    }

    #[test]
    fn short_polygons_are_dropped() {
        let json = r#"{
            "polygons": [
                [[0, 0], [4, 0], [0, 4]],
                [[1, 1], [2, 2]],
                [[5, 5]],
                [[0, 0], [4, 4], [4, 0], [0, 4]]
            ]
        }"#;
        let dataset = Dataset::parse(json).unwrap();

        assert_eq!(dataset.skipped, 2);
        let counts: Vec<_> = dataset.scene.polygons().iter().map(|p| p.len()).collect();
        assert_eq!(counts, vec![3, 4]);
        assert!(dataset.eyes.shapes().is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Dataset::parse(r#"{ "polygons": [[[0, 0, 0]]] }"#).is_err());
        assert!(Dataset::parse("[]").is_err());
    }
}
