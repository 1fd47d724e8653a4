use std::path::PathBuf;

use anyhow::{Context, Result};

use mosaic_engine::paint::Color;

/// Environment variable holding a fixed color seed.
pub const SEED_VAR: &str = "MOSAIC_SEED";

/// Studio settings resolved at startup.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub background: Color,

    /// Seed for skin tone selection. Every redraw of one run reuses it.
    pub seed: u64,

    /// Dataset to load instead of the bundled one.
    pub dataset: Option<PathBuf>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            background: Color::white(),
            seed: rand::random(),
            dataset: None,
        }
    }
}

impl StudioConfig {
    /// Reads `MOSAIC_SEED` and an optional dataset path from the first argument.
    pub fn from_env() -> Result<Self> {
        let seed = std::env::var(SEED_VAR).ok();
        let dataset = std::env::args_os().nth(1).map(PathBuf::from);
        Self::resolve(seed.as_deref(), dataset)
    }

    fn resolve(seed: Option<&str>, dataset: Option<PathBuf>) -> Result<Self> {
        let mut config = Self {
            dataset,
            ..Self::default()
        };

        if let Some(raw) = seed {
            config.seed = raw
                .trim()
                .parse()
                .with_context(|| format!("{SEED_VAR} must be an unsigned integer, got {raw:?}"))?;
        }

        Ok(config)
    }
}
