use rand::Rng;

use crate::classify::Classification;
use crate::error::{Error, Result};

use super::{Color, Palette};

/// Picks the fill color for a classified polygon.
///
/// - `Eye` always yields the palette's eye color.
/// - `Skin` yields a uniformly chosen skin tone drawn from `rng`.
///
/// A palette without skin tones is a configuration error for either class.
pub fn select_color<R>(classification: Classification, palette: &Palette, rng: &mut R) -> Result<Color>
where
    R: Rng + ?Sized,
{
    let skin = palette.skin();
    if skin.is_empty() {
        return Err(Error::EmptyPalette);
    }

    Ok(match classification {
        Classification::Eye => palette.eye(),
        Classification::Skin => skin[rng.gen_range(0..skin.len())],
    })
}

/// A palette paired with the random source used for skin tones.
///
/// Seed the RNG for reproducible output; use an entropy-seeded one for variety.
#[derive(Debug, Clone)]
pub struct ColorSelector<R> {
    palette: Palette,
    rng: R,
}

impl<R: Rng> ColorSelector<R> {
    pub fn new(palette: Palette, rng: R) -> Self {
        Self { palette, rng }
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn select(&mut self, classification: Classification) -> Result<Color> {
        select_color(classification, &self.palette, &mut self.rng)
    }
}
