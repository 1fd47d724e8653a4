use super::Color;

/// Fixed eye color plus an ordered set of skin tones.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    eye: Color,
    skin: Vec<Color>,
}

impl Palette {
    /// Builds a palette. An empty `skin` list is accepted here and reported as
    /// `Error::EmptyPalette` when a color is selected.
    pub fn new(eye: Color, skin: Vec<Color>) -> Self {
        Self { eye, skin }
    }

    /// Light blue eyes and five skin tones from light to deep.
    pub fn face_mosaic() -> Self {
        Self::new(
            Color::rgb(0.6, 0.8, 1.0),
            vec![
                Color::rgb(0.96, 0.76, 0.69),
                Color::rgb(0.87, 0.67, 0.53),
                Color::rgb(0.78, 0.58, 0.48),
                Color::rgb(0.67, 0.45, 0.35),
                Color::rgb(0.56, 0.39, 0.29),
            ],
        )
    }

    #[inline]
    pub fn eye(&self) -> Color {
        self.eye
    }

    #[inline]
    pub fn skin(&self) -> &[Color] {
        &self.skin
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::face_mosaic()
    }
}
