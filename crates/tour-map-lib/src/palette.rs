//! Track colors and the per-directory palette cycle

use crate::{MapError, Result};
use serde::Serialize;

/// Named line colors understood by Leaflet (CSS color names)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Blue,
    Green,
    Red,
    Purple,
}

impl Color {
    pub fn css_name(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Red => "red",
            Self::Purple => "purple",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.css_name())
    }
}

/// Fixed, non-empty list of colors handed out round-robin
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Colors used for tours: blue, green, red, purple
    pub const TOURS: [Color; 4] = [Color::Blue, Color::Green, Color::Red, Color::Purple];

    pub fn new(colors: Vec<Color>) -> Result<Self> {
        if colors.is_empty() {
            return Err(MapError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Start a fresh cycle at the first color
    pub fn cycle(&self) -> PaletteCycle<'_> {
        PaletteCycle {
            palette: self,
            next_index: 0,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: Self::TOURS.to_vec(),
        }
    }
}

/// Position in a palette. Each loader call owns one, so cycles never share state.
#[derive(Debug)]
pub struct PaletteCycle<'a> {
    palette: &'a Palette,
    next_index: usize,
}

impl PaletteCycle<'_> {
    /// Return the current color and advance to the next one
    pub fn next_color(&mut self) -> Color {
        let colors = self.palette.colors();
        let color = colors[self.next_index];
        self.next_index = (self.next_index + 1) % colors.len();
        color
    }
}
