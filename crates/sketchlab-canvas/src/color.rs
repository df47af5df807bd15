//! RGBA colors as used by 2D canvas fill and stroke styles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel RGB color with a floating-point alpha in `0.0..=1.0`.
///
/// Displays as a CSS `rgba(r,g,b,a)` string, matching what a canvas
/// `fillStyle` accepts. Deserialized alphas go through [`Rgba::new`] and are
/// clamped the same way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRgba")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    pub const GRAY: Self = Self::opaque(128, 128, 128);

    /// A color with explicit alpha. Alpha is clamped to `0.0..=1.0`.
    pub fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r,
            g,
            b,
            a: a.clamp(0.0, 1.0),
        }
    }

    /// A fully opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// The same color with a different alpha.
    #[must_use]
    pub fn with_alpha(self, a: f32) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Normalized `[r, g, b, a]` channels in `0.0..=1.0`, ready for a vertex
    /// buffer.
    pub fn to_f32_array(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a,
        ]
    }
}

/// Wire form of [`Rgba`] before the alpha clamp.
#[derive(Deserialize)]
struct RawRgba {
    r: u8,
    g: u8,
    b: u8,
    a: f32,
}

impl From<RawRgba> for Rgba {
    fn from(raw: RawRgba) -> Self {
        Rgba::new(raw.r, raw.g, raw.b, raw.a)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}
