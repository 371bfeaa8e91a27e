//! Linear-light RGB color type
//!
//! Used where light has to add up physically: luminance for range
//! compression and the input to Oklab.

use super::lut::srgb8_to_linear;
use super::srgb::Srgb;

/// A color in linear RGB, channels nominally in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl LinearRgb {
    #[inline]
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Relative luminance (Rec. 709 / sRGB primaries).
    #[inline]
    pub fn luminance(self) -> f32 {
        0.2126729 * self.r + 0.7151522 * self.g + 0.0721750 * self.b
    }

    #[inline]
    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }
}

impl From<Srgb> for LinearRgb {
    fn from(srgb: Srgb) -> Self {
        Self {
            r: srgb8_to_linear(srgb.r),
            g: srgb8_to_linear(srgb.g),
            b: srgb8_to_linear(srgb.b),
        }
    }
}
