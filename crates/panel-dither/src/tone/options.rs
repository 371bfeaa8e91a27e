//! Tone mapping options and configuration.

use std::fmt;
use std::str::FromStr;

/// Tone-curve family applied in the contrast stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ToneMode {
    /// Linear slope around the midpoint.
    #[default]
    Contrast,
    /// Symmetric power curve around the midpoint.
    Scurve,
}

impl ToneMode {
    pub fn name(self) -> &'static str {
        match self {
            ToneMode::Contrast => "contrast",
            ToneMode::Scurve => "scurve",
        }
    }
}

impl fmt::Display for ToneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToneMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contrast" => Ok(ToneMode::Contrast),
            "scurve" | "s-curve" => Ok(ToneMode::Scurve),
            other => Err(format!("unknown tone mode '{other}'")),
        }
    }
}

/// Parameters of the tone mapping pass.
///
/// # Defaults
///
/// Exposure, contrast and saturation 1.0, strength 0.5, no shadow or
/// highlight shaping, midpoint 0.5, dynamic-range compression on. With these
/// defaults only the range compression changes pixels.
///
/// ```
/// use panel_dither::{ToneMode, ToneOptions};
///
/// let options = ToneOptions::new()
///     .exposure(1.2)
///     .mode(ToneMode::Scurve)
///     .contrast(1.4);
/// assert_eq!(options.strength, 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneOptions {
    /// Multiplicative gain on every channel.
    pub exposure: f32,
    /// 0.0 = grayscale, 1.0 = unchanged, above 1.0 oversaturates.
    pub saturation: f32,
    pub mode: ToneMode,
    /// Curve slope around the midpoint.
    pub contrast: f32,
    /// Blend between the unmodified and the fully-curved value for the
    /// contrast, shadow and highlight stages.
    pub strength: f32,
    /// Power-law lift below the midpoint; 0.0 disables.
    pub shadow_boost: f32,
    /// Soft-knee roll-off above the midpoint; 0.0 disables.
    pub highlight_compress: f32,
    /// Pivot in 0.0..=1.0.
    pub midpoint: f32,
    /// Squeeze the input into the panel's measured black..white range.
    pub compress_dynamic_range: bool,
}

impl Default for ToneOptions {
    fn default() -> Self {
        Self {
            exposure: 1.0,
            saturation: 1.0,
            mode: ToneMode::Contrast,
            contrast: 1.0,
            strength: 0.5,
            shadow_boost: 0.0,
            highlight_compress: 0.0,
            midpoint: 0.5,
            compress_dynamic_range: true,
        }
    }
}

impl ToneOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that leave every pixel unchanged.
    pub fn identity() -> Self {
        Self::default().compress_dynamic_range(false)
    }

    #[inline]
    pub fn exposure(mut self, exposure: f32) -> Self {
        self.exposure = exposure;
        self
    }

    #[inline]
    pub fn saturation(mut self, saturation: f32) -> Self {
        self.saturation = saturation;
        self
    }

    #[inline]
    pub fn mode(mut self, mode: ToneMode) -> Self {
        self.mode = mode;
        self
    }

    #[inline]
    pub fn contrast(mut self, contrast: f32) -> Self {
        self.contrast = contrast;
        self
    }

    #[inline]
    pub fn strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }

    #[inline]
    pub fn shadow_boost(mut self, shadow_boost: f32) -> Self {
        self.shadow_boost = shadow_boost;
        self
    }

    #[inline]
    pub fn highlight_compress(mut self, highlight_compress: f32) -> Self {
        self.highlight_compress = highlight_compress;
        self
    }

    #[inline]
    pub fn midpoint(mut self, midpoint: f32) -> Self {
        self.midpoint = midpoint;
        self
    }

    #[inline]
    pub fn compress_dynamic_range(mut self, enabled: bool) -> Self {
        self.compress_dynamic_range = enabled;
        self
    }
}
