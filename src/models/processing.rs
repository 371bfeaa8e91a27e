use std::fmt::Display;
use std::str::FromStr;

use panel_dither::{DistanceMetric, DitherAlgorithm, DitherOptions, ToneMode, ToneOptions};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// Per-invocation processing parameters.
///
/// Always fully populated: a missing or unreadable field keeps its default
/// while the remaining fields are still read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessingSettings {
    pub exposure: f32,
    pub saturation: f32,
    pub tone_mode: ToneMode,
    pub contrast: f32,
    pub strength: f32,
    pub shadow_boost: f32,
    pub highlight_compress: f32,
    pub midpoint: f32,
    pub color_method: DistanceMetric,
    pub dither_algorithm: DitherAlgorithm,
    pub compress_dynamic_range: bool,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            exposure: 1.0,
            saturation: 1.0,
            tone_mode: ToneMode::Contrast,
            contrast: 1.0,
            strength: 0.5,
            shadow_boost: 0.0,
            highlight_compress: 0.0,
            midpoint: 0.5,
            color_method: DistanceMetric::Rgb,
            dither_algorithm: DitherAlgorithm::FloydSteinberg,
            compress_dynamic_range: true,
        }
    }
}

impl ProcessingSettings {
    /// Read the `processing:` section one key at a time.
    ///
    /// Anything other than a mapping yields the defaults.
    pub fn from_yaml(value: &Value) -> Self {
        let mut settings = Self::default();
        let Some(map) = value.as_mapping() else {
            if !value.is_null() {
                tracing::warn!("processing section is not a mapping, using defaults");
            }
            return settings;
        };

        number(map, "exposure", &mut settings.exposure);
        number(map, "saturation", &mut settings.saturation);
        named(map, "toneMode", &mut settings.tone_mode);
        number(map, "contrast", &mut settings.contrast);
        number(map, "strength", &mut settings.strength);
        number(map, "shadowBoost", &mut settings.shadow_boost);
        number(map, "highlightCompress", &mut settings.highlight_compress);
        number(map, "midpoint", &mut settings.midpoint);
        named(map, "colorMethod", &mut settings.color_method);
        named(map, "ditherAlgorithm", &mut settings.dither_algorithm);

        if let Some(v) = map.get("compressDynamicRange") {
            match v.as_bool() {
                Some(b) => settings.compress_dynamic_range = b,
                None => tracing::warn!(
                    field = "compressDynamicRange",
                    value = ?v,
                    "Invalid setting, using default"
                ),
            }
        }

        if !(0.0..=1.0).contains(&settings.midpoint) {
            tracing::warn!(
                midpoint = settings.midpoint,
                "midpoint outside 0..1, using default"
            );
            settings.midpoint = Self::default().midpoint;
        }

        settings
    }

    pub fn tone_options(&self) -> ToneOptions {
        ToneOptions::new()
            .exposure(self.exposure)
            .saturation(self.saturation)
            .mode(self.tone_mode)
            .contrast(self.contrast)
            .strength(self.strength)
            .shadow_boost(self.shadow_boost)
            .highlight_compress(self.highlight_compress)
            .midpoint(self.midpoint)
            .compress_dynamic_range(self.compress_dynamic_range)
    }

    /// Dither options for an explicit algorithm choice.
    pub fn dither_options(&self, algorithm: DitherAlgorithm) -> DitherOptions {
        DitherOptions::new()
            .algorithm(algorithm)
            .metric(self.color_method)
    }
}

fn number(map: &Mapping, key: &str, slot: &mut f32) {
    let Some(v) = map.get(key) else {
        return;
    };
    match v.as_f64() {
        Some(n) if n.is_finite() => *slot = n as f32,
        _ => tracing::warn!(field = key, value = ?v, "Invalid setting, using default"),
    }
}

fn named<T>(map: &Mapping, key: &str, slot: &mut T)
where
    T: FromStr,
    T::Err: Display,
{
    let Some(v) = map.get(key) else {
        return;
    };
    match v.as_str().map(str::parse::<T>) {
        Some(Ok(parsed)) => *slot = parsed,
        Some(Err(e)) => tracing::warn!(field = key, %e, "Invalid setting, using default"),
        None => tracing::warn!(field = key, value = ?v, "Invalid setting, using default"),
    }
}
