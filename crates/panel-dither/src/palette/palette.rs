//! Palette with dual color storage and nearest-color matching.
//!
//! Every entry has an official color (what the panel driver expects in the
//! output) and a measured color (what the panel actually shows). Matching and
//! error computation use the measured colors; output uses the official ones.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::error::PaletteError;
use crate::color::{LinearRgb, Oklab, Srgb};

/// Distance metric for nearest-color search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum DistanceMetric {
    /// Squared Euclidean distance on 8-bit sRGB code values.
    #[default]
    Rgb,
    /// Squared Euclidean distance in Oklab.
    Lab,
}

impl DistanceMetric {
    pub fn name(self) -> &'static str {
        match self {
            DistanceMetric::Rgb => "rgb",
            DistanceMetric::Lab => "lab",
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistanceMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rgb" => Ok(DistanceMetric::Rgb),
            "lab" => Ok(DistanceMetric::Lab),
            other => Err(format!("unknown color method '{other}'")),
        }
    }
}

/// One named palette color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    pub name: String,
    /// Written to output and recognized as "processed".
    pub official: Srgb,
    /// What the panel really shows; drives matching.
    pub actual: Srgb,
}

impl PaletteEntry {
    /// An entry whose measured color equals its official color.
    pub fn new(name: impl Into<String>, official: Srgb) -> Self {
        Self {
            name: name.into(),
            official,
            actual: official,
        }
    }

    pub fn measured(mut self, actual: Srgb) -> Self {
        self.actual = actual;
        self
    }
}

/// An ordered, validated set of panel colors.
///
/// Order matters: ties in nearest-color search go to the earlier entry.
///
/// ```
/// use panel_dither::{Palette, Srgb};
///
/// let palette = Palette::from_colors(&[Srgb::BLACK, Srgb::WHITE], None).unwrap();
/// assert_eq!(palette.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
    actual_oklab: Vec<Oklab>,
}

impl Palette {
    /// Validate and build a palette.
    ///
    /// # Errors
    ///
    /// - fewer than 2 entries ([`PaletteError::TooFewColors`])
    /// - more than 256 entries ([`PaletteError::TooManyColors`])
    /// - repeated official or measured color ([`PaletteError::DuplicateColor`])
    /// - repeated name ([`PaletteError::DuplicateName`])
    pub fn new(entries: Vec<PaletteEntry>) -> Result<Self, PaletteError> {
        if entries.len() < 2 {
            return Err(PaletteError::TooFewColors {
                count: entries.len(),
            });
        }
        if entries.len() > 256 {
            return Err(PaletteError::TooManyColors {
                count: entries.len(),
            });
        }

        check_distinct(entries.iter().map(|e| e.official))?;
        check_distinct(entries.iter().map(|e| e.actual))?;

        let mut names: HashMap<&str, usize> = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            if names.insert(entry.name.as_str(), i).is_some() {
                return Err(PaletteError::DuplicateName {
                    name: entry.name.clone(),
                });
            }
        }

        let actual_oklab = entries.iter().map(|e| Oklab::from(e.actual)).collect();
        Ok(Self {
            entries,
            actual_oklab,
        })
    }

    /// Build an unnamed palette from color lists. Entries are named
    /// `color0`, `color1`, ...
    ///
    /// # Errors
    ///
    /// As [`Palette::new`], plus [`PaletteError::LengthMismatch`] when
    /// `actual` and `official` differ in length.
    pub fn from_colors(official: &[Srgb], actual: Option<&[Srgb]>) -> Result<Self, PaletteError> {
        if let Some(actual) = actual {
            if actual.len() != official.len() {
                return Err(PaletteError::LengthMismatch {
                    official: official.len(),
                    actual: actual.len(),
                });
            }
        }

        let entries = official
            .iter()
            .enumerate()
            .map(|(i, &color)| {
                let entry = PaletteEntry::new(format!("color{i}"), color);
                match actual {
                    Some(actual) => entry.measured(actual[i]),
                    None => entry,
                }
            })
            .collect();
        Self::new(entries)
    }

    /// Like [`Palette::from_colors`], with hex strings.
    pub fn from_hex(official: &[&str], actual: Option<&[&str]>) -> Result<Self, PaletteError> {
        let official = parse_all(official)?;
        let actual = actual.map(parse_all).transpose()?;
        Self::from_colors(&official, actual.as_deref())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    #[inline]
    pub fn official(&self, index: usize) -> Srgb {
        self.entries[index].official
    }

    #[inline]
    pub fn actual(&self, index: usize) -> Srgb {
        self.entries[index].actual
    }

    pub fn name(&self, index: usize) -> &str {
        &self.entries[index].name
    }

    /// Index of the entry whose official color is exactly `color`.
    #[inline]
    pub fn index_of_official(&self, color: Srgb) -> Option<usize> {
        self.entries.iter().position(|e| e.official == color)
    }

    /// Index of the measured color closest to `color`.
    ///
    /// `color` is an error-adjusted pixel already clamped to 0..=255 per
    /// channel. Strict `<` keeps the first entry on ties.
    #[inline]
    pub fn find_nearest(&self, color: [i32; 3], metric: DistanceMetric) -> usize {
        match metric {
            DistanceMetric::Rgb => {
                let mut best = 0;
                let mut best_dist = i32::MAX;
                for (i, entry) in self.entries.iter().enumerate() {
                    let dist = entry.actual.distance_squared(color);
                    if dist < best_dist {
                        best_dist = dist;
                        best = i;
                    }
                }
                best
            }
            DistanceMetric::Lab => {
                let lab = Oklab::from(Srgb::new(
                    color[0].clamp(0, 255) as u8,
                    color[1].clamp(0, 255) as u8,
                    color[2].clamp(0, 255) as u8,
                ));
                let mut best = 0;
                let mut best_dist = f32::INFINITY;
                for (i, &candidate) in self.actual_oklab.iter().enumerate() {
                    let dist = lab.distance_squared(candidate);
                    if dist < best_dist {
                        best_dist = dist;
                        best = i;
                    }
                }
                best
            }
        }
    }

    /// Measured linear luminance of the panel's black and white points.
    ///
    /// The black and white points are the entries with the darkest and
    /// brightest official colors; their measured colors say how dark and
    /// bright the panel really gets.
    pub fn luminance_range(&self) -> (f32, f32) {
        let official_y = |i: usize| LinearRgb::from(self.entries[i].official).luminance();
        let mut darkest = 0;
        let mut brightest = 0;
        for i in 1..self.entries.len() {
            if official_y(i) < official_y(darkest) {
                darkest = i;
            }
            if official_y(i) > official_y(brightest) {
                brightest = i;
            }
        }
        (
            LinearRgb::from(self.entries[darkest].actual).luminance(),
            LinearRgb::from(self.entries[brightest].actual).luminance(),
        )
    }
}

impl Default for Palette {
    /// The six-color panel: black, white, yellow, red, blue, green, with
    /// measured colors from a reference photograph of the panel.
    fn default() -> Self {
        let entries = vec![
            PaletteEntry::new("black", Srgb::new(0, 0, 0)).measured(Srgb::new(2, 2, 2)),
            PaletteEntry::new("white", Srgb::new(255, 255, 255))
                .measured(Srgb::new(190, 190, 190)),
            PaletteEntry::new("yellow", Srgb::new(255, 255, 0)).measured(Srgb::new(205, 202, 0)),
            PaletteEntry::new("red", Srgb::new(255, 0, 0)).measured(Srgb::new(135, 19, 0)),
            PaletteEntry::new("blue", Srgb::new(0, 0, 255)).measured(Srgb::new(5, 64, 158)),
            PaletteEntry::new("green", Srgb::new(0, 255, 0)).measured(Srgb::new(39, 102, 60)),
        ];
        let actual_oklab = entries.iter().map(|e| Oklab::from(e.actual)).collect();
        Self {
            entries,
            actual_oklab,
        }
    }
}

impl PartialEq for Palette {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

fn check_distinct(colors: impl Iterator<Item = Srgb>) -> Result<(), PaletteError> {
    let mut seen: HashMap<Srgb, usize> = HashMap::new();
    for (i, color) in colors.enumerate() {
        if let Some(&first) = seen.get(&color) {
            return Err(PaletteError::DuplicateColor { first, second: i });
        }
        seen.insert(color, i);
    }
    Ok(())
}

fn parse_all(hex: &[&str]) -> Result<Vec<Srgb>, PaletteError> {
    hex.iter()
        .map(|s| s.parse::<Srgb>().map_err(PaletteError::from))
        .collect()
}
