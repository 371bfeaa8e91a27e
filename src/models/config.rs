use std::path::{Path, PathBuf};

use panel_dither::{Palette, PaletteEntry, PaletteError, Srgb};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use super::ProcessingSettings;
use crate::error::ConfigError;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "photoframe.yaml";

/// Application configuration loaded from photoframe.yaml
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    /// Target panel; images are rotated and cropped to fit when set
    pub panel: Option<PanelGeometry>,

    pub limits: Limits,

    pub processed_check: ProcessedCheck,

    pub processing: ProcessingSettings,

    /// Stored palette; `None` means the built-in six-color default
    pub palette: Option<Vec<PaletteEntryConfig>>,
}

/// Panel size in pixels, in the panel's native orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelGeometry {
    pub width: u32,
    pub height: u32,
}

impl PanelGeometry {
    /// The observed 7.3" six-color panel.
    pub const DEFAULT: PanelGeometry = PanelGeometry {
        width: 800,
        height: 480,
    };

    /// Both dimensions non-zero.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Size ceiling enforced before any pixel buffer is allocated.
///
/// Orientation-agnostic: the longer image edge is checked against
/// `max_long_edge`, the shorter against `max_short_edge`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_long_edge: u32,
    pub max_short_edge: u32,
    /// Upper bound on the decoded RGB buffer; unlimited when unset
    pub max_buffer_bytes: Option<usize>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_long_edge: 6400,
            max_short_edge: 3840,
            max_buffer_bytes: None,
        }
    }
}

/// Sampling parameters for the already-processed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessedCheck {
    /// Pixels sampled, evenly strided by linear index
    pub sample_count: usize,
    /// Images with fewer pixels than this are checked in full
    pub min_samples: usize,
}

impl Default for ProcessedCheck {
    fn default() -> Self {
        Self {
            sample_count: 4096,
            min_samples: 64,
        }
    }
}

/// One `palette:` list entry as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntryConfig {
    pub name: String,
    /// Official color, `#rrggbb`
    pub color: String,
    /// Measured color, `#rrggbb`; defaults to `color`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measured: Option<String>,
}

impl PaletteEntryConfig {
    pub fn to_entry(&self) -> Result<PaletteEntry, PaletteError> {
        let official: Srgb = self.color.parse()?;
        let entry = PaletteEntry::new(self.name.clone(), official);
        Ok(match &self.measured {
            Some(measured) => entry.measured(measured.parse()?),
            None => entry,
        })
    }
}

impl AppConfig {
    /// Read and parse a config file.
    ///
    /// Only unreadable files and malformed YAML are errors. Sections with
    /// the wrong shape log a warning and keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        tracing::info!(
            path = %path.display(),
            panel = ?config.panel,
            custom_palette = config.palette.is_some(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Load `path`, or photoframe.yaml when `None`. A missing or broken
    /// file logs a warning and yields the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(%e, "Using default configuration");
                Self::default()
            }
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        let root: Value = serde_yaml::from_str(content)?;
        let mut config = Self::default();
        if root.is_null() {
            return Ok(config);
        }

        config.panel = section::<PanelGeometry>(&root, "panel").filter(|panel| {
            if !panel.is_valid() {
                tracing::warn!(
                    width = panel.width,
                    height = panel.height,
                    "Panel dimensions must be non-zero, ignoring panel section"
                );
            }
            panel.is_valid()
        });
        config.limits = section(&root, "limits").unwrap_or_default();
        config.processed_check = section(&root, "processed_check").unwrap_or_default();
        config.processing = root
            .get("processing")
            .map(ProcessingSettings::from_yaml)
            .unwrap_or_default();
        config.palette = section(&root, "palette").unwrap_or_default();
        Ok(config)
    }

    /// Build the configured palette, or the default when none is stored.
    pub fn build_palette(&self) -> Result<Palette, PaletteError> {
        match &self.palette {
            Some(entries) => {
                let entries = entries
                    .iter()
                    .map(PaletteEntryConfig::to_entry)
                    .collect::<Result<Vec<_>, _>>()?;
                Palette::new(entries)
            }
            None => Ok(Palette::default()),
        }
    }
}

/// Deserialize one top-level section. `None` when absent or malformed.
fn section<T: DeserializeOwned>(root: &Value, key: &str) -> Option<T> {
    let value = root.get(key)?;
    if value.is_null() {
        return None;
    }
    match serde_yaml::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!(section = key, %e, "Invalid config section, using defaults");
            None
        }
    }
}
