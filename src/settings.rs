//! Settings and palette snapshots for the pipeline.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use panel_dither::Palette;

use crate::error::ConfigError;
use crate::models::AppConfig;
pub use crate::models::ProcessingSettings;

/// Source of the settings a pipeline invocation runs with.
///
/// Implementations hand out snapshots; nothing the pipeline holds changes
/// while an invocation runs.
pub trait SettingsProvider: Send + Sync {
    fn processing(&self) -> ProcessingSettings;

    fn palette(&self) -> Arc<Palette>;

    /// Both snapshots, taken together.
    fn snapshot(&self) -> (ProcessingSettings, Arc<Palette>) {
        (self.processing(), self.palette())
    }
}

/// Fixed settings, for embedders and tests.
#[derive(Debug, Clone)]
pub struct StaticSettings {
    processing: ProcessingSettings,
    palette: Arc<Palette>,
}

impl StaticSettings {
    pub fn new(processing: ProcessingSettings, palette: impl Into<Arc<Palette>>) -> Self {
        Self {
            processing,
            palette: palette.into(),
        }
    }
}

impl Default for StaticSettings {
    fn default() -> Self {
        Self::new(ProcessingSettings::default(), Palette::default())
    }
}

impl SettingsProvider for StaticSettings {
    fn processing(&self) -> ProcessingSettings {
        self.processing
    }

    fn palette(&self) -> Arc<Palette> {
        Arc::clone(&self.palette)
    }
}

#[derive(Debug, Clone)]
struct Snapshot {
    processing: ProcessingSettings,
    palette: Arc<Palette>,
}

/// Settings read from the `processing:` and `palette:` sections of the
/// config file, swapped atomically by [`reload`](Self::reload).
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    current: RwLock<Arc<Snapshot>>,
}

impl FileSettings {
    /// Start from an already loaded config. An invalid stored palette logs a
    /// warning and falls back to the default palette.
    pub fn from_config(path: impl Into<PathBuf>, config: &AppConfig) -> Self {
        let palette = config.build_palette().unwrap_or_else(|e| {
            tracing::warn!(%e, "Invalid stored palette, using default");
            Palette::default()
        });
        Self {
            path: path.into(),
            current: RwLock::new(Arc::new(Snapshot {
                processing: config.processing,
                palette: Arc::new(palette),
            })),
        }
    }

    /// Load `path`; a missing or unreadable file yields the defaults.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = AppConfig::load_or_default(Some(&path));
        Self::from_config(path, &config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the config file and swap in the new snapshots.
    ///
    /// On any error the previous snapshots stay in place.
    pub fn reload(&self) -> Result<(), ConfigError> {
        let config = AppConfig::load(&self.path)?;
        let palette = config.build_palette()?;
        let next = Arc::new(Snapshot {
            processing: config.processing,
            palette: Arc::new(palette),
        });
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = next;
        tracing::info!(path = %self.path.display(), "Reloaded settings");
        Ok(())
    }

    fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }
}

impl SettingsProvider for FileSettings {
    fn processing(&self) -> ProcessingSettings {
        self.current().processing
    }

    fn palette(&self) -> Arc<Palette> {
        Arc::clone(&self.current().palette)
    }

    fn snapshot(&self) -> (ProcessingSettings, Arc<Palette>) {
        let current = self.current();
        (current.processing, Arc::clone(&current.palette))
    }
}
