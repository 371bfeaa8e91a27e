//! photoframe - e-paper photo pipeline
//!
//! Decodes photographs, fits them to the panel, tone-maps them into the
//! panel's measured range and dithers them onto its palette.
//! This library exposes modules for the CLI and integration testing.

pub mod decode;
pub mod encode;
pub mod error;
pub mod format;
pub mod models;
pub mod pipeline;
pub mod settings;

pub use error::{ConfigError, PipelineError};
pub use format::{detect_format, detect_format_path, is_processed, Format};
pub use pipeline::{Pipeline, ProcessOutcome, RgbImage};
pub use settings::{FileSettings, SettingsProvider, StaticSettings};
