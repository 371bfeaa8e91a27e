use std::path::PathBuf;

use panel_dither::{DitherError, PaletteError};
use thiserror::Error;

/// Failure of one pipeline invocation. Each stage reports its own variant.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Decode failed: {0}")]
    DecodeFailed(String),

    #[error("Image too large: {width}x{height} (max {max_long_edge}x{max_short_edge})")]
    ImageTooLarge {
        width: u32,
        height: u32,
        max_long_edge: u32,
        max_short_edge: u32,
    },

    #[error("Out of memory: could not allocate {bytes} bytes")]
    OutOfMemory { bytes: usize },

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid palette: {0}")]
    InvalidPalette(#[from] PaletteError),

    #[error("Encode error: {0}")]
    Encode(String),
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<DitherError> for PipelineError {
    fn from(e: DitherError) -> Self {
        match e {
            DitherError::Palette(e) => PipelineError::InvalidPalette(e),
            DitherError::OutOfMemory { bytes } => PipelineError::OutOfMemory { bytes },
            other => PipelineError::DecodeFailed(other.to_string()),
        }
    }
}

/// Failure to load the YAML config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Invalid palette: {0}")]
    InvalidPalette(#[from] PaletteError),
}
