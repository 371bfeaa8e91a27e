pub mod config;
pub mod processing;

pub use config::{
    AppConfig, Limits, PaletteEntryConfig, PanelGeometry, ProcessedCheck, DEFAULT_CONFIG_FILE,
};
pub use processing::ProcessingSettings;
