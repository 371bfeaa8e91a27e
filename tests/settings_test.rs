//! File-backed settings: loading, reload and the pipeline's snapshot use.

mod common;

use std::sync::Arc;

use common::*;
use panel_dither::{DistanceMetric, DitherAlgorithm, Palette, PaletteError, Srgb, ToneMode};
use photoframe::models::AppConfig;
use photoframe::settings::ProcessingSettings;
use photoframe::{ConfigError, FileSettings, Format, Pipeline, SettingsProvider};
use pretty_assertions::assert_eq;

const TWO_COLOR: &str = r##"
processing:
  exposure: 1.1
  toneMode: scurve
  colorMethod: lab
  ditherAlgorithm: burkes
palette:
  - name: ink
    color: "#000000"
  - name: paper
    color: "#ffffff"
    measured: "#c8c8c8"
"##;

fn write_config(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("photoframe.yaml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_open_reads_processing_and_palette() {
    let dir = tempfile::tempdir().unwrap();
    let settings = FileSettings::open(write_config(&dir, TWO_COLOR));

    let processing = settings.processing();
    assert_eq!(processing.exposure, 1.1);
    assert_eq!(processing.tone_mode, ToneMode::Scurve);
    assert_eq!(processing.color_method, DistanceMetric::Lab);
    assert_eq!(processing.dither_algorithm, DitherAlgorithm::Burkes);
    assert_eq!(processing.strength, 0.5);

    let palette = settings.palette();
    assert_eq!(palette.len(), 2);
    assert_eq!(palette.name(1), "paper");
    assert_eq!(palette.actual(1), Srgb::new(200, 200, 200));
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = FileSettings::open(dir.path().join("absent.yaml"));
    assert_eq!(settings.processing(), ProcessingSettings::default());
    assert_eq!(*settings.palette(), Palette::default());
}

#[test]
fn test_reload_swaps_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "processing:\n  exposure: 0.8\n");
    let settings = FileSettings::open(&path);
    assert_eq!(settings.processing().exposure, 0.8);
    assert_eq!(settings.palette().len(), 6);

    std::fs::write(&path, TWO_COLOR).unwrap();
    settings.reload().unwrap();
    assert_eq!(settings.processing().exposure, 1.1);
    assert_eq!(settings.palette().len(), 2);
}

#[test]
fn test_reload_with_invalid_palette_keeps_previous() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, TWO_COLOR);
    let settings = FileSettings::open(&path);

    std::fs::write(
        &path,
        r##"
processing:
  exposure: 2.0
palette:
  - name: only
    color: "#000000"
"##,
    )
    .unwrap();

    let err = settings.reload().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidPalette(PaletteError::TooFewColors { count: 1 })
    ));
    assert_eq!(settings.processing().exposure, 1.1);
    assert_eq!(settings.palette().name(0), "ink");
}

#[test]
fn test_reload_with_broken_yaml_keeps_previous() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, TWO_COLOR);
    let settings = FileSettings::open(&path);

    std::fs::write(&path, "processing: [unclosed").unwrap();
    assert!(matches!(settings.reload(), Err(ConfigError::Parse { .. })));
    assert_eq!(settings.palette().len(), 2);
}

#[test]
fn test_pipeline_uses_reloaded_palette() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "");
    let settings = Arc::new(FileSettings::open(&path));
    let pipeline = Pipeline::new(settings.clone(), &AppConfig::default());
    let png = png_bytes(&gradient(32, 32));

    let before = pipeline
        .process_to_rgb(&png, Format::Png, DitherAlgorithm::FloydSteinberg)
        .unwrap();
    assert_palette_only(&before.data, &Palette::default());

    std::fs::write(&path, TWO_COLOR).unwrap();
    settings.reload().unwrap();

    let after = pipeline
        .process_to_rgb(&png, Format::Png, DitherAlgorithm::FloydSteinberg)
        .unwrap();
    assert_palette_only(&after.data, &bw_palette());
}
