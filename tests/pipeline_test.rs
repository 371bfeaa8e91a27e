//! End-to-end tests of the file and buffer pipelines.

mod common;

use std::sync::Arc;
use std::thread;

use common::*;
use panel_dither::{DitherAlgorithm, Palette, Srgb};
use photoframe::encode::OutputFormat;
use photoframe::models::{AppConfig, Limits};
use photoframe::settings::ProcessingSettings;
use photoframe::{Format, PipelineError, ProcessOutcome};
use pretty_assertions::assert_eq;

const W: [u8; 3] = [255, 255, 255];
const B: [u8; 3] = [0, 0, 0];

#[test]
fn test_mid_gray_checkerboard() {
    let pipeline = pipeline_with(bw_palette(), ProcessingSettings::default());
    let png = png_bytes(&solid(2, 2, Srgb::new(128, 128, 128)));

    let rgb = pipeline
        .process_to_rgb(&png, Format::Png, DitherAlgorithm::FloydSteinberg)
        .unwrap();

    assert_eq!((rgb.width, rgb.height), (2, 2));
    assert_eq!(rgb.data, [W, B, B, W].concat());
}

#[test]
fn test_jpeg_to_panel_ready_png() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("photo.jpg");
    let output = dir.path().join("photo.png");
    std::fs::write(&input, jpeg_bytes(&gradient(1000, 600))).unwrap();

    let outcome = panel_pipeline()
        .process_file(&input, &output, DitherAlgorithm::Stucki)
        .unwrap();

    assert_eq!(
        outcome,
        ProcessOutcome::Dithered {
            width: 800,
            height: 480,
            algorithm: DitherAlgorithm::Stucki,
        }
    );
    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(photoframe::detect_format(&bytes), Format::Png);
    let (width, height, data) = decode_rgb(&bytes);
    assert_eq!((width, height), (800, 480));
    assert_palette_only(&data, &Palette::default());
}

#[test]
fn test_portrait_input_rotated_for_landscape_panel() {
    let pipeline = panel_pipeline();
    let png = png_bytes(&gradient(600, 1000));
    let rgb = pipeline
        .process_to_rgb(&png, Format::Png, DitherAlgorithm::Burkes)
        .unwrap();
    assert_panel_ready(&rgb, 800, 480, &Palette::default());
}

#[test]
fn test_every_algorithm_produces_palette_colors() {
    let pipeline = pipeline_with(Palette::default(), ProcessingSettings::default());
    let png = png_bytes(&gradient(64, 48));
    for algorithm in DitherAlgorithm::ALL {
        let rgb = pipeline
            .process_to_rgb(&png, Format::Png, algorithm)
            .unwrap();
        assert_panel_ready(&rgb, 64, 48, &Palette::default());
    }
}

#[test]
fn test_bmp_output_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.BMP");
    std::fs::write(&input, png_bytes(&gradient(40, 30))).unwrap();

    let pipeline = pipeline_with(Palette::default(), ProcessingSettings::default());
    pipeline
        .process_file(&input, &output, DitherAlgorithm::Sierra)
        .unwrap();

    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(photoframe::detect_format(&bytes), Format::Bmp);
    let (width, height, data) = decode_rgb(&bytes);
    assert_eq!((width, height), (40, 30));
    assert_palette_only(&data, &Palette::default());
}

#[test]
fn test_processed_output_passes_through_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("photo.jpg");
    let first = dir.path().join("first.png");
    let second = dir.path().join("second.png");
    std::fs::write(&input, jpeg_bytes(&gradient(320, 200))).unwrap();

    let pipeline = panel_pipeline();
    pipeline
        .process_file(&input, &first, DitherAlgorithm::FloydSteinberg)
        .unwrap();
    let outcome = pipeline
        .process_file(&first, &second, DitherAlgorithm::FloydSteinberg)
        .unwrap();

    assert_eq!(outcome, ProcessOutcome::PassedThrough);
    assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
}

#[test]
fn test_processed_png_to_bmp_is_reencoded() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("white.png");
    let output = dir.path().join("out.bmp");
    std::fs::write(&input, png_bytes(&solid(16, 16, Srgb::WHITE))).unwrap();

    let pipeline = pipeline_with(bw_palette(), ProcessingSettings::default());
    let outcome = pipeline
        .process_file(&input, &output, DitherAlgorithm::FloydSteinberg)
        .unwrap();

    assert_eq!(
        outcome,
        ProcessOutcome::Reencoded {
            format: OutputFormat::Bmp
        }
    );
    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(photoframe::detect_format(&bytes), Format::Bmp);
    let (width, height, data) = decode_rgb(&bytes);
    assert_eq!((width, height), (16, 16));
    assert!(data.iter().all(|&b| b == 255));
}

#[test]
fn test_processed_bmp_to_png_is_reencoded() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("black.bmp");
    let output = dir.path().join("out.png");
    std::fs::write(&input, bmp_bytes(&solid(8, 4, Srgb::BLACK))).unwrap();

    let pipeline = pipeline_with(bw_palette(), ProcessingSettings::default());
    let outcome = pipeline
        .process_file(&input, &output, DitherAlgorithm::Burkes)
        .unwrap();

    assert_eq!(
        outcome,
        ProcessOutcome::Reencoded {
            format: OutputFormat::Png
        }
    );
    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(photoframe::detect_format(&bytes), Format::Png);
    assert_eq!(decode_rgb(&bytes), (8, 4, vec![0; 8 * 4 * 3]));
}

#[test]
fn test_processed_buffer_returned_as_decoded() {
    let pipeline = panel_pipeline();
    let first = pipeline
        .process_to_rgb(
            &jpeg_bytes(&gradient(200, 120)),
            Format::Jpeg,
            DitherAlgorithm::Stucki,
        )
        .unwrap();

    let png = photoframe::encode::encode_png(&first.data, first.width, first.height).unwrap();
    let second = pipeline
        .process_to_rgb(&png, Format::Png, DitherAlgorithm::Burkes)
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_size_ceiling() {
    let pipeline = pipeline_with(bw_palette(), ProcessingSettings::default());
    let png = png_bytes(&solid(6401, 1, Srgb::WHITE));
    let result = pipeline.process_to_rgb(&png, Format::Png, DitherAlgorithm::FloydSteinberg);
    assert!(
        matches!(
            result,
            Err(PipelineError::ImageTooLarge {
                width: 6401,
                height: 1,
                max_long_edge: 6400,
                max_short_edge: 3840,
            })
        ),
        "got {result:?}"
    );
}

#[test]
fn test_buffer_budget_is_out_of_memory() {
    let config = AppConfig {
        limits: Limits {
            max_buffer_bytes: Some(1024),
            ..Limits::default()
        },
        ..Default::default()
    };
    let pipeline = pipeline_for(bw_palette(), ProcessingSettings::default(), config);
    let png = png_bytes(&solid(32, 32, Srgb::WHITE));
    let result = pipeline.process_to_rgb(&png, Format::Png, DitherAlgorithm::FloydSteinberg);
    assert!(matches!(result, Err(PipelineError::OutOfMemory { bytes: 3072 })));
}

#[test]
fn test_truncated_jpeg_fails_and_pipeline_recovers() {
    let pipeline = pipeline_with(bw_palette(), ProcessingSettings::default());
    let jpeg = jpeg_bytes(&gradient(64, 64));

    let result = pipeline.process_to_rgb(&jpeg[..32], Format::Jpeg, DitherAlgorithm::FloydSteinberg);
    assert!(matches!(result, Err(PipelineError::DecodeFailed(_))), "got {result:?}");

    let rgb = pipeline
        .process_to_rgb(&jpeg, Format::Jpeg, DitherAlgorithm::FloydSteinberg)
        .unwrap();
    assert_panel_ready(&rgb, 64, 64, &bw_palette());
}

#[test]
fn test_jpeg_cut_mid_stream_is_decode_error() {
    let pipeline = pipeline_with(bw_palette(), ProcessingSettings::default());
    let jpeg = jpeg_bytes(&gradient(256, 256));

    for cut in [jpeg.len() / 2, jpeg.len() * 2 / 3, jpeg.len() * 3 / 4] {
        let result =
            pipeline.process_to_rgb(&jpeg[..cut], Format::Jpeg, DitherAlgorithm::FloydSteinberg);
        assert!(
            matches!(result, Err(PipelineError::DecodeFailed(_))),
            "cut {cut}/{}: got {result:?}",
            jpeg.len()
        );
    }
}

#[test]
fn test_truncated_jpeg_file_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("cut.jpg");
    let output = dir.path().join("out.png");
    let jpeg = jpeg_bytes(&gradient(256, 256));
    std::fs::write(&input, &jpeg[..jpeg.len() / 2]).unwrap();

    let pipeline = pipeline_with(bw_palette(), ProcessingSettings::default());
    let result = pipeline.process_file(&input, &output, DitherAlgorithm::Stucki);
    assert!(matches!(result, Err(PipelineError::DecodeFailed(_))), "got {result:?}");
    assert!(!output.exists());
}

#[test]
fn test_unknown_input_rejected_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    let output = dir.path().join("out.png");
    std::fs::write(&input, b"GIF89a is not supported either").unwrap();

    let pipeline = pipeline_with(bw_palette(), ProcessingSettings::default());
    let result = pipeline.process_file(&input, &output, DitherAlgorithm::FloydSteinberg);

    assert!(matches!(result, Err(PipelineError::UnsupportedFormat)));
    assert!(!output.exists());
}

#[test]
fn test_failed_run_leaves_existing_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.png");
    let output = dir.path().join("out.png");
    std::fs::write(&input, &png_bytes(&gradient(16, 16))[..40]).unwrap();
    std::fs::write(&output, b"previous").unwrap();

    let pipeline = pipeline_with(bw_palette(), ProcessingSettings::default());
    let result = pipeline.process_file(&input, &output, DitherAlgorithm::FloydSteinberg);

    assert!(matches!(result, Err(PipelineError::DecodeFailed(_))), "got {result:?}");
    assert_eq!(std::fs::read(&output).unwrap(), b"previous");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn test_missing_input_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline_with(bw_palette(), ProcessingSettings::default());
    let result = pipeline.process_file(
        &dir.path().join("missing.jpg"),
        &dir.path().join("out.png"),
        DitherAlgorithm::FloydSteinberg,
    );
    match result {
        Err(PipelineError::Io { path, .. }) => assert!(path.ends_with("missing.jpg")),
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn test_concurrent_calls_are_deterministic() {
    let pipeline = Arc::new(pipeline_with(Palette::default(), ProcessingSettings::default()));
    let png = Arc::new(png_bytes(&gradient(96, 64)));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pipeline = Arc::clone(&pipeline);
            let png = Arc::clone(&png);
            thread::spawn(move || {
                pipeline
                    .process_to_rgb(&png, Format::Png, DitherAlgorithm::Sierra)
                    .unwrap()
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for result in &results[1..] {
        assert_eq!(result, &results[0]);
    }
}

#[test]
fn test_tone_settings_change_output() {
    let png = png_bytes(&gradient(64, 64));
    let plain = pipeline_with(Palette::default(), ProcessingSettings::default())
        .process_to_rgb(&png, Format::Png, DitherAlgorithm::FloydSteinberg)
        .unwrap();
    let bright = pipeline_with(
        Palette::default(),
        ProcessingSettings {
            exposure: 1.6,
            ..Default::default()
        },
    )
    .process_to_rgb(&png, Format::Png, DitherAlgorithm::FloydSteinberg)
    .unwrap();

    assert_ne!(plain.data, bright.data);
    let white = |data: &[u8]| data.chunks_exact(3).filter(|px| *px == W).count();
    assert!(white(&bright.data) > white(&plain.data));
}
