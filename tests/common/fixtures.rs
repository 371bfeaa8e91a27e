//! Test fixtures: images encoded in memory and pipeline constructors.

use std::io::Cursor;
use std::sync::Arc;

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use panel_dither::{Palette, Srgb};
use photoframe::models::{AppConfig, PanelGeometry};
use photoframe::settings::ProcessingSettings;
use photoframe::{Pipeline, StaticSettings};

/// Two-color palette with measured == official.
pub fn bw_palette() -> Palette {
    Palette::from_colors(&[Srgb::BLACK, Srgb::WHITE], None).unwrap()
}

/// Smooth color gradient, a stand-in for a photograph.
pub fn gradient(width: u32, height: u32) -> DynamicImage {
    let buf = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) * 3 % 256) as u8,
        ])
    });
    DynamicImage::ImageRgb8(buf)
}

pub fn solid(width: u32, height: u32, color: Srgb) -> DynamicImage {
    DynamicImage::ImageRgb8(ImageBuffer::from_pixel(
        width,
        height,
        Rgb(color.to_bytes()),
    ))
}

pub fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

pub fn png_bytes(image: &DynamicImage) -> Vec<u8> {
    encode(image, ImageFormat::Png)
}

pub fn bmp_bytes(image: &DynamicImage) -> Vec<u8> {
    encode(image, ImageFormat::Bmp)
}

pub fn jpeg_bytes(image: &DynamicImage) -> Vec<u8> {
    encode(image, ImageFormat::Jpeg)
}

/// Pipeline with fixed settings and no panel geometry.
pub fn pipeline_with(palette: Palette, processing: ProcessingSettings) -> Pipeline {
    pipeline_for(palette, processing, AppConfig::default())
}

pub fn pipeline_for(palette: Palette, processing: ProcessingSettings, config: AppConfig) -> Pipeline {
    Pipeline::new(Arc::new(StaticSettings::new(processing, palette)), &config)
}

/// Default pipeline for the six-color palette on an 800x480 panel.
pub fn panel_pipeline() -> Pipeline {
    let config = AppConfig {
        panel: Some(PanelGeometry::DEFAULT),
        ..Default::default()
    };
    pipeline_for(Palette::default(), ProcessingSettings::default(), config)
}
