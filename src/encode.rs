//! Panel-ready output encoding.

use std::io::Cursor;
use std::path::Path;

use image::codecs::bmp::BmpEncoder;
use image::ExtendedColorType;

use crate::error::PipelineError;
use crate::format::Format;

/// Output container, chosen from the output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// RGB8 PNG, what the panel driver reads
    #[default]
    Png,
    /// 24-bit uncompressed BMP
    Bmp,
}

impl OutputFormat {
    /// `.bmp` (any case) selects BMP; everything else is PNG.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("bmp") => OutputFormat::Bmp,
            _ => OutputFormat::Png,
        }
    }

    /// Whether an input in `format` is already this container.
    pub fn is_container_of(self, format: Format) -> bool {
        matches!(
            (self, format),
            (OutputFormat::Png, Format::Png) | (OutputFormat::Bmp, Format::Bmp)
        )
    }
}

pub fn encode(
    format: OutputFormat,
    rgb: &[u8],
    width: u32,
    height: u32,
) -> Result<Vec<u8>, PipelineError> {
    match format {
        OutputFormat::Png => encode_png(rgb, width, height),
        OutputFormat::Bmp => encode_bmp(rgb, width, height),
    }
}

/// Encode interleaved RGB888 as an 8-bit RGB PNG.
pub fn encode_png(rgb: &[u8], width: u32, height: u32) -> Result<Vec<u8>, PipelineError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| PipelineError::Encode(e.to_string()))?;
        writer
            .write_image_data(rgb)
            .map_err(|e| PipelineError::Encode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

pub fn encode_bmp(rgb: &[u8], width: u32, height: u32) -> Result<Vec<u8>, PipelineError> {
    let mut buf = Vec::new();
    BmpEncoder::new(&mut buf)
        .encode(rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| PipelineError::Encode(e.to_string()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::detect_format;

    const RGB: [u8; 12] = [0, 0, 0, 255, 255, 255, 255, 0, 0, 0, 0, 255];

    #[test]
    fn test_format_from_extension() {
        assert_eq!(OutputFormat::for_path(Path::new("out.bmp")), OutputFormat::Bmp);
        assert_eq!(OutputFormat::for_path(Path::new("OUT.BMP")), OutputFormat::Bmp);
        assert_eq!(OutputFormat::for_path(Path::new("out.png")), OutputFormat::Png);
        assert_eq!(OutputFormat::for_path(Path::new("out")), OutputFormat::Png);
        assert_eq!(OutputFormat::for_path(Path::new("out.bmp.tmp")), OutputFormat::Png);
    }

    #[test]
    fn test_container_match() {
        assert!(OutputFormat::Png.is_container_of(Format::Png));
        assert!(OutputFormat::Bmp.is_container_of(Format::Bmp));
        assert!(!OutputFormat::Bmp.is_container_of(Format::Png));
        assert!(!OutputFormat::Png.is_container_of(Format::Bmp));
        assert!(!OutputFormat::Png.is_container_of(Format::Jpeg));
    }

    #[test]
    fn test_png_decodes_back() {
        let bytes = encode(OutputFormat::Png, &RGB, 2, 2).unwrap();
        assert_eq!(detect_format(&bytes), Format::Png);
        let image = image::load_from_memory(&bytes).unwrap();
        assert_eq!(image.color(), image::ColorType::Rgb8);
        assert_eq!(image.into_rgb8().into_raw(), RGB.to_vec());
    }

    #[test]
    fn test_bmp_decodes_back() {
        let bytes = encode(OutputFormat::Bmp, &RGB, 2, 2).unwrap();
        assert_eq!(detect_format(&bytes), Format::Bmp);
        let image = image::load_from_memory(&bytes).unwrap();
        assert_eq!(image.into_rgb8().into_raw(), RGB.to_vec());
    }

    #[test]
    fn test_short_buffer_is_encode_error() {
        assert!(matches!(
            encode_png(&RGB[..6], 2, 2),
            Err(PipelineError::Encode(_))
        ));
    }
}
