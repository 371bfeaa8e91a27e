//! Bounded decoding of PNG, BMP and JPEG into RGB888.

use std::io::Cursor;

use image::error::LimitErrorKind;
use image::{DynamicImage, ImageDecoder, ImageError, ImageReader};
use panel_dither::PixelGrid;

use crate::error::PipelineError;
use crate::format::Format;
pub use crate::models::Limits;

/// Decode `bytes` into an RGB888 grid.
///
/// The header dimensions are checked against `limits` before any pixel
/// buffer exists. Grayscale is expanded, 16-bit samples are narrowed and
/// alpha is composited onto white.
pub fn decode(bytes: &[u8], format: Format, limits: &Limits) -> Result<PixelGrid, PipelineError> {
    let image_format = match format {
        Format::Png => image::ImageFormat::Png,
        Format::Bmp => image::ImageFormat::Bmp,
        Format::Jpeg => image::ImageFormat::Jpeg,
        Format::Unknown => return Err(PipelineError::UnsupportedFormat),
    };

    let decoder = ImageReader::with_format(Cursor::new(bytes), image_format)
        .into_decoder()
        .map_err(|e| map_image_error(e, 0))?;

    let (width, height) = decoder.dimensions();
    check_dimensions(limits, width, height)?;
    let rgb_bytes = rgb_buffer_len(limits, width, height)?;
    if format == Format::Jpeg && !jpeg_reaches_eoi(bytes) {
        return Err(PipelineError::DecodeFailed(
            "JPEG stream ends before the end-of-image marker".to_string(),
        ));
    }

    let image = DynamicImage::from_decoder(decoder).map_err(|e| map_image_error(e, rgb_bytes))?;
    let data = into_rgb888(image, rgb_bytes)?;
    let grid = PixelGrid::new(width, height, data)?;

    tracing::debug!(%format, width, height, "Decoded image");
    Ok(grid)
}

/// Reject dimensions beyond the size ceiling, whichever way round the
/// image is.
pub fn check_dimensions(limits: &Limits, width: u32, height: u32) -> Result<(), PipelineError> {
    let long = width.max(height);
    let short = width.min(height);
    if long > limits.max_long_edge || short > limits.max_short_edge {
        return Err(PipelineError::ImageTooLarge {
            width,
            height,
            max_long_edge: limits.max_long_edge,
            max_short_edge: limits.max_short_edge,
        });
    }
    Ok(())
}

fn rgb_buffer_len(limits: &Limits, width: u32, height: u32) -> Result<usize, PipelineError> {
    let bytes = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or(PipelineError::OutOfMemory { bytes: usize::MAX })?;
    match limits.max_buffer_bytes {
        Some(max) if bytes > max => Err(PipelineError::OutOfMemory { bytes }),
        _ => Ok(bytes),
    }
}

/// Walk the JPEG marker structure and report whether an EOI marker is
/// reached. The JPEG decoder fills a truncated scan with gray instead of
/// failing, so completeness is checked separately.
///
/// Segment payloads are skipped by their length field, so EOI markers inside
/// embedded thumbnails are not mistaken for the end of the stream.
fn jpeg_reaches_eoi(bytes: &[u8]) -> bool {
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return false;
    }
    let mut i = 2;
    loop {
        if bytes.get(i) != Some(&0xFF) {
            return false;
        }
        while bytes.get(i) == Some(&0xFF) {
            i += 1;
        }
        let Some(&marker) = bytes.get(i) else {
            return false;
        };
        i += 1;
        match marker {
            0xD9 => return true,
            // Standalone markers carry no length
            0x01 | 0xD0..=0xD7 => continue,
            _ => {}
        }

        let Some(len) = bytes.get(i..i + 2) else {
            return false;
        };
        let len = u16::from_be_bytes([len[0], len[1]]) as usize;
        if len < 2 || i + len > bytes.len() {
            return false;
        }
        i += len;

        if marker == 0xDA {
            // Entropy-coded data runs until a marker other than a stuffed
            // 0xFF00 or a restart marker.
            loop {
                match bytes.get(i).copied() {
                    None => return false,
                    Some(0xFF) => match bytes.get(i + 1).copied() {
                        None => return false,
                        Some(0x00 | 0xD0..=0xD7) => i += 2,
                        Some(0xFF) => i += 1,
                        Some(_) => break,
                    },
                    Some(_) => i += 1,
                }
            }
        }
    }
}

fn into_rgb888(image: DynamicImage, len: usize) -> Result<Vec<u8>, PipelineError> {
    if !image.color().has_alpha() {
        return Ok(image.into_rgb8().into_raw());
    }

    let rgba = image.into_rgba8();
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| PipelineError::OutOfMemory { bytes: len })?;
    for px in rgba.as_raw().chunks_exact(4) {
        let alpha = px[3] as u32;
        for &c in &px[..3] {
            data.push(((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8);
        }
    }
    Ok(data)
}

fn map_image_error(e: ImageError, bytes: usize) -> PipelineError {
    match e {
        ImageError::Limits(limit)
            if matches!(limit.kind(), LimitErrorKind::InsufficientMemory) =>
        {
            PipelineError::OutOfMemory { bytes }
        }
        ImageError::Limits(limit) => PipelineError::DecodeFailed(limit.to_string()),
        other => PipelineError::DecodeFailed(other.to_string()),
    }
}
