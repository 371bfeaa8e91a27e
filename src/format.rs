//! Magic-byte format detection and the already-processed check.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use panel_dither::{Palette, PixelGrid};

use crate::decode::decode;
use crate::error::PipelineError;
use crate::models::{Limits, PanelGeometry, ProcessedCheck};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const BMP_SIGNATURE: [u8; 2] = [b'B', b'M'];
const JPEG_SIGNATURE: [u8; 2] = [0xFF, 0xD8];

/// Container format of an input image, by signature only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Png,
    Bmp,
    Jpeg,
    Unknown,
}

impl Format {
    pub fn name(self) -> &'static str {
        match self {
            Format::Png => "png",
            Format::Bmp => "bmp",
            Format::Jpeg => "jpeg",
            Format::Unknown => "unknown",
        }
    }

    /// Only lossless containers can hold an exact palette image.
    pub fn is_lossless(self) -> bool {
        matches!(self, Format::Png | Format::Bmp)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn detect_format(bytes: &[u8]) -> Format {
    if bytes.starts_with(&PNG_SIGNATURE) {
        Format::Png
    } else if bytes.starts_with(&BMP_SIGNATURE) {
        Format::Bmp
    } else if bytes.starts_with(&JPEG_SIGNATURE) {
        Format::Jpeg
    } else {
        Format::Unknown
    }
}

/// Detect from the first bytes of a file without reading the rest.
pub fn detect_format_path(path: &Path) -> Result<Format, PipelineError> {
    let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
    let mut head = Vec::with_capacity(PNG_SIGNATURE.len());
    file.take(PNG_SIGNATURE.len() as u64)
        .read_to_end(&mut head)
        .map_err(|e| PipelineError::io(path, e))?;
    Ok(detect_format(&head))
}

/// True only when `bytes` is a lossless image whose sampled pixels are all
/// official palette colors (and, with a panel configured, panel-sized).
///
/// Any failure to decode answers `false`.
pub fn is_processed(
    bytes: &[u8],
    palette: &Palette,
    check: &ProcessedCheck,
    panel: Option<PanelGeometry>,
) -> bool {
    let format = detect_format(bytes);
    if !format.is_lossless() {
        return false;
    }
    match decode(bytes, format, &Limits::default()) {
        Ok(grid) => grid_is_processed(&grid, palette, check, panel),
        Err(e) => {
            tracing::debug!(%e, "Not processed: decode failed");
            false
        }
    }
}

/// The sampling half of [`is_processed`], for an already decoded grid.
pub fn grid_is_processed(
    grid: &PixelGrid,
    palette: &Palette,
    check: &ProcessedCheck,
    panel: Option<PanelGeometry>,
) -> bool {
    if let Some(panel) = panel {
        if grid.width() != panel.width || grid.height() != panel.height {
            return false;
        }
    }

    let total = grid.pixel_count();
    let samples = check.sample_count.max(1);
    if total < check.min_samples || total <= samples {
        return grid
            .pixels()
            .all(|px| palette.index_of_official(px).is_some());
    }

    (0..samples).all(|i| {
        let index = (i as u64 * total as u64 / samples as u64) as usize;
        palette.index_of_official(grid.pixel_at(index)).is_some()
    })
}
