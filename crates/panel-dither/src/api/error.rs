//! Unified error type for the panel-dither public API.

use crate::palette::{PaletteError, ParseColorError};
use std::fmt;

/// Unified error type for the panel-dither public API.
///
/// ```
/// use panel_dither::{DitherError, Palette};
///
/// fn create_palette() -> Result<Palette, DitherError> {
///     let palette = Palette::from_hex(&["#000000", "#FFFFFF"], None)?;
///     Ok(palette)
/// }
/// ```
#[derive(Debug)]
pub enum DitherError {
    Palette(PaletteError),
    ParseColor(ParseColorError),
    /// Pixel buffer length does not match `width * height * 3`
    BufferSize { expected: usize, actual: usize },
    /// Zero-sized or overflowing dimensions
    InvalidDimensions { width: u32, height: u32 },
    /// A working buffer could not be allocated
    OutOfMemory { bytes: usize },
}

impl fmt::Display for DitherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DitherError::Palette(err) => write!(f, "palette error: {}", err),
            DitherError::ParseColor(err) => write!(f, "color parse error: {}", err),
            DitherError::BufferSize { expected, actual } => write!(
                f,
                "pixel buffer holds {} bytes, expected {}",
                actual, expected
            ),
            DitherError::InvalidDimensions { width, height } => {
                write!(f, "invalid image dimensions {}x{}", width, height)
            }
            DitherError::OutOfMemory { bytes } => {
                write!(f, "failed to allocate {} bytes", bytes)
            }
        }
    }
}

impl std::error::Error for DitherError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DitherError::Palette(err) => Some(err),
            DitherError::ParseColor(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PaletteError> for DitherError {
    fn from(err: PaletteError) -> Self {
        DitherError::Palette(err)
    }
}

impl From<ParseColorError> for DitherError {
    fn from(err: ParseColorError) -> Self {
        DitherError::ParseColor(err)
    }
}

/// Allocate a zeroed buffer of `len` elements, reporting failure instead of
/// aborting the process.
pub(crate) fn try_alloc<T: Clone + Default>(len: usize) -> Result<Vec<T>, DitherError> {
    let bytes = len.saturating_mul(std::mem::size_of::<T>());
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| DitherError::OutOfMemory { bytes })?;
    buf.resize(len, T::default());
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_alloc_zeroed() {
        let buf: Vec<u8> = try_alloc(16).unwrap();
        assert_eq!(buf, vec![0u8; 16]);
    }

    #[test]
    fn test_try_alloc_reports_impossible_request() {
        let err = try_alloc::<[i32; 3]>(usize::MAX / 4).unwrap_err();
        assert!(matches!(err, DitherError::OutOfMemory { .. }));
    }

    #[test]
    fn test_display() {
        let err = DitherError::BufferSize {
            expected: 12,
            actual: 9,
        };
        assert_eq!(err.to_string(), "pixel buffer holds 9 bytes, expected 12");
    }
}
