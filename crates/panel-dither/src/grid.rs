//! Owned RGB888 pixel buffer and the geometric operations that fit an image
//! to a panel.

use crate::api::{try_alloc, DitherError};
use crate::color::Srgb;

/// An owned, row-major RGB888 image.
///
/// Invariant: `data.len() == width * height * 3` and both dimensions are
/// non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelGrid {
    /// Wrap an interleaved RGB buffer.
    ///
    /// # Errors
    ///
    /// [`DitherError::InvalidDimensions`] for a zero dimension or a size that
    /// overflows `usize`, [`DitherError::BufferSize`] when `data` has the
    /// wrong length.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, DitherError> {
        let expected = Self::byte_len(width, height)?;
        if data.len() != expected {
            return Err(DitherError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A grid of one color.
    pub fn filled(width: u32, height: u32, color: Srgb) -> Result<Self, DitherError> {
        let mut data: Vec<u8> = try_alloc(Self::byte_len(width, height)?)?;
        for px in data.chunks_exact_mut(3) {
            px.copy_from_slice(&color.to_bytes());
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build from a row-major slice of colors.
    pub fn from_pixels(width: u32, height: u32, pixels: &[Srgb]) -> Result<Self, DitherError> {
        let data = pixels.iter().flat_map(|c| c.to_bytes()).collect();
        Self::new(width, height, data)
    }

    /// Bytes needed for a `width` x `height` RGB888 buffer.
    pub fn byte_len(width: u32, height: u32) -> Result<usize, DitherError> {
        if width == 0 || height == 0 {
            return Err(DitherError::InvalidDimensions { width, height });
        }
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(3))
            .ok_or(DitherError::InvalidDimensions { width, height })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Srgb {
        self.pixel_at(y as usize * self.width as usize + x as usize)
    }

    /// Pixel by row-major linear index.
    #[inline]
    pub fn pixel_at(&self, index: usize) -> Srgb {
        let i = index * 3;
        Srgb::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    pub fn pixels(&self) -> impl Iterator<Item = Srgb> + '_ {
        self.data
            .chunks_exact(3)
            .map(|px| Srgb::new(px[0], px[1], px[2]))
    }

    /// Mutable `[r, g, b]` slices in row-major order.
    pub fn pixels_mut(&mut self) -> std::slice::ChunksExactMut<'_, u8> {
        self.data.chunks_exact_mut(3)
    }

    /// Nearest-neighbor scale to cover `width` x `height`, then center-crop.
    pub fn resize_cover(&self, width: u32, height: u32) -> Result<PixelGrid, DitherError> {
        let mut data: Vec<u8> = try_alloc(Self::byte_len(width, height)?)?;

        let sw = self.width as f64;
        let sh = self.height as f64;
        let scale = (width as f64 / sw).max(height as f64 / sh);
        let off_x = (sw * scale - width as f64) / 2.0;
        let off_y = (sh * scale - height as f64) / 2.0;

        let src_x: Vec<usize> = (0..width)
            .map(|x| {
                let sx = ((x as f64 + off_x + 0.5) / scale) as usize;
                sx.min(self.width as usize - 1)
            })
            .collect();

        let row_bytes = width as usize * 3;
        for (y, row) in data.chunks_exact_mut(row_bytes).enumerate() {
            let sy = ((y as f64 + off_y + 0.5) / scale) as usize;
            let sy = sy.min(self.height as usize - 1);
            let src_row = sy * self.width as usize;
            for (px, &sx) in row.chunks_exact_mut(3).zip(&src_x) {
                let i = (src_row + sx) * 3;
                px.copy_from_slice(&self.data[i..i + 3]);
            }
        }

        Ok(PixelGrid {
            width,
            height,
            data,
        })
    }

    /// Rotate 90 degrees clockwise.
    pub fn rotate_cw(&self) -> Result<PixelGrid, DitherError> {
        let (w, h) = (self.width as usize, self.height as usize);
        let mut data: Vec<u8> = try_alloc(self.data.len())?;
        // New width is the old height.
        for y in 0..h {
            for x in 0..w {
                let src = (y * w + x) * 3;
                let dst = (x * h + (h - 1 - y)) * 3;
                data[dst..dst + 3].copy_from_slice(&self.data[src..src + 3]);
            }
        }
        Ok(PixelGrid {
            width: self.height,
            height: self.width,
            data,
        })
    }

    /// Fit to a panel: rotate when orientations disagree, cover-resize to
    /// the exact panel size.
    ///
    /// Resizing happens before rotation so the rotated copy is panel-sized.
    pub fn fit_to(self, panel_width: u32, panel_height: u32) -> Result<PixelGrid, DitherError> {
        if self.width == panel_width && self.height == panel_height {
            return Ok(self);
        }
        let landscape = self.width > self.height;
        let portrait = self.height > self.width;
        let needs_rotation =
            (landscape && panel_height > panel_width) || (portrait && panel_width > panel_height);

        if needs_rotation {
            if self.width == panel_height && self.height == panel_width {
                return self.rotate_cw();
            }
            self.resize_cover(panel_height, panel_width)?.rotate_cw()
        } else {
            self.resize_cover(panel_width, panel_height)
        }
    }
}
