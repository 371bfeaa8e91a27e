use std::sync::Arc;

use crate::api::{try_alloc, DitherError};
use crate::grid::PixelGrid;
use crate::palette::Palette;

/// Palette indices, one per pixel in row-major order, plus the palette that
/// produced them.
///
/// ```
/// use std::sync::Arc;
/// use panel_dither::{DitheredImage, Palette, Srgb};
///
/// let palette = Palette::from_colors(&[Srgb::BLACK, Srgb::WHITE], None).unwrap();
/// let image = DitheredImage::new(vec![0, 1, 1, 0], 2, 2, Arc::new(palette));
///
/// assert_eq!(image.indices(), &[0, 1, 1, 0]);
/// assert_eq!(image.to_rgb_official().unwrap().len(), 2 * 2 * 3);
/// ```
#[derive(Debug, Clone)]
pub struct DitheredImage {
    indices: Vec<u8>,
    width: u32,
    height: u32,
    palette: Arc<Palette>,
}

impl DitheredImage {
    /// # Panics (debug only)
    ///
    /// Debug-asserts that `indices.len() == width * height`.
    pub fn new(indices: Vec<u8>, width: u32, height: u32, palette: Arc<Palette>) -> Self {
        debug_assert_eq!(
            indices.len(),
            width as usize * height as usize,
            "indices length must match {}x{}",
            width,
            height,
        );
        Self {
            indices,
            width,
            height,
            palette,
        }
    }

    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
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
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// RGB bytes in the official colors, as the panel driver expects them.
    pub fn to_rgb_official(&self) -> Result<Vec<u8>, DitherError> {
        let mut rgb: Vec<u8> = try_alloc(self.indices.len() * 3)?;
        for (px, &idx) in rgb.chunks_exact_mut(3).zip(&self.indices) {
            px.copy_from_slice(&self.palette.official(idx as usize).to_bytes());
        }
        Ok(rgb)
    }

    /// The official-color rendering as a grid.
    pub fn to_official_grid(&self) -> Result<PixelGrid, DitherError> {
        PixelGrid::new(self.width, self.height, self.to_rgb_official()?)
    }
}
