//! PanelDitherer builder: the primary entry point for the crate.
//!
//! Wraps tone mapping and error diffusion behind a fluent builder.

use std::sync::Arc;

use super::DitherError;
use crate::dither::{diffuse, DitherAlgorithm, DitherOptions};
use crate::grid::PixelGrid;
use crate::output::DitheredImage;
use crate::palette::{DistanceMetric, Palette};
use crate::tone::{ToneMapper, ToneOptions};

/// Tone-map and dither images for one palette snapshot.
///
/// - Constructor requires a [`Palette`] (no invalid states)
/// - Configuration methods consume and return `self`
/// - [`render()`](Self::render) takes `&self`, so one ditherer serves many
///   images
///
/// ```
/// use panel_dither::{DitherAlgorithm, PanelDitherer, Palette, PixelGrid, Srgb, ToneOptions};
///
/// let palette = Palette::from_colors(&[Srgb::BLACK, Srgb::WHITE], None).unwrap();
/// let ditherer = PanelDitherer::new(palette)
///     .tone(ToneOptions::new().contrast(1.2))
///     .algorithm(DitherAlgorithm::Burkes);
///
/// let grid = PixelGrid::filled(4, 2, Srgb::new(128, 128, 128)).unwrap();
/// let result = ditherer.render(grid).unwrap();
/// assert_eq!(result.width(), 4);
/// assert_eq!(result.height(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct PanelDitherer {
    palette: Arc<Palette>,
    mapper: ToneMapper,
    options: DitherOptions,
}

impl PanelDitherer {
    /// Default tone options, Floyd-Steinberg and RGB matching.
    pub fn new(palette: impl Into<Arc<Palette>>) -> Self {
        let palette = palette.into();
        let mapper = ToneMapper::new(ToneOptions::default(), &palette);
        Self {
            palette,
            mapper,
            options: DitherOptions::default(),
        }
    }

    pub fn tone(mut self, options: ToneOptions) -> Self {
        self.mapper = ToneMapper::new(options, &self.palette);
        self
    }

    /// Replace algorithm and metric at once.
    pub fn dither(mut self, options: DitherOptions) -> Self {
        self.options = options;
        self
    }

    #[inline]
    pub fn algorithm(mut self, algorithm: DitherAlgorithm) -> Self {
        self.options = self.options.algorithm(algorithm);
        self
    }

    #[inline]
    pub fn metric(mut self, metric: DistanceMetric) -> Self {
        self.options = self.options.metric(metric);
        self
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn dither_options(&self) -> &DitherOptions {
        &self.options
    }

    pub fn tone_options(&self) -> &ToneOptions {
        self.mapper.options()
    }

    /// Tone-map `grid` in place, then quantize it.
    pub fn render(&self, mut grid: PixelGrid) -> Result<DitheredImage, DitherError> {
        self.mapper.apply(&mut grid);
        let indices = diffuse(&grid, &self.palette, &self.options)?;
        Ok(DitheredImage::new(
            indices,
            grid.width(),
            grid.height(),
            Arc::clone(&self.palette),
        ))
    }
}
