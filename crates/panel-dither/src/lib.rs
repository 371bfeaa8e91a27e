#![allow(clippy::excessive_precision, clippy::module_inception)]

//! panel-dither: tone mapping and error diffusion for small e-paper palettes
//!
//! The pipeline takes an RGB888 [`PixelGrid`], tone-maps it in place with
//! [`ToneMapper`], and quantizes it onto a [`Palette`] with one of four
//! error diffusion kernels, producing a [`DitheredImage`].
//!
//! # Quick Start
//!
//! ```
//! use panel_dither::{DitherAlgorithm, PanelDitherer, Palette, PixelGrid, Srgb};
//!
//! let palette = Palette::default();
//! let ditherer = PanelDitherer::new(palette).algorithm(DitherAlgorithm::Stucki);
//!
//! let grid = PixelGrid::filled(8, 8, Srgb::new(90, 140, 200)).unwrap();
//! let result = ditherer.render(grid).unwrap();
//! let rgb = result.to_rgb_official().unwrap();
//! assert_eq!(rgb.len(), 8 * 8 * 3);
//! ```
//!
//! # Official and measured colors
//!
//! An e-paper panel renders "red" as whatever its pigments manage. Each
//! palette entry carries the official color the driver expects and the
//! measured color the panel actually shows. Nearest-color search and the
//! diffused error use the measured colors; output uses the official ones.
//! Range compression maps the input into the measured black..white span
//! so highlights are not all clipped to the panel's dull white.
//!
//! # Determinism
//!
//! Quantization works on 8-bit integers in raster order with truncating
//! integer division, and ties between palette entries go to the earlier
//! entry. The same input, palette and options always produce the same
//! indices.

pub mod api;
pub mod color;
pub mod dither;
pub mod grid;
pub mod output;
pub mod palette;
pub mod tone;


pub use api::{DitherError, PanelDitherer};
pub use color::{LinearRgb, Oklab, Srgb};
pub use dither::{diffuse, DitherAlgorithm, DitherOptions, ErrorBuffer, Kernel};
pub use grid::PixelGrid;
pub use output::DitheredImage;
pub use palette::{DistanceMetric, Palette, PaletteEntry, PaletteError, ParseColorError};
pub use tone::{ToneMapper, ToneMode, ToneOptions};
