//! Output of the dithering pipeline.
//!
//! [`DitheredImage`] stores palette indices and renders them on demand with
//! the official colors the panel driver expects.

mod dithered_image;

pub use dithered_image::DitheredImage;
