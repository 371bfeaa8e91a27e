//! Color types and conversion utilities
//!
//! - [`Srgb`]: 8-bit gamma-encoded samples, the pipeline's working format
//! - [`LinearRgb`]: linear light, for luminance math
//! - [`Oklab`]: perceptual space for the `lab` color method
//!
//! ```
//! use panel_dither::{LinearRgb, Srgb};
//!
//! let srgb = Srgb::new(128, 64, 32);
//! let linear = LinearRgb::from(srgb);
//! assert_eq!(Srgb::from(linear), srgb);
//! ```

mod linear_rgb;
mod lut;
mod oklab;
mod srgb;

pub use linear_rgb::LinearRgb;
pub use lut::{linear_to_srgb8, srgb8_to_linear};
pub use oklab::Oklab;
pub use srgb::Srgb;
