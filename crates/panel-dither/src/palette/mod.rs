//! Palette types: named entries with official and measured colors.

mod error;
mod palette;

pub use error::{PaletteError, ParseColorError};
pub use palette::{DistanceMetric, Palette, PaletteEntry};
