//! Per-pixel tone mapping ahead of quantization.
//!
//! Stages run in a fixed order, each on the clamped output of the last:
//!
//! 1. Dynamic-range compression into the panel's measured black..white
//!    luminance (linear light, hue preserved)
//! 2. Exposure
//! 3. Contrast or S-curve around the midpoint, strength-blended
//! 4. Shadow lift below / highlight roll-off above the midpoint,
//!    each strength-blended
//! 5. Saturation against Rec. 601 luma
//!
//! Stages 2-4 act on one channel at a time and are precomputed into a
//! 256-entry table; stages 2-5 stay in `f32` and round once.

mod mapper;
mod options;

pub use mapper::ToneMapper;
pub use options::{ToneMode, ToneOptions};
