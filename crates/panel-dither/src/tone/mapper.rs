use super::options::{ToneMode, ToneOptions};
use crate::color::{linear_to_srgb8, LinearRgb, Srgb};
use crate::grid::PixelGrid;
use crate::palette::Palette;

/// Luminance below which a pixel counts as pure black for range compression.
const BLACK_EPSILON: f32 = 1e-6;

/// Applies [`ToneOptions`] to a [`PixelGrid`] in place.
///
/// The panel's black and white points come from the palette's measured
/// colors, so construct one mapper per palette snapshot.
#[derive(Debug, Clone)]
pub struct ToneMapper {
    options: ToneOptions,
    black_y: f32,
    white_y: f32,
    curve: [f32; 256],
}

impl ToneMapper {
    pub fn new(options: ToneOptions, palette: &Palette) -> Self {
        let (black_y, white_y) = palette.luminance_range();
        let mut curve = [0.0f32; 256];
        for (v, out) in curve.iter_mut().enumerate() {
            *out = channel_curve(v as f32, &options);
        }
        Self {
            options,
            black_y,
            white_y,
            curve,
        }
    }

    pub fn options(&self) -> &ToneOptions {
        &self.options
    }

    pub fn apply(&self, grid: &mut PixelGrid) {
        for px in grid.pixels_mut() {
            let mapped = self.map_pixel(Srgb::new(px[0], px[1], px[2]));
            px.copy_from_slice(&mapped.to_bytes());
        }
    }

    /// Map one pixel through every stage.
    pub fn map_pixel(&self, pixel: Srgb) -> Srgb {
        let pixel = if self.options.compress_dynamic_range {
            self.compress(pixel)
        } else {
            pixel
        };

        let mut v = [
            self.curve[pixel.r as usize],
            self.curve[pixel.g as usize],
            self.curve[pixel.b as usize],
        ];

        let saturation = self.options.saturation;
        if saturation != 1.0 {
            let luma = 0.299 * v[0] + 0.587 * v[1] + 0.114 * v[2];
            for c in v.iter_mut() {
                *c = (luma + (*c - luma) * saturation).clamp(0.0, 255.0);
            }
        }

        Srgb::new(round(v[0]), round(v[1]), round(v[2]))
    }

    /// Scale luminance into `black_y..white_y`, keeping channel ratios.
    fn compress(&self, pixel: Srgb) -> Srgb {
        let linear = LinearRgb::from(pixel);
        let y = linear.luminance();
        if y <= BLACK_EPSILON {
            let g = linear_to_srgb8(self.black_y);
            return Srgb::new(g, g, g);
        }
        let target = self.black_y + y * (self.white_y - self.black_y);
        Srgb::from(linear.scale(target / y))
    }
}

#[inline]
fn round(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Exposure, contrast and shadow/highlight for one channel value in 0..=255.
fn channel_curve(v: f32, o: &ToneOptions) -> f32 {
    let m = o.midpoint.clamp(0.0, 1.0);
    let pivot = m * 255.0;

    let mut v = (v * o.exposure).clamp(0.0, 255.0);

    let curved = match o.mode {
        ToneMode::Contrast => (pivot + (v - pivot) * o.contrast).clamp(0.0, 255.0),
        ToneMode::Scurve => s_curve(v / 255.0, m, o.contrast.max(0.0)) * 255.0,
    };
    v = (v + (curved - v) * o.strength).clamp(0.0, 255.0);

    let shadow = o.shadow_boost.max(0.0);
    if shadow > 0.0 && v < pivot {
        let x = v / 255.0;
        let lifted = m * (x / m).powf(1.0 / (1.0 + shadow)) * 255.0;
        v = (v + (lifted - v) * o.strength).clamp(0.0, 255.0);
    }

    let knee = o.highlight_compress.max(0.0);
    if knee > 0.0 && v > pivot {
        let t = (v / 255.0 - m) / (1.0 - m);
        let rolled = (m + (1.0 - m) * t / (1.0 + knee * t)) * 255.0;
        v = (v + (rolled - v) * o.strength).clamp(0.0, 255.0);
    }

    v
}

/// Power curve steepening (k > 1) or flattening (k < 1) around `m`.
/// Fixed points: 0, `m` and 1.
fn s_curve(x: f32, m: f32, k: f32) -> f32 {
    if x < m {
        m * (x / m).powf(k)
    } else if m < 1.0 {
        1.0 - (1.0 - m) * ((1.0 - x) / (1.0 - m)).powf(k)
    } else {
        x
    }
}
