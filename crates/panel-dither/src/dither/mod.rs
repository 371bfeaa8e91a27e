//! Error diffusion dithering.
//!
//! Pixels are visited in raster order (row-major, left to right, no
//! serpentine). Each pixel plus its accumulated error is clamped to the
//! 8-bit range, matched to the nearest measured palette color, and the
//! signed integer residual is pushed to unvisited neighbors through the
//! selected [`Kernel`]. Targets outside the image are dropped.
//!
//! ```
//! use panel_dither::{diffuse, DitherOptions, Palette, PixelGrid, Srgb};
//!
//! let palette = Palette::from_colors(&[Srgb::BLACK, Srgb::WHITE], None).unwrap();
//! let grid = PixelGrid::filled(4, 4, Srgb::new(128, 128, 128)).unwrap();
//! let indices = diffuse(&grid, &palette, &DitherOptions::new()).unwrap();
//! assert_eq!(indices.len(), 16);
//! ```

mod kernel;
mod options;

use std::fmt;
use std::str::FromStr;

pub use kernel::*;
pub use options::DitherOptions;

use crate::api::{try_alloc, DitherError};
use crate::grid::PixelGrid;
use crate::palette::Palette;

/// Error diffusion algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum DitherAlgorithm {
    #[default]
    FloydSteinberg,
    Stucki,
    Burkes,
    Sierra,
}

impl DitherAlgorithm {
    pub const ALL: [DitherAlgorithm; 4] = [
        DitherAlgorithm::FloydSteinberg,
        DitherAlgorithm::Stucki,
        DitherAlgorithm::Burkes,
        DitherAlgorithm::Sierra,
    ];

    pub fn kernel(self) -> &'static Kernel {
        match self {
            DitherAlgorithm::FloydSteinberg => &FLOYD_STEINBERG,
            DitherAlgorithm::Stucki => &STUCKI,
            DitherAlgorithm::Burkes => &BURKES,
            DitherAlgorithm::Sierra => &SIERRA,
        }
    }

    /// Settings-file name: `floyd-steinberg`, `stucki`, `burkes`, `sierra`.
    pub fn name(self) -> &'static str {
        match self {
            DitherAlgorithm::FloydSteinberg => "floyd-steinberg",
            DitherAlgorithm::Stucki => "stucki",
            DitherAlgorithm::Burkes => "burkes",
            DitherAlgorithm::Sierra => "sierra",
        }
    }
}

impl fmt::Display for DitherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DitherAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| format!("unknown dither algorithm '{wanted}'"))
    }
}

/// Sliding window of pending error rows.
///
/// Holds `max_dy + 1` rows: `rows[0]` is the current row. Only the rows a
/// kernel can reach are kept, never a whole-image buffer.
#[derive(Debug)]
pub struct ErrorBuffer {
    rows: Vec<Vec<[i32; 3]>>,
    width: usize,
}

impl ErrorBuffer {
    pub fn new(width: usize, row_depth: usize) -> Result<Self, DitherError> {
        let mut rows = Vec::new();
        rows.try_reserve_exact(row_depth)
            .map_err(|_| DitherError::OutOfMemory {
                bytes: row_depth * std::mem::size_of::<Vec<[i32; 3]>>(),
            })?;
        for _ in 0..row_depth {
            rows.push(try_alloc(width)?);
        }
        Ok(Self { rows, width })
    }

    #[inline]
    pub fn get_accumulated(&self, x: usize) -> [i32; 3] {
        self.rows[0][x]
    }

    /// Add error to a pending pixel. Out-of-range targets are ignored.
    #[inline]
    pub fn add_error(&mut self, x: isize, row_offset: usize, error: [i32; 3]) {
        if x < 0 || x as usize >= self.width || row_offset >= self.rows.len() {
            return;
        }
        let cell = &mut self.rows[row_offset][x as usize];
        for c in 0..3 {
            cell[c] += error[c];
        }
    }

    /// Drop the current row and open a zeroed row at the far end.
    pub fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0; 3]);
        }
    }
}

/// Quantize `grid` to palette indices, one per pixel in row-major order.
///
/// # Errors
///
/// [`DitherError::OutOfMemory`] if the index buffer or error window cannot
/// be allocated.
pub fn diffuse(
    grid: &PixelGrid,
    palette: &Palette,
    options: &DitherOptions,
) -> Result<Vec<u8>, DitherError> {
    let width = grid.width() as usize;
    let height = grid.height() as usize;
    let kernel = options.algorithm.kernel();

    let mut output: Vec<u8> = try_alloc(grid.pixel_count())?;
    let mut errors = ErrorBuffer::new(width, kernel.max_dy + 1)?;

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let source = grid.pixel_at(idx).to_i32();
            let pending = errors.get_accumulated(x);
            let pixel = [
                (source[0] + pending[0]).clamp(0, 255),
                (source[1] + pending[1]).clamp(0, 255),
                (source[2] + pending[2]).clamp(0, 255),
            ];

            let nearest = palette.find_nearest(pixel, options.metric);
            output[idx] = nearest as u8;

            let target = palette.actual(nearest).to_i32();
            let error = [
                pixel[0] - target[0],
                pixel[1] - target[1],
                pixel[2] - target[2],
            ];
            if error != [0; 3] {
                spread(&mut errors, kernel, x, error);
            }
        }
        errors.advance_row();
    }

    Ok(output)
}

/// Distribute the residual of pixel `x` in the current row to its
/// neighbors. Each share is truncated toward zero.
fn spread(errors: &mut ErrorBuffer, kernel: &Kernel, x: usize, error: [i32; 3]) {
    let divisor = kernel.divisor as i32;
    for &(dx, dy, weight) in kernel.entries {
        let w = weight as i32;
        let share = [
            error[0] * w / divisor,
            error[1] * w / divisor,
            error[2] * w / divisor,
        ];
        errors.add_error(x as isize + dx as isize, dy as usize, share);
    }
}
