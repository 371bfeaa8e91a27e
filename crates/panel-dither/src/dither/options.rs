//! Dithering options.

use super::DitherAlgorithm;
use crate::palette::DistanceMetric;

/// Configuration for [`diffuse`](super::diffuse).
///
/// ```
/// use panel_dither::{DistanceMetric, DitherAlgorithm, DitherOptions};
///
/// let options = DitherOptions::new()
///     .algorithm(DitherAlgorithm::Stucki)
///     .metric(DistanceMetric::Lab);
/// assert_eq!(options.algorithm, DitherAlgorithm::Stucki);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DitherOptions {
    /// Error diffusion kernel. Default: Floyd-Steinberg
    pub algorithm: DitherAlgorithm,
    /// Nearest-color metric. Default: RGB
    pub metric: DistanceMetric,
}

impl DitherOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn algorithm(mut self, algorithm: DitherAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    #[inline]
    pub fn metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }
}
