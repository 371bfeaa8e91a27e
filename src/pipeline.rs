//! Pipeline orchestration: file to file and bytes to buffer.

use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use panel_dither::{DitherAlgorithm, PanelDitherer, Palette, PixelGrid};
use tempfile::NamedTempFile;

use crate::decode::decode;
use crate::encode::{encode, OutputFormat};
use crate::error::PipelineError;
use crate::format::{detect_format, grid_is_processed, Format};
use crate::models::{AppConfig, Limits, PanelGeometry, ProcessedCheck};
use crate::settings::{ProcessingSettings, SettingsProvider};

/// Owned RGB888 output of [`Pipeline::process_to_rgb`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl From<PixelGrid> for RgbImage {
    fn from(grid: PixelGrid) -> Self {
        let (width, height) = (grid.width(), grid.height());
        Self {
            data: grid.into_raw(),
            width,
            height,
        }
    }
}

/// What [`Pipeline::process_file`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The input was tone-mapped and dithered
    Dithered {
        width: u32,
        height: u32,
        algorithm: DitherAlgorithm,
    },
    /// The input was already panel-ready and was copied unchanged
    PassedThrough,
    /// The input was already panel-ready but in another container; its
    /// pixels were re-encoded without dithering
    Reencoded { format: OutputFormat },
}

/// Runs decode, panel fit, tone mapping and error diffusion.
///
/// Invocations are single-flight: concurrent calls wait for each other.
pub struct Pipeline {
    settings: Arc<dyn SettingsProvider>,
    panel: Option<PanelGeometry>,
    limits: Limits,
    processed_check: ProcessedCheck,
    guard: Mutex<()>,
}

impl Pipeline {
    pub fn new(settings: Arc<dyn SettingsProvider>, config: &AppConfig) -> Self {
        let panel = config.panel.filter(|panel| {
            if !panel.is_valid() {
                tracing::warn!(?panel, "Ignoring panel geometry with a zero dimension");
            }
            panel.is_valid()
        });
        Self {
            settings,
            panel,
            limits: config.limits,
            processed_check: config.processed_check,
            guard: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &dyn SettingsProvider {
        self.settings.as_ref()
    }

    pub fn panel(&self) -> Option<PanelGeometry> {
        self.panel
    }

    /// Convert `input` into a panel-ready image at `output`.
    ///
    /// The output is written through a temporary file in the same directory
    /// and renamed into place, so `output` is never left half-written.
    pub fn process_file(
        &self,
        input: &Path,
        output: &Path,
        algorithm: DitherAlgorithm,
    ) -> Result<ProcessOutcome, PipelineError> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        let (processing, palette) = self.settings.snapshot();
        let started = Instant::now();

        let bytes = std::fs::read(input).map_err(|e| PipelineError::io(input, e))?;
        let format = detect_format(&bytes);
        if format == Format::Unknown {
            return Err(PipelineError::UnsupportedFormat);
        }

        let output_format = OutputFormat::for_path(output);
        let grid = decode(&bytes, format, &self.limits)?;
        if self.is_processed(format, &grid, &palette) {
            if output_format.is_container_of(format) {
                write_atomic(output, &bytes)?;
                tracing::info!(
                    input = %input.display(),
                    output = %output.display(),
                    "Input already processed, copied unchanged"
                );
                return Ok(ProcessOutcome::PassedThrough);
            }
            let encoded = encode(output_format, grid.as_bytes(), grid.width(), grid.height())?;
            write_atomic(output, &encoded)?;
            tracing::info!(
                input = %input.display(),
                output = %output.display(),
                ?output_format,
                "Input already processed, re-encoded"
            );
            return Ok(ProcessOutcome::Reencoded {
                format: output_format,
            });
        }

        let rgb = self.render(grid, &processing, palette, algorithm)?;
        let encoded = encode(output_format, &rgb.data, rgb.width, rgb.height)?;
        write_atomic(output, &encoded)?;

        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            %format,
            %algorithm,
            width = rgb.width,
            height = rgb.height,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Processed image"
        );
        Ok(ProcessOutcome::Dithered {
            width: rgb.width,
            height: rgb.height,
            algorithm,
        })
    }

    /// Run the pipeline on an in-memory image. Already processed input is
    /// returned as decoded.
    pub fn process_to_rgb(
        &self,
        bytes: &[u8],
        format: Format,
        algorithm: DitherAlgorithm,
    ) -> Result<RgbImage, PipelineError> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        let (processing, palette) = self.settings.snapshot();

        let grid = decode(bytes, format, &self.limits)?;
        if self.is_processed(format, &grid, &palette) {
            tracing::debug!("Input already processed, returning decoded pixels");
            return Ok(grid.into());
        }
        self.render(grid, &processing, palette, algorithm)
    }

    fn is_processed(&self, format: Format, grid: &PixelGrid, palette: &Palette) -> bool {
        format.is_lossless() && grid_is_processed(grid, palette, &self.processed_check, self.panel)
    }

    fn render(
        &self,
        grid: PixelGrid,
        processing: &ProcessingSettings,
        palette: Arc<Palette>,
        algorithm: DitherAlgorithm,
    ) -> Result<RgbImage, PipelineError> {
        let grid = match self.panel {
            Some(panel) => {
                let fitted = grid.fit_to(panel.width, panel.height)?;
                tracing::debug!(width = panel.width, height = panel.height, "Fitted to panel");
                fitted
            }
            None => grid,
        };

        let started = Instant::now();
        let ditherer = PanelDitherer::new(palette)
            .tone(processing.tone_options())
            .dither(processing.dither_options(algorithm));
        let dithered = ditherer.render(grid)?;
        tracing::debug!(
            %algorithm,
            metric = %processing.color_method,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Dithered image"
        );

        Ok(dithered.to_official_grid()?.into())
    }
}

/// Write `bytes` to a temporary file next to `path`, then rename it over
/// `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), PipelineError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).map_err(|e| PipelineError::io(dir, e))?;
    file.write_all(bytes)
        .and_then(|()| file.as_file().sync_all())
        .map_err(|e| PipelineError::io(file.path(), e))?;
    file.persist(path)
        .map_err(|e| PipelineError::io(path, e.error))?;
    Ok(())
}
