use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use panel_dither::DitherAlgorithm;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use photoframe::models::{AppConfig, DEFAULT_CONFIG_FILE};
use photoframe::{detect_format_path, is_processed, FileSettings, Pipeline, ProcessOutcome};
use photoframe::{Format, SettingsProvider};

#[derive(Parser)]
#[command(name = "photoframe")]
#[command(about = "Convert photographs for a six-color e-paper frame")]
struct Cli {
    /// Config file (default: photoframe.yaml in the working directory)
    #[arg(long, global = true, env = "PHOTOFRAME_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode, tone-map and dither an image for the panel
    Process {
        /// Input image (PNG, BMP or JPEG)
        input: PathBuf,

        /// Output path; ".bmp" writes BMP, anything else PNG
        output: PathBuf,

        /// floyd-steinberg, stucki, burkes or sierra (default: from settings)
        #[arg(short, long)]
        dither: Option<DitherAlgorithm>,
    },
    /// Print an image's format and whether it is already panel-ready
    Detect {
        file: PathBuf,
    },
    /// Print the effective processing settings as JSON
    Settings,
    /// Print the palette entries
    Palette,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photoframe=info,panel_dither=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = AppConfig::load_or_default(Some(&config_path));
    let settings = Arc::new(FileSettings::from_config(&config_path, &config));

    match cli.command {
        Commands::Process {
            input,
            output,
            dither,
        } => run_process_command(settings, &config, &input, &output, dither),
        Commands::Detect { file } => run_detect_command(settings.as_ref(), &config, &file),
        Commands::Settings => {
            let json = serde_json::to_string_pretty(&settings.processing())?;
            println!("{json}");
            Ok(())
        }
        Commands::Palette => {
            let palette = settings.palette();
            for entry in palette.entries() {
                println!("{:<10} {}  measured {}", entry.name, entry.official, entry.actual);
            }
            Ok(())
        }
    }
}

fn run_process_command(
    settings: Arc<FileSettings>,
    config: &AppConfig,
    input: &Path,
    output: &Path,
    dither: Option<DitherAlgorithm>,
) -> anyhow::Result<()> {
    let algorithm = dither.unwrap_or(settings.processing().dither_algorithm);
    let pipeline = Pipeline::new(settings, config);
    let outcome = pipeline
        .process_file(input, output, algorithm)
        .with_context(|| format!("Failed to process {}", input.display()))?;

    match outcome {
        ProcessOutcome::Dithered {
            width,
            height,
            algorithm,
        } => println!(
            "Wrote {} ({width}x{height}, {algorithm})",
            output.display()
        ),
        ProcessOutcome::PassedThrough => {
            println!("Wrote {} (already processed, copied)", output.display())
        }
        ProcessOutcome::Reencoded { format } => println!(
            "Wrote {} (already processed, re-encoded as {format:?})",
            output.display()
        ),
    }
    Ok(())
}

fn run_detect_command(
    settings: &FileSettings,
    config: &AppConfig,
    file: &Path,
) -> anyhow::Result<()> {
    let format = detect_format_path(file)?;
    let processed = if format == Format::Unknown {
        false
    } else {
        let bytes =
            std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
        is_processed(
            &bytes,
            &settings.palette(),
            &config.processed_check,
            config.panel,
        )
    };
    println!("{}: {format}, processed: {processed}", file.display());
    Ok(())
}
