// Command-line front end: reads image files, converts them in memory and
// reports per-file outcome and size statistics. Converted images are not
// written anywhere; the library's session API hands them to embedding UIs.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use imageflow_lib::utils::{quality_from_percent, validate_config};
use imageflow_lib::{
    BatchConfig, BatchProcessor, ConversionSession, OutputFormat, ProgressType, RunOptions,
    SourceFile, StatisticsReport,
};

#[derive(Debug, Parser)]
#[command(name = "imageflow", version, about = "Convert a batch of images to one format and report the savings")]
struct Cli {
    /// Image files to convert
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output format (jpeg, png, webp, gif, bmp, tiff)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Quality percentage, 0-100 (only lossy formats use it)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=100))]
    quality: Option<u8>,

    /// JSON file with a batch config ({"outputFormat": "webp", "quality": 0.8})
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Pause between files in milliseconds
    #[arg(long, default_value_t = 0)]
    throttle_ms: u64,

    /// Print statistics as JSON instead of the text summary
    #[arg(long)]
    json: bool,

    /// Skip files that do not carry a known image signature
    #[arg(long)]
    images_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)         // Remove file path
        .with_line_number(false)  // Remove line numbers
        .with_thread_ids(false)   // Remove thread IDs
        .with_thread_names(false) // Remove thread names
        .with_target(false)       // Remove module path
        .with_ansi(true)          // Keep colored output
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli).await?;
    info!("Converting to {} at quality {:.2}", config.output_format, config.quality);

    let mut session = ConversionSession::with_config(config)?;
    session.on_progress(|progress| match progress.progress_type {
        ProgressType::Progress => info!(
            "[{:>3}%] {}",
            progress.progress_percentage, progress.status
        ),
        ProgressType::Error => warn!(
            "[{:>3}%] {}: {}",
            progress.progress_percentage,
            progress.status,
            progress.error.as_deref().unwrap_or("unknown error")
        ),
        _ => debug!("{}", progress.status),
    });

    let files = read_files(&cli.files, cli.images_only).await?;
    let summary = session.admit(files);
    if summary.skipped > 0 {
        info!("Skipped {} duplicate files", summary.skipped);
    }

    let processor = BatchProcessor::new(RunOptions::with_throttle(Duration::from_millis(cli.throttle_ms)));
    let statistics = processor.run(&mut session).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&statistics)?);
    } else {
        println!("{}", StatisticsReport::new(&statistics).with_items(session.list()));
    }

    Ok(())
}

/// Settings file first, then command-line flags on top.
async fn resolve_config(cli: &Cli) -> Result<BatchConfig> {
    let mut config = match &cli.settings {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read settings file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Invalid settings file {}", path.display()))?
        }
        None => BatchConfig::default(),
    };

    if let Some(format) = cli.format {
        config.output_format = format;
    }
    if let Some(percent) = cli.quality {
        config.quality = quality_from_percent(percent)?;
    }

    validate_config(&config)?;
    Ok(config)
}

async fn read_files(paths: &[PathBuf], images_only: bool) -> Result<Vec<SourceFile>> {
    let mut files = Vec::with_capacity(paths.len());

    for path in paths {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file = SourceFile::new(file_name(path), bytes);

        if images_only && !file.looks_like_image() {
            warn!("Skipping {}: not a recognised image", path.display());
            continue;
        }
        files.push(file);
    }

    if files.is_empty() {
        bail!("No input files to convert");
    }
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
