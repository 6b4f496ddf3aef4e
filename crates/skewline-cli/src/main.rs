//! Skewline CLI - document skew estimation from the command line.

mod dataset;
mod metrics;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use skewline_core::edges::HysteresisMode;
use skewline_core::render::{estimate_and_render, RenderOptions, DEFAULT_RENDER_LINES};
use skewline_core::{detect_edges_with, estimate_angle_with, SkewConfig, SkewEstimate};

use crate::dataset::{evaluate_dataset, load_image};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "skewline")]
#[command(about = "Estimate the skew angle of scanned documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the skew of a single image.
    Estimate {
        /// Path to the input image.
        #[arg(long)]
        image: PathBuf,

        /// Estimator settings (JSON).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the estimate as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Write the binary edge map of an image as PNG.
    Edges {
        /// Path to the input image.
        #[arg(long)]
        image: PathBuf,

        /// Output PNG path.
        #[arg(long)]
        out: PathBuf,

        /// Estimator settings (JSON); thresholds below override it.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Lower hysteresis threshold.
        #[arg(long)]
        low: Option<f64>,

        /// Upper hysteresis threshold.
        #[arg(long)]
        high: Option<f64>,

        /// Follow chains of weak pixels instead of a single neighbour check.
        #[arg(long)]
        connected: bool,
    },

    /// Draw the strongest lines at any angle over the edge map.
    Render {
        /// Path to the input image.
        #[arg(long)]
        image: PathBuf,

        /// Output PNG path.
        #[arg(long)]
        out: PathBuf,

        /// Estimator settings (JSON).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of lines to draw.
        #[arg(long, default_value_t = DEFAULT_RENDER_LINES)]
        max_lines: usize,
    },

    /// Compare estimates against a directory of labels.
    Evaluate {
        /// Directory of images.
        #[arg(long)]
        images: PathBuf,

        /// Directory of `<stem>.txt` label files.
        #[arg(long)]
        labels: PathBuf,

        /// Estimator settings (JSON).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Path to write metrics and per-image results (JSON).
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> CliResult<()> {
    match command {
        Commands::Estimate {
            image,
            config,
            json,
        } => run_estimate(&image, config.as_deref(), json),
        Commands::Edges {
            image,
            out,
            config,
            low,
            high,
            connected,
        } => run_edges(&image, &out, config.as_deref(), low, high, connected),
        Commands::Render {
            image,
            out,
            config,
            max_lines,
        } => run_render(&image, &out, config.as_deref(), max_lines),
        Commands::Evaluate {
            images,
            labels,
            config,
            report,
        } => run_evaluate(&images, &labels, config.as_deref(), report.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> CliResult<SkewConfig> {
    let Some(path) = path else {
        return Ok(SkewConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|e| -> CliError {
        format!("Failed to read config {}: {}", path.display(), e).into()
    })?;
    let config: SkewConfig = serde_json::from_str(&text).map_err(|e| -> CliError {
        format!("Invalid config {}: {}", path.display(), e).into()
    })?;
    config.validate()?;
    tracing::debug!(?config, "loaded config");
    Ok(config)
}

fn print_estimate(estimate: &SkewEstimate, json: bool) -> CliResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(estimate)?);
    } else {
        println!("mean_angle: {:.4}", estimate.mean_angle);
        println!("fixed_angle: {:.4}", estimate.fixed_angle);
        println!("lines: {}", estimate.line_count);
    }
    Ok(())
}

fn run_estimate(image_path: &Path, config_path: Option<&Path>, json: bool) -> CliResult<()> {
    let config = load_config(config_path)?;
    tracing::info!("Loading image: {}", image_path.display());
    let raster = load_image(image_path)?;
    tracing::info!("Image size: {}x{}", raster.width, raster.height);

    let estimate = estimate_angle_with(&raster, &config)?;
    if estimate.is_empty() {
        tracing::info!("No lines found in the skew window");
    }
    print_estimate(&estimate, json)
}

fn run_edges(
    image_path: &Path,
    out_path: &Path,
    config_path: Option<&Path>,
    low: Option<f64>,
    high: Option<f64>,
    connected: bool,
) -> CliResult<()> {
    let mut config = load_config(config_path)?.edges;
    if let Some(low) = low {
        config.thresholds.low = low;
    }
    if let Some(high) = high {
        config.thresholds.high = high;
    }
    if connected {
        config.hysteresis = HysteresisMode::Connected;
    }

    let raster = load_image(image_path)?;
    let edges = detect_edges_with(&raster, &config)?;
    tracing::info!("Detected {} edge pixels", edges.edge_count());

    edges.to_gray_image().save(out_path)?;
    tracing::info!("Edge map written to {}", out_path.display());
    Ok(())
}

fn run_render(
    image_path: &Path,
    out_path: &Path,
    config_path: Option<&Path>,
    max_lines: usize,
) -> CliResult<()> {
    let config = load_config(config_path)?;
    let raster = load_image(image_path)?;
    let options = RenderOptions {
        max_lines,
        ..RenderOptions::default()
    };

    let rendered = estimate_and_render(&raster, &config, &options)?;
    rendered.overlay.save(out_path)?;
    tracing::info!(
        "Drew {} lines, overlay written to {}",
        rendered.lines.len(),
        out_path.display()
    );
    print_estimate(&rendered.estimate, false)
}

fn run_evaluate(
    images_dir: &Path,
    labels_dir: &Path,
    config_path: Option<&Path>,
    report_path: Option<&Path>,
) -> CliResult<()> {
    let config = load_config(config_path)?;
    let evaluation = evaluate_dataset(images_dir, labels_dir, &config)?;

    let Some(metrics) = evaluation.metrics else {
        return Err(format!(
            "No images could be evaluated in {} ({} skipped)",
            images_dir.display(),
            evaluation.skipped
        )
        .into());
    };

    tracing::info!(
        evaluated = metrics.count,
        skipped = evaluation.skipped,
        "evaluation complete"
    );

    println!("Images: {}", metrics.count);
    println!("Skipped: {}", evaluation.skipped);
    println!("MAE: {:.4}", metrics.mae);
    println!("MSE: {:.4}", metrics.mse);
    println!("RMSE: {:.4}", metrics.rmse);
    println!("Max error: {:.4}", metrics.max_error);

    if let Some(report_path) = report_path {
        let json = serde_json::to_string_pretty(&evaluation)?;
        std::fs::write(report_path, json)?;
        tracing::info!("Report written to {}", report_path.display());
    }

    Ok(())
}
