//! CLI entry point for the San Diego homelessness data tool.
//!
//! `download` writes the sample shelter, point-in-time count and eviction
//! datasets with their metadata; `analyze` loads them back, computes the
//! capacity, geographic, eviction and nearest-shelter summaries, and writes
//! a report.

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use sd_homeless_data::{
    analysis::AnalysisReport,
    geo::DistanceUnit,
    loader::{self, Datasets},
    models::Dataset,
    output::{create_directories, write_dataset, write_json, write_text},
    report, sample,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "sd_homeless_data", version)]
#[command(
    about = "Download and analyze San Diego homelessness and eviction data",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the sample datasets, metadata and a download summary
    Download {
        /// Which dataset to download
        #[arg(long, value_enum, default_value_t = DatasetArg::All)]
        dataset: DatasetArg,

        /// Root data directory (defaults to $SD_DATA_DIR or "data")
        #[arg(short = 'd', long)]
        data_dir: Option<PathBuf>,
    },
    /// Analyze the downloaded datasets and export a summary report
    Analyze {
        /// Root data directory (defaults to $SD_DATA_DIR or "data")
        #[arg(short = 'd', long)]
        data_dir: Option<PathBuf>,

        /// Unit for shelter distances
        #[arg(short, long, value_enum, default_value_t = UnitArg::Mi)]
        units: UnitArg,

        /// Report format
        #[arg(short, long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,

        /// Report file (defaults to <data_dir>/analysis_summary.txt or .json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DatasetArg {
    Shelters,
    Pit,
    Evictions,
    All,
}

impl DatasetArg {
    fn datasets(self) -> Vec<Dataset> {
        match self {
            DatasetArg::Shelters => vec![Dataset::Shelters],
            DatasetArg::Pit => vec![Dataset::Pit],
            DatasetArg::Evictions => vec![Dataset::Evictions],
            DatasetArg::All => Dataset::ALL.to_vec(),
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum UnitArg {
    Km,
    Mi,
}

impl From<UnitArg> for DistanceUnit {
    fn from(u: UnitArg) -> Self {
        match u {
            UnitArg::Km => DistanceUnit::Kilometers,
            UnitArg::Mi => DistanceUnit::Miles,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/sd_homeless_data.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("sd_homeless_data.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Download { dataset, data_dir } => {
            download(&resolve_data_dir(data_dir), &dataset.datasets())?;
        }
        Commands::Analyze {
            data_dir,
            units,
            format,
            output,
        } => {
            analyze(&resolve_data_dir(data_dir), units.into(), format, output)?;
        }
    }

    Ok(())
}

fn resolve_data_dir(arg: Option<PathBuf>) -> PathBuf {
    arg.or_else(|| std::env::var_os("SD_DATA_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("data"))
}

/// Writes the selected sample datasets, the metadata file, and a download
/// summary once all three datasets are on disk.
#[tracing::instrument(skip(datasets), fields(data_dir = %data_dir.display()))]
fn download(data_dir: &Path, datasets: &[Dataset]) -> Result<()> {
    create_directories(data_dir)?;

    for dataset in datasets {
        write_dataset(data_dir, *dataset)?;
    }

    let metadata_path = data_dir.join("metadata").join("data_sources.json");
    write_json(&metadata_path, &sample::metadata(Local::now()))?;
    info!(path = %metadata_path.display(), "Metadata saved");

    match loader::load_all(data_dir) {
        Ok(data) => {
            let summary = report::download_summary(&data, data_dir, Local::now());
            println!("{summary}");
            write_text(&data_dir.join("DOWNLOAD_SUMMARY.txt"), &summary)?;
        }
        Err(e) => warn!(error = %format!("{e:#}"), "Skipping download summary"),
    }

    info!("Data download complete");
    Ok(())
}

/// Loads all datasets, prints the report, and writes the export summary.
#[tracing::instrument(skip(output), fields(data_dir = %data_dir.display(), ?unit, ?format))]
fn analyze(
    data_dir: &Path,
    unit: DistanceUnit,
    format: FormatArg,
    output: Option<PathBuf>,
) -> Result<()> {
    let data: Datasets = loader::load_all(data_dir).map_err(|e| {
        e.context("data files missing or invalid; run the download command first")
    })?;

    let analysis = AnalysisReport::build(&data, unit);
    debug!(
        regions = analysis.nearest_shelters.len(),
        "Analysis report built"
    );

    match format {
        FormatArg::Text => {
            println!("{}", report::render(&analysis));
            let path = output.unwrap_or_else(|| data_dir.join("analysis_summary.txt"));
            write_text(&path, &report::export_summary(&analysis))?;
            info!(path = %path.display(), "Summary report saved");
        }
        FormatArg::Json => {
            println!("{}", report::render_json(&analysis)?);
            let path = output.unwrap_or_else(|| data_dir.join("analysis_summary.json"));
            write_json(&path, &analysis)?;
            info!(path = %path.display(), "Summary report saved");
        }
    }

    info!("Analysis complete");
    Ok(())
}
