mod aggregate;
mod collector;
mod config;
mod ingest;
mod report;

use aggregate::Aggregator;
use clap::{Parser, Subcommand};
use collector::{labels::FileLabels, Collector};
use config::{ConfigErrors, ReportConfig};
use report::{charts, compare, ReportError};
use std::{fs, path::PathBuf, process::exit};
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
enum AnalysisError {
    #[error("Failed to load config")]
    Config(#[from] ConfigErrors),
    #[error("Failed to produce report")]
    Report(#[from] ReportError),
    #[error("Failed to prepare output directory")]
    OutputDir(#[from] std::io::Error),
}

/// Parse TSBS benchmark result logs and render per-engine charts or a
/// TimescaleDB vs InfluxDB differential table.
#[derive(Parser, Debug)]
#[command(name = "tsbs-analysis", version, about)]
struct Cli {
    /// Config file path (YAML), built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Results directory (overrides config)
    #[arg(long)]
    results_dir: Option<PathBuf>,

    /// Output directory for charts and tables (overrides config)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render rate/latency-vs-workers charts per database, query type and engine
    Graphs,
    /// Pair TimescaleDB against InfluxDB results and write a differential CSV
    Compare,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(cli) {
        error!("{e}");
        exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AnalysisError> {
    let mut config = ReportConfig::load(cli.config.as_deref())?;

    if let Some(results_dir) = cli.results_dir {
        config.results_dir = results_dir;
    }
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = Some(output_dir);
    }

    config.preflight_checks()?;
    fs::create_dir_all(config.output_dir())?;

    match cli.command {
        Commands::Graphs => run_graphs(&config),
        Commands::Compare => run_compare(&config),
    }
}

/// parse every result file, aggregate and render both chart families
fn run_graphs(config: &ReportConfig) -> Result<(), AnalysisError> {
    info!("Starting to parse result files");

    let mut aggregator = Aggregator::default();

    for path in Collector::load(config)? {
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            warn!("Skipping result file with non UTF-8 name: {}", path.display());
            continue;
        };

        let labels = match FileLabels::infer(config, file_name) {
            Ok(labels) => labels,
            Err(e) => {
                warn!("Skipping {file_name}: {e}");
                continue;
            }
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read {}: {e}", path.display());
                continue;
            }
        };

        info!("Parsing file: {}", path.display());
        match ingest::parse_report(&content, &labels) {
            Ok(records) => aggregator.extend(records),
            Err(e) => warn!("Skipping {file_name}: {e}"),
        }
    }

    info!("Aggregated {} records", aggregator.len());

    charts::render_engine_graphs(&aggregator, config.output_dir())?;
    charts::render_comparison_graphs(&aggregator, config.output_dir())?;

    info!("Completed processing");

    Ok(())
}

/// pair results across engines and emit the differential table
fn run_compare(config: &ReportConfig) -> Result<(), AnalysisError> {
    let rows = compare::comparison_rows(config)?;

    if rows.is_empty() {
        warn!("No comparable result pairs found");
    }

    compare::log_summary(&rows);
    compare::write_table(&rows, &config.output_dir().join(compare::TABLE_FILE_NAME))?;

    Ok(())
}
