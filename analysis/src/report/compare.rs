use super::ReportError;
use crate::{
    collector::{labels::FileLabels, Collector},
    config::ReportConfig,
    ingest::{self, record::MetricRecord},
};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

pub const TABLE_FILE_NAME: &str = "comparison_results.csv";

pub const CSV_COLUMNS: [&str; 11] = [
    "Test",
    "Num Queries",
    "Workers",
    "TimescaleDB Mean Time (ms)",
    "InfluxDB Mean Time (ms)",
    "Difference (ms)",
    "Percentage Difference (%)",
    "TimescaleDB Overall Rate (qps)",
    "InfluxDB Overall Rate (qps)",
    "Rate Difference (qps)",
    "Rate Percentage Difference (%)",
];

/// one paired TimescaleDB/InfluxDB measurement with computed deltas
///
/// Percentage fields are `None` when the TimescaleDB baseline is zero, the
/// absolute differences are still carried.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub test: String,
    pub num_queries: u64,
    pub workers: u32,
    pub timescale_mean: f64,
    pub influx_mean: f64,
    pub mean_difference: f64,
    pub mean_percentage: Option<f64>,
    pub timescale_rate: f64,
    pub influx_rate: f64,
    pub rate_difference: f64,
    pub rate_percentage: Option<f64>,
}

impl ComparisonRow {
    pub fn new(test: String, timescale: &MetricRecord, influx: &MetricRecord) -> Self {
        Self {
            test,
            num_queries: timescale.num_queries,
            workers: timescale.workers,
            timescale_mean: timescale.mean_time,
            influx_mean: influx.mean_time,
            mean_difference: influx.mean_time - timescale.mean_time,
            mean_percentage: percentage_difference(timescale.mean_time, influx.mean_time),
            timescale_rate: timescale.overall_rate,
            influx_rate: influx.overall_rate,
            rate_difference: influx.overall_rate - timescale.overall_rate,
            rate_percentage: percentage_difference(timescale.overall_rate, influx.overall_rate),
        }
    }
}

/// percentage difference against a baseline, undefined for a zero baseline
pub fn percentage_difference(baseline: f64, other: f64) -> Option<f64> {
    if baseline == 0.0 {
        None
    } else {
        Some((other - baseline) / baseline * 100.0)
    }
}

/// expected InfluxDB partner file name for a TimescaleDB result file
pub fn influx_partner(file_name: &str) -> String {
    file_name
        .replace("timescaledb", "influxdb")
        .replace("timescale", "influxdb")
}

/// pair up result files across engines and compute one row per pair
///
/// Pairing is by file name: every TimescaleDB file is matched against the
/// InfluxDB file its name maps to. Unmatched or unparsable files are
/// reported and excluded, never fatal to the batch.
pub fn comparison_rows(config: &ReportConfig) -> Result<Vec<ComparisonRow>, ReportError> {
    let mut timescale_files: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut influx_files: BTreeMap<String, PathBuf> = BTreeMap::new();

    for path in Collector::load(config)? {
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        let lowered = file_name.to_lowercase();

        if lowered.contains("timescaledb") || lowered.contains("timescale") {
            timescale_files.insert(file_name.to_owned(), path);
        } else if lowered.contains("influxdb") {
            influx_files.insert(file_name.to_owned(), path);
        } else {
            warn!("No engine recognized in file name '{file_name}', skipping");
        }
    }

    let mut rows = Vec::new();

    for (file_name, path) in &timescale_files {
        let partner = influx_partner(file_name);

        let Some(influx_path) = influx_files.get(&partner) else {
            warn!("Corresponding InfluxDB file not found for {file_name}");
            continue;
        };

        let (Some(timescale), Some(influx)) =
            (first_record(config, path), first_record(config, influx_path))
        else {
            continue;
        };

        rows.push(ComparisonRow::new(file_name.clone(), &timescale, &influx));
    }

    Ok(rows)
}

/// first report block of a result file, as used for the differential table
fn first_record(config: &ReportConfig, path: &Path) -> Option<MetricRecord> {
    let file_name = path.file_name()?.to_str()?;

    let labels = match FileLabels::infer(config, file_name) {
        Ok(labels) => labels,
        Err(e) => {
            warn!("Skipping {file_name}: {e}");
            return None;
        }
    };

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read {}: {e}", path.display());
            return None;
        }
    };

    match ingest::parse_report(&content, &labels) {
        Ok(mut records) => records.next(),
        Err(e) => {
            warn!("Failed to parse file {}: {e}", path.display());
            None
        }
    }
}

pub fn write_table(rows: &[ComparisonRow], path: &Path) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(CSV_COLUMNS)?;
    for row in rows {
        writer.write_record([
            row.test.clone(),
            row.num_queries.to_string(),
            row.workers.to_string(),
            row.timescale_mean.to_string(),
            row.influx_mean.to_string(),
            row.mean_difference.to_string(),
            optional(row.mean_percentage),
            row.timescale_rate.to_string(),
            row.influx_rate.to_string(),
            row.rate_difference.to_string(),
            optional(row.rate_percentage),
        ])?;
    }
    writer.flush()?;

    info!("Comparison results written to {}", path.display());

    Ok(())
}

fn optional(value: Option<f64>) -> String {
    value.map(|value| value.to_string()).unwrap_or_default()
}

pub fn log_summary(rows: &[ComparisonRow]) {
    info!("Comparison Results:");

    for row in rows {
        info!("Test: {}", row.test);
        info!("  TimescaleDB Mean Time: {} ms", row.timescale_mean);
        info!("  InfluxDB Mean Time: {} ms", row.influx_mean);
        info!("  Difference: {:.2} ms", row.mean_difference);
        match row.mean_percentage {
            Some(percentage) => info!("  Percentage Difference: {percentage:.2}%"),
            None => warn!("  Percentage Difference undefined, TimescaleDB mean time is zero"),
        }
        info!("  TimescaleDB Overall Rate: {} qps", row.timescale_rate);
        info!("  InfluxDB Overall Rate: {} qps", row.influx_rate);
        info!("  Rate Difference: {:.2} qps", row.rate_difference);
        match row.rate_percentage {
            Some(percentage) => info!("  Rate Percentage Difference: {percentage:.2}%"),
            None => warn!("  Rate Percentage Difference undefined, TimescaleDB rate is zero"),
        }
    }
}
