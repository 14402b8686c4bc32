use super::{Engine, IngestError};
use crate::collector::labels::FileLabels;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::warn;

/// one parsed benchmark run, immutable once built
///
/// Numeric fields carry the literal values from the report text, no unit
/// conversion happens beyond string to number parsing. Timings are in
/// milliseconds except `sum_time` and `wall_clock_time` which the report
/// states in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub workers: u32,
    pub num_queries: u64,
    pub overall_rate: f64,
    pub min_time: f64,
    pub median_time: f64,
    pub mean_time: f64,
    pub max_time: f64,
    pub stddev_time: f64,
    pub sum_time: f64,
    pub query_count: u64,
    pub wall_clock_time: f64,
    pub engine: Engine,
    pub database: String,
    pub query_type: String,
}

/// compiled report block pattern for one engine
///
/// The block is, in order: the run summary line, the engine specific
/// per-query-type timing line, the aggregate "all queries" timing line and
/// the wall clock line. The aggregate timings are matched to anchor the
/// block but not carried on the record.
pub fn block_pattern(engine: Engine) -> &'static Regex {
    static TIMESCALE: Lazy<Regex> = Lazy::new(|| compile(Engine::TimescaleDb));
    static INFLUX: Lazy<Regex> = Lazy::new(|| compile(Engine::InfluxDb));

    match engine {
        Engine::TimescaleDb => &TIMESCALE,
        Engine::InfluxDb => &INFLUX,
    }
}

fn compile(engine: Engine) -> Regex {
    let timings = r"min:\s*(?P<{p}min_time>[\d.]+)ms, med:\s*(?P<{p}med_time>[\d.]+)ms, mean:\s*(?P<{p}mean_time>[\d.]+)ms, max:\s*(?P<{p}max_time>[\d.]+)ms, stddev:\s*(?P<{p}stddev_time>[\d.]+)ms, sum:\s*(?P<{p}sum_time>[\d.]+)sec, count:\s*(?P<{p}query_count>\d+)";

    let pattern = format!(
        concat!(
            r"Run complete after (?P<num_queries>\d+) queries with (?P<workers>\d+) workers ",
            r"\(Overall query rate (?P<overall_rate>[\d.]+) queries/sec\):*\n",
            "{marker}.*:\n",
            "{timings}\n",
            r"all queries\s*:\n",
            "{all_timings}\n",
            r"wall clock time: (?P<wall_clock_time>[\d.]+)sec",
        ),
        marker = engine.marker(),
        timings = timings.replace("{p}", ""),
        all_timings = timings.replace("{p}", "all_"),
    );

    // the pattern is a compile time constant apart from the marker literal
    Regex::new(&pattern).expect("report block pattern must compile")
}

impl MetricRecord {
    pub fn from_captures(
        captures: &Captures,
        engine: Engine,
        labels: &FileLabels,
    ) -> Result<Self, IngestError> {
        let record = Self {
            workers: int(captures, "workers")? as u32,
            num_queries: int(captures, "num_queries")?,
            overall_rate: float(captures, "overall_rate")?,
            min_time: float(captures, "min_time")?,
            median_time: float(captures, "med_time")?,
            mean_time: float(captures, "mean_time")?,
            max_time: float(captures, "max_time")?,
            stddev_time: float(captures, "stddev_time")?,
            sum_time: float(captures, "sum_time")?,
            query_count: int(captures, "query_count")?,
            wall_clock_time: float(captures, "wall_clock_time")?,
            engine,
            database: labels.database.clone(),
            query_type: labels.query_type.clone(),
        };

        if record.mean_time < record.min_time || record.mean_time > record.max_time {
            // expected of well-formed reports but not enforced, flag and keep
            warn!(
                "Suspicious timings: mean {}ms outside [{}ms, {}ms]",
                record.mean_time, record.min_time, record.max_time
            );
        }

        Ok(record)
    }
}

fn float(captures: &Captures, name: &'static str) -> Result<f64, IngestError> {
    captures[name]
        .parse()
        .map_err(|_| IngestError::InvalidNumber(name))
}

fn int(captures: &Captures, name: &'static str) -> Result<u64, IngestError> {
    captures[name]
        .parse()
        .map_err(|_| IngestError::InvalidNumber(name))
}
