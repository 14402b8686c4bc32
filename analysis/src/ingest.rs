pub mod record;

#[cfg(test)]
mod record_test;

use crate::collector::labels::FileLabels;
use record::MetricRecord;
use regex::CaptureMatches;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Neither engine marker found in report content")]
    NoEngineDetected,
    #[error("No report block matched the content")]
    NoMatchFound,
    #[error("Captured field '{0}' is not a number")]
    InvalidNumber(&'static str),
}

/// time series database engine a result file was produced against
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Engine {
    TimescaleDb,
    InfluxDb,
}

impl Engine {
    /// literal marker string as it appears in the report content
    pub fn marker(&self) -> &'static str {
        match self {
            Self::TimescaleDb => "TimescaleDB",
            Self::InfluxDb => "InfluxDB",
        }
    }

    /// sniff the engine from the report content
    /// the TimescaleDB marker takes precedence when both appear
    pub fn detect(content: &str) -> Option<Self> {
        if content.contains(Self::TimescaleDb.marker()) {
            Some(Self::TimescaleDb)
        } else if content.contains(Self::InfluxDb.marker()) {
            Some(Self::InfluxDb)
        } else {
            None
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// parse all report blocks out of one result file's content
///
/// The engine is sniffed from the content first, then every non-overlapping
/// match of the report block pattern yields one record, in order of
/// appearance. Parsing the same content twice yields the same sequence.
pub fn parse_report<'c>(
    content: &'c str,
    labels: &FileLabels,
) -> Result<Records<'c>, IngestError> {
    let engine = Engine::detect(content).ok_or(IngestError::NoEngineDetected)?;
    debug!("Using {engine} pattern");

    let pattern = record::block_pattern(engine);
    if !pattern.is_match(content) {
        return Err(IngestError::NoMatchFound);
    }

    Ok(Records {
        matches: pattern.captures_iter(content),
        engine,
        labels: labels.clone(),
    })
}

/// lazy sequence of records over the report blocks of one file
pub struct Records<'c> {
    matches: CaptureMatches<'static, 'c>,
    engine: Engine,
    labels: FileLabels,
}

impl Iterator for Records<'_> {
    type Item = MetricRecord;

    fn next(&mut self) -> Option<Self::Item> {
        for captures in self.matches.by_ref() {
            match MetricRecord::from_captures(&captures, self.engine, &self.labels) {
                Ok(record) => return Some(record),
                Err(e) => {
                    // a matched block with an unparsable number, skip it like
                    // any other unusable input
                    warn!("Skipping malformed report block: {e}");
                }
            }
        }

        None
    }
}
