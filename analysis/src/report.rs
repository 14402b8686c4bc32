pub mod charts;
pub mod compare;

#[cfg(test)]
mod compare_test;

use crate::config::ConfigErrors;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to collect result files")]
    Collect(#[from] ConfigErrors),
    #[error("Failed to render chart: {0}")]
    Chart(String),
    #[error("Failed to write comparison table")]
    Table(#[from] csv::Error),
    #[error("I/O error while reporting")]
    Io(#[from] std::io::Error),
}
