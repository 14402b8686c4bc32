pub mod labels;

use crate::config::{ConfigErrors, ReportConfig};
use globset::GlobBuilder;
use ignore::WalkBuilder;
use itertools::Itertools;
use std::path::PathBuf;
use tracing::{debug, warn};

#[cfg(test)]
mod collector_test;

/// Collector over all result files below the configured results directory
///
/// Only plain `*.txt` files are yielded, anything else in the directory
/// (charts, tables from earlier runs) is ignored.
#[derive(Debug)]
pub struct Collector {
    paths: Vec<PathBuf>,
}

impl Collector {
    pub fn load(config: &ReportConfig) -> Result<Self, ConfigErrors> {
        let glob = GlobBuilder::new("*.txt")
            .literal_separator(true)
            .build()?
            .compile_matcher();

        debug!("Filtering with glob: {glob:?}");

        let paths = WalkBuilder::new(&config.results_dir)
            .standard_filters(false)
            .max_depth(Some(1))
            .build()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Failed to walk results directory: {e}");
                    None
                }
            })
            .map(ignore::DirEntry::into_path)
            .filter(|path| path.is_file())
            .filter(|path| {
                path.file_name()
                    .map(|name| glob.is_match(name))
                    .unwrap_or(false)
            })
            .collect_vec();

        Ok(Self { paths })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl Iterator for Collector {
    type Item = PathBuf;

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.paths.len(), Some(self.paths.len()))
    }

    /// return the next result file from the initial directory scan
    fn next(&mut self) -> Option<Self::Item> {
        self.paths.pop()
    }
}
