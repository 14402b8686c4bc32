use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ConfigErrors {
    #[error("Failed to read config file")]
    UnreadableConfig(#[from] std::io::Error),
    #[error("Failed to parse config file")]
    InvalidConfig(#[from] serde_yaml::Error),
    #[error("Globs were invalid")]
    InvalidGlobs(#[from] globset::Error),
    #[error("Results directory not found: {0}")]
    ResultsDirNotFound(PathBuf),
}

#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields, default)]
pub struct ReportConfig {
    // directory holding the *.txt result files
    pub results_dir: PathBuf,

    // where charts and tables are written, falls back to results_dir
    pub output_dir: Option<PathBuf>,

    // database labels matched against filenames, longest match wins
    pub databases: Vec<String>,

    // query type labels matched against filenames, first match wins
    pub query_types: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("Results"),
            output_dir: None,
            databases: ["iot_data", "iot_data_medium", "iot_data_small"]
                .map(String::from)
                .to_vec(),
            query_types: [
                "last-loc",
                "long-driving-sessions",
                "avg-load",
                "daily-activity",
                "breakdown-frequency",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

impl ReportConfig {
    /// load a config file, falling back to the built-in defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigErrors> {
        match path {
            Some(path) => {
                info!("Loading config from {}", path.to_string_lossy());
                let content = fs::read_to_string(path)?;

                Ok(serde_yaml::from_str(&content)?)
            }
            None => {
                debug!("No config file given, using built-in defaults");

                Ok(Self::default())
            }
        }
    }

    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.results_dir)
    }

    pub fn preflight_checks(&self) -> Result<(), ConfigErrors> {
        if !self.results_dir.is_dir() {
            return Err(ConfigErrors::ResultsDirNotFound(self.results_dir.clone()));
        }

        Ok(())
    }
}
