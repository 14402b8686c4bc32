use crate::config::ReportConfig;
use itertools::Itertools;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum LabelError {
    #[error("No configured database label matches '{0}'")]
    UnknownDatabase(String),
    #[error("No configured query type label matches '{0}'")]
    UnknownQueryType(String),
}

/// labels inferred from a result file name, stamped onto every record of the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLabels {
    pub database: String,
    pub query_type: String,
}

impl FileLabels {
    pub fn infer(config: &ReportConfig, file_name: &str) -> Result<Self, LabelError> {
        Ok(Self {
            database: infer_database(&config.databases, file_name)
                .ok_or_else(|| LabelError::UnknownDatabase(file_name.to_owned()))?
                .to_owned(),
            query_type: infer_query_type(&config.query_types, file_name)
                .ok_or_else(|| LabelError::UnknownQueryType(file_name.to_owned()))?
                .to_owned(),
        })
    }
}

/// longest configured database label contained in the file name
///
/// the longest match wins so that e.g. `iot_data_medium` is not shadowed by
/// its prefix `iot_data`
pub fn infer_database<'a>(databases: &'a [String], file_name: &str) -> Option<&'a str> {
    databases
        .iter()
        .filter(|database| file_name.contains(database.as_str()))
        .max_by_key(|database| database.len())
        .map(String::as_str)
}

/// first configured query type label contained in the file name
///
/// query type labels are not prefixes of each other, so multiple matches mean
/// an unexpectedly named file; the collision is logged before the first match
/// in configuration order is taken
pub fn infer_query_type<'a>(query_types: &'a [String], file_name: &str) -> Option<&'a str> {
    let matches = query_types
        .iter()
        .filter(|query_type| file_name.contains(query_type.as_str()))
        .collect_vec();

    if matches.len() > 1 {
        warn!(
            "Multiple query type labels ({}) match '{file_name}', taking the first",
            matches.iter().join(", ")
        );
    }

    matches.first().map(|query_type| query_type.as_str())
}
