use crate::ingest::{record::MetricRecord, Engine};
use std::collections::BTreeMap;

/// grouping key for single engine charts
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct GroupKey {
    pub database: String,
    pub query_type: String,
    pub engine: Engine,
}

/// grouping key for cross engine comparisons
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ComparisonKey {
    pub database: String,
    pub query_type: String,
}

/// accumulator for all records of one batch run
///
/// Groupings are rebuilt on demand from the flat record list. Within a
/// group records are ordered by ascending worker count, ties keep their
/// encounter order.
#[derive(Debug, Default)]
pub struct Aggregator {
    records: Vec<MetricRecord>,
}

impl Aggregator {
    pub fn insert(&mut self, record: MetricRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// records grouped per (database, query_type, engine), sorted by workers
    pub fn engine_groups(&self) -> BTreeMap<GroupKey, Vec<&MetricRecord>> {
        let mut groups: BTreeMap<GroupKey, Vec<&MetricRecord>> = BTreeMap::new();

        for record in &self.records {
            groups
                .entry(GroupKey {
                    database: record.database.clone(),
                    query_type: record.query_type.clone(),
                    engine: record.engine,
                })
                .or_default()
                .push(record);
        }

        for group in groups.values_mut() {
            // stable, preserves encounter order for equal worker counts
            group.sort_by_key(|record| record.workers);
        }

        groups
    }

    /// records grouped per (database, query_type) across engines, sorted by workers
    pub fn comparison_groups(&self) -> BTreeMap<ComparisonKey, Vec<&MetricRecord>> {
        let mut groups: BTreeMap<ComparisonKey, Vec<&MetricRecord>> = BTreeMap::new();

        for record in &self.records {
            groups
                .entry(ComparisonKey {
                    database: record.database.clone(),
                    query_type: record.query_type.clone(),
                })
                .or_default()
                .push(record);
        }

        for group in groups.values_mut() {
            group.sort_by_key(|record| record.workers);
        }

        groups
    }
}

impl Extend<MetricRecord> for Aggregator {
    fn extend<T: IntoIterator<Item = MetricRecord>>(&mut self, iter: T) {
        self.records.extend(iter);
    }
}
