use super::compare::{
    comparison_rows, influx_partner, percentage_difference, ComparisonRow,
};
use crate::config::ReportConfig;
use crate::ingest::{record::MetricRecord, Engine};
use std::fs;

fn record(engine: Engine, mean_time: f64, overall_rate: f64) -> MetricRecord {
    MetricRecord {
        workers: 8,
        num_queries: 1000,
        overall_rate,
        min_time: 1.0,
        median_time: 2.0,
        mean_time,
        max_time: 20.0,
        stddev_time: 0.5,
        sum_time: 10.0,
        query_count: 1000,
        wall_clock_time: 10.0,
        engine,
        database: "iot_data".to_owned(),
        query_type: "last-loc".to_owned(),
    }
}

fn report_block(engine: &str, rate: &str, mean: &str) -> String {
    format!(
        "Run complete after 1000 queries with 8 workers (Overall query rate {rate} queries/sec):\n\
         {engine} last location per truck:\n\
         min:     1.23ms, med:     4.56ms, mean:     {mean}ms, max:    10.11ms, stddev:     2.50ms, sum:   7.9sec, count: 1000\n\
         all queries                             :\n\
         min:     1.23ms, med:     4.56ms, mean:     {mean}ms, max:    10.11ms, stddev:     2.50ms, sum:   7.9sec, count: 1000\n\
         wall clock time: 8.123000sec\n"
    )
}

#[test]
fn percentage_difference_against_baseline() {
    assert_eq!(percentage_difference(10.0, 12.0), Some(20.0));
    assert_eq!(percentage_difference(10.0, 8.0), Some(-20.0));
}

#[test]
fn zero_baseline_has_no_percentage() {
    assert_eq!(percentage_difference(0.0, 12.0), None);
}

#[test]
fn row_computes_deltas() {
    let timescale = record(Engine::TimescaleDb, 10.0, 100.0);
    let influx = record(Engine::InfluxDb, 12.0, 80.0);

    let row = ComparisonRow::new("test.txt".to_owned(), &timescale, &influx);

    assert_eq!(row.num_queries, 1000);
    assert_eq!(row.workers, 8);
    assert_eq!(row.mean_difference, 2.0);
    assert_eq!(row.mean_percentage, Some(20.0));
    assert_eq!(row.rate_difference, -20.0);
    assert_eq!(row.rate_percentage, Some(-20.0));
}

#[test]
fn partner_name_substitutes_engine() {
    assert_eq!(
        influx_partner("iot_data_medium_daily-activity_timescaledb.txt"),
        "iot_data_medium_daily-activity_influxdb.txt"
    );
    assert_eq!(
        influx_partner("iot_data_last-loc_timescale.txt"),
        "iot_data_last-loc_influxdb.txt"
    );
}

#[test]
fn pairs_files_across_engines() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("iot_data_last-loc_timescaledb.txt"),
        report_block("TimescaleDB", "100.00", "10.00"),
    )
    .unwrap();
    fs::write(
        dir.path().join("iot_data_last-loc_influxdb.txt"),
        report_block("InfluxDB", "80.00", "12.00"),
    )
    .unwrap();
    // a TimescaleDB result without an InfluxDB partner is excluded
    fs::write(
        dir.path().join("iot_data_avg-load_timescaledb.txt"),
        report_block("TimescaleDB", "50.00", "5.00"),
    )
    .unwrap();

    let config = ReportConfig {
        results_dir: dir.path().to_path_buf(),
        ..ReportConfig::default()
    };

    let rows = comparison_rows(&config).unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].test, "iot_data_last-loc_timescaledb.txt");
    assert_eq!(rows[0].timescale_mean, 10.00);
    assert_eq!(rows[0].influx_mean, 12.00);
    assert_eq!(rows[0].mean_difference, 2.00);
    assert_eq!(rows[0].mean_percentage, Some(20.0));
}
