use super::{parse_report, Engine, IngestError};
use crate::collector::labels::FileLabels;

fn labels() -> FileLabels {
    FileLabels {
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
fn parses_all_fields_literally() {
    let content = report_block("TimescaleDB", "125.50", "7.89");
    let records: Vec<_> = parse_report(&content, &labels()).unwrap().collect();

    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.workers, 8);
    assert_eq!(record.num_queries, 1000);
    assert_eq!(record.overall_rate, 125.50);
    assert_eq!(record.min_time, 1.23);
    assert_eq!(record.median_time, 4.56);
    assert_eq!(record.mean_time, 7.89);
    assert_eq!(record.max_time, 10.11);
    assert_eq!(record.stddev_time, 2.50);
    assert_eq!(record.sum_time, 7.9);
    assert_eq!(record.query_count, 1000);
    assert_eq!(record.wall_clock_time, 8.123);
    assert_eq!(record.engine, Engine::TimescaleDb);
    assert_eq!(record.database, "iot_data");
    assert_eq!(record.query_type, "last-loc");
}

#[test]
fn influx_marker_selects_influx_pattern() {
    let content = report_block("InfluxDB", "98.10", "12.00");
    let records: Vec<_> = parse_report(&content, &labels()).unwrap().collect();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].engine, Engine::InfluxDb);
    assert_eq!(records[0].mean_time, 12.00);
}

#[test]
fn repeated_blocks_yield_records_in_order() {
    let content = format!(
        "{}\n{}",
        report_block("TimescaleDB", "125.50", "7.89"),
        report_block("TimescaleDB", "200.00", "3.21"),
    );
    let records: Vec<_> = parse_report(&content, &labels()).unwrap().collect();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].overall_rate, 125.50);
    assert_eq!(records[1].overall_rate, 200.00);
}

#[test]
fn reparsing_is_idempotent() {
    let content = format!(
        "{}\n{}",
        report_block("TimescaleDB", "125.50", "7.89"),
        report_block("TimescaleDB", "200.00", "3.21"),
    );

    let first: Vec<_> = parse_report(&content, &labels()).unwrap().collect();
    let second: Vec<_> = parse_report(&content, &labels()).unwrap().collect();

    assert_eq!(first, second);
}

#[test]
fn missing_engine_marker_is_detected() {
    let content = "Run complete after 10 queries with 1 workers\nsomething else\n";

    assert!(matches!(
        parse_report(content, &labels()),
        Err(IngestError::NoEngineDetected)
    ));
}

#[test]
fn marker_without_block_is_no_match() {
    let content = "TimescaleDB was mentioned here but no run summary follows\n";

    assert!(matches!(
        parse_report(content, &labels()),
        Err(IngestError::NoMatchFound)
    ));
}

#[test]
fn suspicious_timings_are_kept() {
    // mean above max, flagged but not rejected
    let content = report_block("TimescaleDB", "125.50", "99.99");
    let records: Vec<_> = parse_report(&content, &labels()).unwrap().collect();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].mean_time, 99.99);
}

#[test]
fn engine_detection_prefers_timescale_marker() {
    assert_eq!(
        Engine::detect("TimescaleDB and InfluxDB both mentioned"),
        Some(Engine::TimescaleDb)
    );
    assert_eq!(Engine::detect("only InfluxDB"), Some(Engine::InfluxDb));
    assert_eq!(Engine::detect("neither"), None);
}
