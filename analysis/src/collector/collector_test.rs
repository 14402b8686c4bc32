use super::Collector;
use crate::config::ReportConfig;
use itertools::Itertools;
use std::fs;

fn config_for(dir: &std::path::Path) -> ReportConfig {
    ReportConfig {
        results_dir: dir.to_path_buf(),
        ..ReportConfig::default()
    }
}

#[test]
fn collects_only_txt_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "x").unwrap();
    fs::write(dir.path().join("b.txt"), "x").unwrap();
    fs::write(dir.path().join("chart.png"), "x").unwrap();

    let collector = Collector::load(&config_for(dir.path())).unwrap();
    assert_eq!(collector.len(), 2);

    let names = collector
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .sorted()
        .collect_vec();

    assert_eq!(names, vec!["a.txt", "b.txt"]);
}

#[test]
fn ignores_nested_directories() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("top.txt"), "x").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("nested").join("deep.txt"), "x").unwrap();

    let collector = Collector::load(&config_for(dir.path())).unwrap();

    assert_eq!(collector.len(), 1);
}

#[test]
fn empty_directory_is_empty_collector() {
    let dir = tempfile::tempdir().unwrap();

    let collector = Collector::load(&config_for(dir.path())).unwrap();

    assert!(collector.is_empty());
}
