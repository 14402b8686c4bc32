use super::ReportError;
use crate::{
    aggregate::Aggregator,
    ingest::{record::MetricRecord, Engine},
};
use itertools::Itertools;
use plotters::{coord::Shift, prelude::*};
use std::path::Path;
use tracing::info;

/// one plotted line over the records of a group, ordered by workers
struct Series {
    name: String,
    color: RGBColor,
    workers: Vec<i32>,
    rate: Vec<f64>,
    mean: Vec<f64>,
    max: Vec<f64>,
    median: Vec<f64>,
}

impl Series {
    fn from_records(name: String, color: RGBColor, records: &[&MetricRecord]) -> Self {
        Self {
            name,
            color,
            workers: records.iter().map(|r| r.workers as i32).collect(),
            rate: records.iter().map(|r| r.overall_rate).collect(),
            mean: records.iter().map(|r| r.mean_time).collect(),
            max: records.iter().map(|r| r.max_time).collect(),
            median: records.iter().map(|r| r.median_time).collect(),
        }
    }
}

fn engine_color(engine: Engine) -> RGBColor {
    match engine {
        Engine::TimescaleDb => BLUE,
        Engine::InfluxDb => RED,
    }
}

/// one 2x2 panel chart per (database, query type, engine) group
pub fn render_engine_graphs(aggregator: &Aggregator, output_dir: &Path) -> Result<(), ReportError> {
    info!("Generating individual graphs for each database engine");

    for (key, records) in aggregator.engine_groups() {
        let series = Series::from_records(
            key.engine.to_string(),
            engine_color(key.engine),
            &records,
        );
        let heading = format!("{} - {} - {}", key.database, key.query_type, key.engine);
        let path = output_dir.join(format!(
            "{}_{}_{}_graph.png",
            key.database, key.query_type, key.engine
        ));

        render_panels(&path, &heading, &[series])?;
        info!("Saved graph to {}", path.display());
    }

    Ok(())
}

/// one 2x2 panel chart per (database, query type), engines overlaid
pub fn render_comparison_graphs(
    aggregator: &Aggregator,
    output_dir: &Path,
) -> Result<(), ReportError> {
    info!("Generating comparison graphs between database engines");

    for (key, records) in aggregator.comparison_groups() {
        let series = [Engine::TimescaleDb, Engine::InfluxDb]
            .into_iter()
            .filter_map(|engine| {
                let engine_records = records
                    .iter()
                    .filter(|record| record.engine == engine)
                    .copied()
                    .collect_vec();

                (!engine_records.is_empty()).then(|| {
                    Series::from_records(
                        engine.to_string(),
                        engine_color(engine),
                        &engine_records,
                    )
                })
            })
            .collect_vec();

        let heading = format!("{} - {}", key.database, key.query_type);
        let path = output_dir.join(format!(
            "{}_{}_comparison_graph.png",
            key.database, key.query_type
        ));

        render_panels(&path, &heading, &series)?;
        info!("Saved comparison graph to {}", path.display());
    }

    Ok(())
}

/// rate, mean, max and median vs workers as four panels of one PNG
fn render_panels(path: &Path, heading: &str, series: &[Series]) -> Result<(), ReportError> {
    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let panels = root.split_evenly((2, 2));
    let metrics: [(&str, &str, fn(&Series) -> &[f64]); 4] = [
        (
            "Overall Query Rate",
            "Overall Query Rate (queries/sec)",
            |s| &s.rate,
        ),
        ("Mean Query Time", "Mean Query Time (ms)", |s| &s.mean),
        ("Max Query Time", "Max Query Time (ms)", |s| &s.max),
        ("Median Query Time", "Median Query Time (ms)", |s| &s.median),
    ];

    for (panel, (title, y_label, metric)) in panels.iter().zip(metrics) {
        draw_panel(
            panel,
            &format!("{heading} - {title} vs Workers"),
            y_label,
            series,
            metric,
        )?;
    }

    root.present().map_err(chart_error)?;

    Ok(())
}

fn draw_panel(
    area: &DrawingArea<BitMapBackend, Shift>,
    caption: &str,
    y_label: &str,
    series: &[Series],
    metric: fn(&Series) -> &[f64],
) -> Result<(), ReportError> {
    let x_min = series
        .iter()
        .flat_map(|s| s.workers.iter())
        .min()
        .copied()
        .unwrap_or(0);
    let x_max = series
        .iter()
        .flat_map(|s| s.workers.iter())
        .max()
        .copied()
        .unwrap_or(0)
        // keep the x range non-empty for single-measurement groups
        .max(x_min + 1);
    let y_max = series
        .iter()
        .flat_map(|s| metric(s).iter())
        .copied()
        .fold(0.0_f64, f64::max)
        * 1.15;
    let y_max = if y_max > 0.0 { y_max } else { 1.0 };

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .caption(caption, ("sans-serif", 15))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .x_desc("Number of Workers")
        .y_desc(y_label)
        .draw()
        .map_err(chart_error)?;

    for s in series {
        let points = s
            .workers
            .iter()
            .copied()
            .zip(metric(s).iter().copied())
            .collect_vec();
        let color = s.color;

        chart
            .draw_series(LineSeries::new(points.clone(), &color))
            .map_err(chart_error)?
            .label(s.name.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        chart
            .draw_series(
                points
                    .iter()
                    .map(|point| Circle::new(*point, 3, color.filled())),
            )
            .map_err(chart_error)?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(chart_error)?;

    Ok(())
}

fn chart_error<E: std::fmt::Display>(error: E) -> ReportError {
    ReportError::Chart(error.to_string())
}
