use std::path::PathBuf;

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use plotters::prelude::*;

use crate::constants::defaults;
use crate::data_mgmt::Table;
use crate::error::{Result, UplinkError};

const X_LABEL_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Clone, Debug)]
pub struct PlotOptions {
    pub output: PathBuf,
    pub size: (u32, u32),
}

impl Default for PlotOptions {
    fn default() -> Self {
        PlotOptions {
            output: PathBuf::from(defaults::PLOT_OUTPUT),
            size: defaults::PLOT_SIZE,
        }
    }
}

fn plot_err(e: impl std::fmt::Display) -> UplinkError {
    UplinkError::Plot(e.to_string())
}

/// Check the inputs and pick the y-axis label: the override, or the first table's unit.
fn resolve_y_label(series: &[(&str, &Table)], y_axis_label: Option<&str>) -> Result<String> {
    if series.is_empty() {
        return Err(UplinkError::EmptyTable("no series given".into()));
    }
    if let Some((label, _)) = series.iter().find(|(_, table)| table.is_empty()) {
        return Err(UplinkError::EmptyTable(label.to_string()));
    }
    match y_axis_label {
        Some(label) => Ok(label.to_string()),
        None => Ok(series[0].1.unit().unwrap_or_default().to_string()),
    }
}

type Bounds = (DateTime<Tz>, DateTime<Tz>, f64, f64);

fn bounds(series: &[(&str, &Table)]) -> Option<Bounds> {
    let mut rows = series.iter().flat_map(|(_, table)| table.rows());
    let first = rows.next()?;
    let init = (first.timestamp, first.timestamp, first.value, first.value);

    let (mut x_min, mut x_max, mut y_min, mut y_max) =
        rows.fold(init, |(x0, x1, y0, y1), r| {
            (
                x0.min(r.timestamp),
                x1.max(r.timestamp),
                y0.min(r.value),
                y1.max(r.value),
            )
        });

    // A single instant or a flat line still needs a non-empty range
    if x_min == x_max {
        x_min -= Duration::hours(1);
        x_max += Duration::hours(1);
    }
    let pad = if y_max > y_min { (y_max - y_min) * 0.05 } else { 1.0 };
    y_min -= pad;
    y_max += pad;

    Some((x_min, x_max, y_min, y_max))
}

/// Draw each table's values over time on one shared chart and write it to `options.output`.
///
/// Fails with [`UplinkError::EmptyTable`] before anything is drawn if there is no series
/// or any table has no rows.
pub fn render(
    series: &[(&str, &Table)],
    title: &str,
    y_axis_label: Option<&str>,
    options: &PlotOptions,
) -> Result<()> {
    let y_desc = resolve_y_label(series, y_axis_label)?;
    let (x_min, x_max, y_min, y_max) =
        bounds(series).ok_or_else(|| UplinkError::EmptyTable("no rows".into()))?;

    let root = SVGBackend::new(&options.output, options.size).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .y_desc(y_desc.as_str())
        .x_label_formatter(&|ts: &DateTime<Tz>| ts.format(X_LABEL_FORMAT).to_string())
        .draw()
        .map_err(plot_err)?;

    for (idx, (label, table)) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let mut points: Vec<(DateTime<Tz>, f64)> =
            table.rows().iter().map(|r| (r.timestamp, r.value)).collect();
        points.sort_by_key(|(ts, _)| *ts);

        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))
            .map_err(plot_err)?
            .label(*label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    log::info!("Wrote plot '{}' to {}", title, options.output.display());
    Ok(())
}
