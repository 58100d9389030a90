//! Per-iteration figures for the unnamed (iteration-level) fields
//!
//! Two figure families come out of the iteration tables:
//! - `per-iteration.png`: every unnamed field scattered at x = iteration
//!   index, one connected mean line per field, palette keyed by field index.
//! - One histogram figure per unnamed field: overlaid per-iteration
//!   histograms over 100 bins spanning the field's global min/max, each
//!   with a vertical mean marker.

use crate::common::data_structures::{CellValue, IterationBlock};
use crate::common::plots::{
    figure_path, pad_span, palette_color, prepare_drawing_area, PlotError,
};
use crate::common::stats::{histogram, mean, min_max};
use crate::common::DecodedLogs;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

type Result<T> = core::result::Result<T, PlotError>;

/// Number of histogram bins per unnamed field
const ITERATION_HIST_BINS: usize = 100;

/// One unnamed-field column of one iteration table
fn table_column(table: &[IterationBlock], field_index: usize) -> Vec<CellValue> {
    table.iter().map(|block| block[field_index]).collect()
}

/// Global numeric bounds of one unnamed field across all iteration indices
fn field_bounds(tables: &[Vec<IterationBlock>], field_index: usize) -> Option<(f64, f64)> {
    let mut bounds: Option<(f64, f64)> = None;
    for table in tables {
        if let Some((lo, hi)) = min_max(&table_column(table, field_index)) {
            bounds = Some(match bounds {
                None => (lo, hi),
                Some((b_lo, b_hi)) => (b_lo.min(lo), b_hi.max(hi)),
            });
        }
    }
    bounds
}

/// Renders `per-iteration.png`: all unnamed fields against iteration index
pub fn generate_iteration_scatter(
    decoded: &DecodedLogs,
    unnamed_fields: &[String],
    output_dir: &Path,
) -> Result<PathBuf> {
    let tables = &decoded.iteration_tables;
    if tables.is_empty() {
        return Err(PlotError::InvalidData(
            "No iteration blocks to plot".to_string(),
        ));
    }
    // Fail before any drawing if the palette cannot cover the fields.
    palette_color(0, unnamed_fields.len())?;

    let mut y_bounds: Option<(f64, f64)> = None;
    for field_index in 0..unnamed_fields.len() {
        if let Some((lo, hi)) = field_bounds(tables, field_index) {
            y_bounds = Some(match y_bounds {
                None => (lo, hi),
                Some((b_lo, b_hi)) => (b_lo.min(lo), b_hi.max(hi)),
            });
        }
    }
    let (y_lo, y_hi) = y_bounds.ok_or_else(|| {
        PlotError::InvalidData("No numeric iteration values to plot".to_string())
    })?;
    let (y_lo, y_hi) = pad_span(y_lo, y_hi);

    let output_path = output_dir.join("per-iteration.png");
    let backend_path = output_path.clone();
    let drawing_area = prepare_drawing_area(&backend_path)?;

    let mut chart = ChartBuilder::on(&drawing_area)
        .caption("Per-iteration fields", ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(-1.0..tables.len() as f64, y_lo..y_hi)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc("Iteration")
        .y_desc("Value")
        .label_style(("sans-serif", 25))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    for (field_index, field_name) in unnamed_fields.iter().enumerate() {
        let color = palette_color(field_index, unnamed_fields.len())?;

        chart
            .draw_series(tables.iter().enumerate().flat_map(|(iteration, table)| {
                table_column(table, field_index)
                    .into_iter()
                    .filter_map(|cell| cell.as_f64())
                    .map(move |value| {
                        Circle::new((iteration as f64, value), 3, color.mix(0.2).filled())
                    })
                    .collect::<Vec<_>>()
            }))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;

        let mean_points: Vec<(f64, f64)> = tables
            .iter()
            .enumerate()
            .filter_map(|(iteration, table)| {
                mean(&table_column(table, field_index)).map(|m| (iteration as f64, m))
            })
            .collect();
        chart
            .draw_series(LineSeries::new(mean_points, color.stroke_width(2)))
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label(field_name.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    drawing_area
        .present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(output_path)
}

/// Renders one histogram figure per unnamed field
///
/// Each figure overlays one translucent histogram per iteration index, all
/// over the same 100 bins spanning the field's global min/max, with one
/// vertical mean marker per iteration. Returns the written paths in field
/// order.
pub fn generate_iteration_field_plots(
    decoded: &DecodedLogs,
    unnamed_fields: &[String],
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let tables = &decoded.iteration_tables;
    if tables.is_empty() {
        return Err(PlotError::InvalidData(
            "No iteration blocks to plot".to_string(),
        ));
    }

    let mut written = Vec::new();
    for (field_index, field_name) in unnamed_fields.iter().enumerate() {
        let path = render_field_histogram(tables, field_index, field_name, output_dir)?;
        written.push(path);
    }
    Ok(written)
}

fn render_field_histogram(
    tables: &[Vec<IterationBlock>],
    field_index: usize,
    field_name: &str,
    output_dir: &Path,
) -> Result<PathBuf> {
    let (lo, hi) = field_bounds(tables, field_index).ok_or_else(|| {
        PlotError::InvalidData(format!("Field '{}' has no numeric values", field_name))
    })?;
    let (lo, hi) = pad_span(lo, hi);

    let per_iteration: Vec<(Vec<usize>, Option<f64>)> = tables
        .iter()
        .map(|table| {
            let column = table_column(table, field_index);
            (
                histogram(&column, ITERATION_HIST_BINS, lo, hi),
                mean(&column),
            )
        })
        .collect();
    let y_max = per_iteration
        .iter()
        .flat_map(|(counts, _)| counts.iter().copied())
        .max()
        .unwrap_or(0) as f64
        * 1.05
        + 1.0;

    let output_path = figure_path(output_dir, field_name);
    let backend_path = output_path.clone();
    let drawing_area = prepare_drawing_area(&backend_path)?;

    let mut chart = ChartBuilder::on(&drawing_area)
        .caption(field_name, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(lo..hi, 0.0..y_max)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(field_name)
        .y_desc("Blocks")
        .label_style(("sans-serif", 25))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let bin_width = (hi - lo) / ITERATION_HIST_BINS as f64;
    for (iteration, (counts, iteration_mean)) in per_iteration.iter().enumerate() {
        let color = Palette99::pick(iteration).to_rgba();

        chart
            .draw_series(counts.iter().enumerate().filter_map(|(bin, &count)| {
                if count == 0 {
                    return None;
                }
                let x0 = lo + bin as f64 * bin_width;
                let x1 = x0 + bin_width;
                Some(Rectangle::new(
                    [(x0, 0.0), (x1, count as f64)],
                    color.mix(0.4).filled(),
                ))
            }))
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label(format!("Iteration {}", iteration))
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.mix(0.4).filled())
            });

        if let Some(m) = iteration_mean {
            chart
                .draw_series(LineSeries::new(
                    [(*m, 0.0), (*m, y_max)],
                    color.stroke_width(2),
                ))
                .map_err(|e| PlotError::Drawing(e.to_string()))?;
        }
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    drawing_area
        .present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(output_path)
}
