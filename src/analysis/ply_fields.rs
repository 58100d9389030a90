//! Per-named-field figures: scatter over ply index with mean and deviation
//!
//! One figure per named field (the ply-index field itself is skipped):
//! every (ply index, value) pair across all games as a translucent scatter,
//! the per-ply mean as a connected line, and a one-sigma band around it.
//! Compact mode clips the value axis to mean + 3 sigma so a handful of
//! outliers cannot flatten the rest of the figure.

use crate::common::data_structures::CellValue;
use crate::common::plots::{figure_path, pad_span, prepare_drawing_area, PlotError};
use crate::common::stats::{mean, min_max, std_dev};
use crate::common::{DecodedLogs, PlyRecord};
use plotters::prelude::*;
use std::path::{Path, PathBuf};

type Result<T> = core::result::Result<T, PlotError>;

/// Renders one figure per named field except the ply index
///
/// Returns the written figure paths in schema order.
pub fn generate_ply_field_plots(
    decoded: &DecodedLogs,
    schema: &[String],
    max_game_length: usize,
    output_dir: &Path,
    compact: bool,
) -> Result<Vec<PathBuf>> {
    let buckets = bucket_by_ply(&decoded.ply_records, max_game_length);

    let mut written = Vec::new();
    for (field_index, field_name) in schema.iter().enumerate() {
        if field_index == 0 {
            // The ply index plotted against itself says nothing.
            continue;
        }
        let path = render_field(
            decoded,
            &buckets,
            field_index,
            field_name,
            max_game_length,
            output_dir,
            compact,
        )?;
        written.push(path);
    }
    Ok(written)
}

/// Groups records by their 1-based ply index
///
/// `buckets[p]` holds the records whose first named field equals p+1.
/// Records with a missing or out-of-range ply index land nowhere; they
/// still appear in the scatter but cannot contribute to a per-ply mean.
fn bucket_by_ply(records: &[PlyRecord], max_game_length: usize) -> Vec<Vec<&PlyRecord>> {
    let mut buckets: Vec<Vec<&PlyRecord>> = vec![Vec::new(); max_game_length];
    for record in records {
        if let Some(ply) = record.ply_index() {
            if ply >= 1 && ply <= max_game_length {
                buckets[ply - 1].push(record);
            }
        }
    }
    buckets
}

fn field_column<'a>(bucket: &'a [&PlyRecord], field_index: usize) -> Vec<CellValue> {
    bucket
        .iter()
        .map(|record| record.values[field_index])
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn render_field(
    decoded: &DecodedLogs,
    buckets: &[Vec<&PlyRecord>],
    field_index: usize,
    field_name: &str,
    max_game_length: usize,
    output_dir: &Path,
    compact: bool,
) -> Result<PathBuf> {
    let all_values: Vec<CellValue> = decoded
        .ply_records
        .iter()
        .map(|record| record.values[field_index])
        .collect();
    let (data_lo, data_hi) = min_max(&all_values).ok_or_else(|| {
        PlotError::InvalidData(format!("Field '{}' has no numeric values", field_name))
    })?;

    // Per-ply mean and sigma; plies where every value is missing are skipped.
    let mut mean_points: Vec<(f64, f64)> = Vec::new();
    let mut band_upper: Vec<(f64, f64)> = Vec::new();
    let mut band_lower: Vec<(f64, f64)> = Vec::new();
    for (bucket_index, bucket) in buckets.iter().enumerate() {
        let column = field_column(bucket, field_index);
        if let (Some(m), Some(s)) = (mean(&column), std_dev(&column)) {
            let x = (bucket_index + 1) as f64;
            mean_points.push((x, m));
            band_upper.push((x, m + s));
            band_lower.push((x, m - s));
        }
    }

    let mut y_lo = data_lo.min(
        band_lower
            .iter()
            .map(|&(_, y)| y)
            .fold(f64::INFINITY, f64::min),
    );
    let mut y_hi = data_hi;
    if compact {
        // Outlier suppression: clip to three sigma above the overall mean.
        if let (Some(m), Some(s)) = (mean(&all_values), std_dev(&all_values)) {
            y_hi = y_hi.min(m + 3.0 * s);
        }
    }
    if !y_lo.is_finite() {
        y_lo = data_lo;
    }
    let (y_lo, y_hi) = pad_span(y_lo, y_hi);

    let output_path = figure_path(output_dir, field_name);
    let backend_path = output_path.clone();
    let drawing_area = prepare_drawing_area(&backend_path)?;

    let mut chart = ChartBuilder::on(&drawing_area)
        .caption(field_name, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(0.0..(max_game_length + 1) as f64, y_lo..y_hi)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc("Ply")
        .y_desc(field_name)
        .label_style(("sans-serif", 25))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    // Scatter of every (ply, value) pair across all games.
    chart
        .draw_series(decoded.ply_records.iter().filter_map(|record| {
            let ply = record.ply_index()? as f64;
            let value = record.values[field_index].as_f64()?;
            Some(Circle::new((ply, value), 3, RED.mix(0.2).filled()))
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    // One-sigma band around the per-ply mean.
    if band_upper.len() > 1 {
        let band: Vec<(f64, f64)> = band_upper
            .iter()
            .copied()
            .chain(band_lower.iter().rev().copied())
            .collect();
        chart
            .draw_series([Polygon::new(band, BLUE.mix(0.15).filled())])
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    chart
        .draw_series(LineSeries::new(mean_points, BLUE.stroke_width(2)))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    drawing_area
        .present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(output_path)
}
