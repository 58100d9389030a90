//! Game-length distribution figure

use crate::common::data_structures::CellValue;
use crate::common::plots::{figure_path, pad_span, prepare_drawing_area, PlotError};
use crate::common::stats::{histogram, mean, min_max};
use plotters::prelude::*;
use std::path::{Path, PathBuf};

type Result<T> = core::result::Result<T, PlotError>;

/// Number of histogram bins for game lengths
const GAME_LENGTH_BINS: usize = 10;

/// Renders `game_lengths.png`: a 10-bin histogram of per-file game lengths
/// with a vertical line at the mean
pub fn generate_game_length_plot(game_lengths: &[usize], output_dir: &Path) -> Result<PathBuf> {
    if game_lengths.is_empty() {
        return Err(PlotError::InvalidData(
            "Game lengths cannot be empty".to_string(),
        ));
    }

    let values: Vec<CellValue> = game_lengths
        .iter()
        .map(|&length| CellValue::Numeric(length as f64))
        .collect();
    // Non-empty numeric input, so min/max and mean always exist here.
    let (lo, hi) = min_max(&values).unwrap_or((0.0, 0.0));
    let (lo, hi) = pad_span(lo, hi);
    let counts = histogram(&values, GAME_LENGTH_BINS, lo, hi);
    let mean_length = mean(&values).unwrap_or(0.0);
    let y_max = counts.iter().copied().max().unwrap_or(0) as f64 * 1.05 + 1.0;

    let output_path = figure_path(output_dir, "game lengths");
    let backend_path = output_path.clone();
    let drawing_area = prepare_drawing_area(&backend_path)?;

    let mut chart = ChartBuilder::on(&drawing_area)
        .caption("Game lengths", ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(lo..hi, 0.0..y_max)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc("Game length (plies)")
        .y_desc("Games")
        .label_style(("sans-serif", 25))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let bin_width = (hi - lo) / GAME_LENGTH_BINS as f64;
    chart
        .draw_series(counts.iter().enumerate().map(|(bin, &count)| {
            let x0 = lo + bin as f64 * bin_width;
            let x1 = x0 + bin_width;
            Rectangle::new([(x0, 0.0), (x1, count as f64)], BLUE.mix(0.6).filled())
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(LineSeries::new(
            [(mean_length, 0.0), (mean_length, y_max)],
            BLACK.stroke_width(2),
        ))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    drawing_area
        .present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(output_path)
}
