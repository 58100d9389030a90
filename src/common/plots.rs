//! Shared plotting infrastructure
//!
//! Chart scaffolding for the analysis modules: PNG drawing areas via the
//! [`plotters`] bitmap backend (1200x800, headless-safe), the fixed series
//! palette, and figure file naming.

use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Only {available} series colors are available, {requested} fields requested")]
    PaletteExhausted { requested: usize, available: usize },
}

type Result<T> = core::result::Result<T, PlotError>;

/// Rendered figure width in pixels
pub const PLOT_WIDTH: u32 = 1200;

/// Rendered figure height in pixels
pub const PLOT_HEIGHT: u32 = 800;

/// Fixed series palette, keyed by unnamed-field index
pub const PALETTE: [RGBColor; 6] = [
    RED,
    BLUE,
    GREEN,
    MAGENTA,
    CYAN,
    RGBColor(255, 140, 0),
];

/// Picks the palette color for a field index
///
/// Fails with [`PlotError::PaletteExhausted`] when more fields are requested
/// than the palette holds; callers check this once up front so no partial
/// figure is written.
pub fn palette_color(field_index: usize, field_count: usize) -> Result<RGBColor> {
    if field_count > PALETTE.len() {
        return Err(PlotError::PaletteExhausted {
            requested: field_count,
            available: PALETTE.len(),
        });
    }
    Ok(PALETTE[field_index])
}

/// Converts a field label to its figure file name stem
///
/// Lower-cased, spaces replaced with underscores, matching the naming rule
/// of the log producer's own tooling.
pub fn slug(label: &str) -> String {
    label.to_lowercase().replace(' ', "_")
}

/// Full output path for the figure belonging to `label`
pub fn figure_path(output_dir: &Path, label: &str) -> PathBuf {
    output_dir.join(format!("{}.png", slug(label)))
}

/// Creates a white-filled 1200x800 PNG drawing area at `path`
///
/// Uses the bitmap backend with its built-in font rendering so figures come
/// out identical in headless environments (CI, containers). The returned
/// drawing area borrows `path` until it is dropped; a renderer that also
/// returns the path must hand the backend its own owned copy.
pub fn prepare_drawing_area(path: &Path) -> Result<DrawingArea<BitMapBackend<'_>, Shift>> {
    let drawing_area = BitMapBackend::new(path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    drawing_area
        .fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;
    Ok(drawing_area)
}

/// Widens a degenerate value span so axis construction never sees an empty
/// range (all-equal data would otherwise produce a zero-width axis)
pub fn pad_span(lo: f64, hi: f64) -> (f64, f64) {
    if hi > lo {
        (lo, hi)
    } else {
        (lo - 0.5, lo + 0.5)
    }
}

/// Opens a saved figure in the platform image viewer (interactive mode)
///
/// Spawn failures are reported but never abort the run.
pub fn display_figure(path: &Path) {
    #[cfg(target_os = "macos")]
    let viewer = "open";
    #[cfg(not(target_os = "macos"))]
    let viewer = "xdg-open";

    if let Err(e) = Command::new(viewer).arg(path).spawn() {
        eprintln!("Could not open {} with {}: {}", path.display(), viewer, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug() {
        assert_eq!(slug("Total Time"), "total_time");
        assert_eq!(slug("score"), "score");
        assert_eq!(slug("A B C"), "a_b_c");
    }

    #[test]
    fn test_figure_path() {
        let path = figure_path(Path::new("plots"), "Search Depth");
        assert_eq!(path, PathBuf::from("plots/search_depth.png"));
    }

    #[test]
    fn test_palette_color_in_range() {
        let color = palette_color(1, 3).unwrap();
        assert_eq!(color, PALETTE[1]);
    }

    #[test]
    fn test_palette_exhausted() {
        let result = palette_color(0, PALETTE.len() + 1);
        assert!(matches!(
            result,
            Err(PlotError::PaletteExhausted { requested, available })
                if requested == PALETTE.len() + 1 && available == PALETTE.len()
        ));
    }

    #[test]
    fn test_pad_span() {
        assert_eq!(pad_span(1.0, 2.0), (1.0, 2.0));
        assert_eq!(pad_span(3.0, 3.0), (2.5, 3.5));
    }
}
