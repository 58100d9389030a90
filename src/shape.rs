//! Shape analysis of the loaded row-length distribution
//!
//! Rows are ragged: each one carries the named fields plus zero or more
//! fixed-width iteration blocks. This module derives, from row lengths
//! alone, how many blocks the widest rows hold and how many rows reach
//! each block index. The population counts double as the storage sizes
//! the decoder pre-allocates, so both must come from the same row set.

use crate::common::{LogData, ShapeSummary};
use tabled::{Table, Tabled};
use thiserror::Error;

/// Errors that can occur during shape analysis
#[derive(Error, Debug)]
pub enum ShapeError {
    #[error("No data rows found in any log file")]
    NoRows,

    #[error("Row {row} has {length} cells, fewer than the {named} named fields")]
    RowTooShort {
        row: usize,
        length: usize,
        named: usize,
    },

    #[error("Row {row} has {length} cells; {extra} trailing cells do not divide into blocks of {width}")]
    RaggedRow {
        row: usize,
        length: usize,
        extra: usize,
        width: usize,
    },
}

type Result<T> = core::result::Result<T, ShapeError>;

/// Derives the [`ShapeSummary`] for loaded logs
///
/// `block_width` is the number of unnamed (per-iteration) fields. Every row
/// length must equal `named + k * block_width` for some k >= 0; anything
/// else is a malformed log and fails here rather than corrupting the
/// decoder's offset arithmetic.
pub fn analyze_shape(data: &LogData, block_width: usize) -> Result<ShapeSummary> {
    debug_assert!(block_width > 0, "block width is the unnamed-field count, at least 1");
    let named = data.named_field_count();
    if data.rows.is_empty() {
        return Err(ShapeError::NoRows);
    }

    for (row, &length) in data.row_lengths.iter().enumerate() {
        if length < named {
            return Err(ShapeError::RowTooShort { row, length, named });
        }
        let extra = (length - named) % block_width;
        if extra != 0 {
            return Err(ShapeError::RaggedRow {
                row,
                length,
                extra,
                width: block_width,
            });
        }
    }

    let max_row_length = data.row_lengths.iter().copied().max().unwrap_or(named);
    let max_game_length = data.game_lengths.iter().copied().max().unwrap_or(0);
    let max_iterations = (max_row_length - named) / block_width;

    // Frequency count of row lengths, read back at the stride offsets that
    // correspond to one, two, ... blocks past the named fields.
    let mut length_frequency = vec![0usize; max_row_length + 1];
    for &length in &data.row_lengths {
        length_frequency[length] += 1;
    }
    let iteration_row_counts: Vec<usize> = (0..max_iterations)
        .map(|i| length_frequency[named + (i + 1) * block_width])
        .collect();

    // Suffix sums: rows holding at least i+1 blocks.
    let mut iteration_block_population = vec![0usize; max_iterations];
    let mut running = 0usize;
    for i in (0..max_iterations).rev() {
        running += iteration_row_counts[i];
        iteration_block_population[i] = running;
    }

    Ok(ShapeSummary {
        max_row_length,
        max_game_length,
        max_iterations,
        iteration_row_counts,
        iteration_block_population,
    })
}

#[derive(Tabled)]
struct IterationCountRow {
    #[tabled(rename = "Iteration")]
    iteration: usize,
    #[tabled(rename = "Rows with exactly this many blocks")]
    exact: usize,
    #[tabled(rename = "Rows reaching this block")]
    population: usize,
}

/// Formats the per-iteration counts as an ASCII table for verbose output
pub fn format_iteration_table(summary: &ShapeSummary) -> String {
    if summary.max_iterations == 0 {
        return "No iteration blocks present in any row".to_string();
    }

    let rows: Vec<IterationCountRow> = (0..summary.max_iterations)
        .map(|i| IterationCountRow {
            iteration: i,
            exact: summary.iteration_row_counts[i],
            population: summary.iteration_block_population[i],
        })
        .collect();
    Table::new(rows).to_string()
}
