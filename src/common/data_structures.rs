//! Core data model for decoded game logs
//!
//! Every value extracted from a log cell passes through [`to_number`], which
//! yields a tagged [`CellValue`] instead of failing. Downstream statistics
//! skip [`CellValue::Missing`] the way masked arrays would.

use std::path::PathBuf;

/// Result of coercing one CSV cell to a number
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue {
    /// The cell parsed as a finite number
    Numeric(f64),
    /// The cell was empty or not numeric; excluded from all statistics
    Missing,
}

impl CellValue {
    /// Returns the numeric value, or `None` for a missing cell
    pub fn as_f64(self) -> Option<f64> {
        match self {
            CellValue::Numeric(value) => Some(value),
            CellValue::Missing => None,
        }
    }

}

/// Coerces one raw cell to a [`CellValue`]
///
/// Total function: whitespace is trimmed, anything that does not parse as a
/// finite number becomes [`CellValue::Missing`] rather than an error.
pub fn to_number(cell: &str) -> CellValue {
    match cell.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => CellValue::Numeric(value),
        _ => CellValue::Missing,
    }
}

/// All rows loaded from one log directory, plus per-file bookkeeping
///
/// Rows are concatenated across files in sorted-filename order so that two
/// runs over the same directory always see the same row order.
#[derive(Debug, Clone)]
pub struct LogData {
    /// Named-field labels shared by every file (identical headers enforced)
    pub schema: Vec<String>,
    /// Every data row from every file, in file order then row order
    pub rows: Vec<Vec<String>>,
    /// Length of each row in `rows`
    pub row_lengths: Vec<usize>,
    /// Number of data rows contributed by each file ("game length")
    pub game_lengths: Vec<usize>,
    /// Path of each loaded file, parallel to `game_lengths`
    pub sources: Vec<PathBuf>,
}

impl LogData {
    /// Number of named (schema-declared) fields per row
    pub fn named_field_count(&self) -> usize {
        self.schema.len()
    }
}

/// Row-length distribution facts derived by the shape analyzer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeSummary {
    /// Widest row across all files
    pub max_row_length: usize,
    /// Longest game (most rows in one file)
    pub max_game_length: usize,
    /// Largest number of iteration blocks any row holds
    pub max_iterations: usize,
    /// `iteration_row_counts[i]` = rows holding exactly i+1 blocks
    pub iteration_row_counts: Vec<usize>,
    /// `iteration_block_population[i]` = rows holding at least i+1 blocks;
    /// this is the storage size for iteration table i
    pub iteration_block_population: Vec<usize>,
}

/// Named-field values of one row plus the derived elapsed-time value
///
/// `values[0..F)` are the named fields in schema order; `values[F]` is the
/// coercion of the row's last cell (an approximate total-time measure).
#[derive(Debug, Clone, PartialEq)]
pub struct PlyRecord {
    pub values: Vec<CellValue>,
}

impl PlyRecord {
    /// 1-based ply index within its game (the first named field)
    pub fn ply_index(&self) -> Option<usize> {
        self.values.first().and_then(|value| value.as_f64()).map(|value| value as usize)
    }
}

/// One fixed-width tuple of unnamed-field values sliced from a row
pub type IterationBlock = Vec<CellValue>;

/// Output of the row decoder: one record per row plus per-iteration tables
#[derive(Debug, Clone)]
pub struct DecodedLogs {
    /// One record per input row, in row order
    pub ply_records: Vec<PlyRecord>,
    /// `iteration_tables[i]` collects the i-th block of every row that has
    /// one, in row order
    pub iteration_tables: Vec<Vec<IterationBlock>>,
}

impl DecodedLogs {
    /// Total iteration blocks across all tables
    pub fn total_blocks(&self) -> usize {
        self.iteration_tables.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_number_numeric() {
        assert_eq!(to_number("42"), CellValue::Numeric(42.0));
        assert_eq!(to_number("-3.5"), CellValue::Numeric(-3.5));
        assert_eq!(to_number(" 17 "), CellValue::Numeric(17.0));
        assert_eq!(to_number("1e3"), CellValue::Numeric(1000.0));
    }

    #[test]
    fn test_to_number_missing() {
        assert_eq!(to_number(""), CellValue::Missing);
        assert_eq!(to_number("n/a"), CellValue::Missing);
        assert_eq!(to_number("12abc"), CellValue::Missing);
        assert_eq!(to_number("inf"), CellValue::Missing);
        assert_eq!(to_number("NaN"), CellValue::Missing);
    }

    #[test]
    fn test_cell_value_accessors() {
        assert_eq!(CellValue::Numeric(2.0).as_f64(), Some(2.0));
        assert_eq!(CellValue::Missing.as_f64(), None);
    }

    #[test]
    fn test_ply_index() {
        let record = PlyRecord {
            values: vec![CellValue::Numeric(3.0), CellValue::Numeric(10.0)],
        };
        assert_eq!(record.ply_index(), Some(3));

        let missing = PlyRecord {
            values: vec![CellValue::Missing],
        };
        assert_eq!(missing.ply_index(), None);
    }
}
