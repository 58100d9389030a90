//! Row decoding into typed ply records and iteration blocks
//!
//! [`decode_row`] is total: given a validated row it always yields one
//! [`PlyRecord`] and exactly `floor((len - named) / width)` blocks, with
//! non-numeric cells carried as [`CellValue::Missing`].

use crate::common::data_structures::{to_number, IterationBlock};
use crate::common::{CellValue, DecodedLogs, LogData, PlyRecord, ShapeSummary};

/// Decodes one row into its ply record and iteration blocks
///
/// The record holds the `named` leading cells plus one derived value: the
/// coercion of the row's last cell, which the log writer uses as a close
/// approximation of total elapsed time for the ply.
pub fn decode_row(
    row: &[String],
    named: usize,
    block_width: usize,
) -> (PlyRecord, Vec<IterationBlock>) {
    let mut values: Vec<CellValue> = row[..named].iter().map(|cell| to_number(cell)).collect();
    values.push(match row.last() {
        Some(cell) => to_number(cell),
        None => CellValue::Missing,
    });

    let blocks: Vec<IterationBlock> = row[named..]
        .chunks_exact(block_width)
        .map(|chunk| chunk.iter().map(|cell| to_number(cell)).collect())
        .collect();

    (PlyRecord { values }, blocks)
}

/// Decodes every loaded row, bucketing blocks by iteration index
///
/// Iteration tables are pre-sized from the shape summary's population
/// counts. Those counts were computed from the very rows walked here, so a
/// push can never exceed the reserved capacity; any filtering step inserted
/// between shape analysis and this loop would break that coupling.
pub fn decode_logs(data: &LogData, summary: &ShapeSummary, block_width: usize) -> DecodedLogs {
    let named = data.named_field_count();

    let mut ply_records = Vec::with_capacity(data.rows.len());
    let mut iteration_tables: Vec<Vec<IterationBlock>> = summary
        .iteration_block_population
        .iter()
        .map(|&population| Vec::with_capacity(population))
        .collect();

    for row in &data.rows {
        let (record, blocks) = decode_row(row, named, block_width);
        ply_records.push(record);
        for (iteration, block) in blocks.into_iter().enumerate() {
            iteration_tables[iteration].push(block);
        }
    }

    DecodedLogs {
        ply_records,
        iteration_tables,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::CellValue::{Missing, Numeric};
    use crate::shape::analyze_shape;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_decode_row_named_fields_and_derived_time() {
        let raw = row(&["2", "15", "100", "7", "250", "9"]);
        let (record, blocks) = decode_row(&raw, 2, 2);

        // Two named fields plus the derived last-cell value.
        assert_eq!(
            record.values,
            vec![Numeric(2.0), Numeric(15.0), Numeric(9.0)]
        );
        assert_eq!(
            blocks,
            vec![
                vec![Numeric(100.0), Numeric(7.0)],
                vec![Numeric(250.0), Numeric(9.0)],
            ]
        );
    }

    #[test]
    fn test_decode_row_block_count_is_floor() {
        for extra in 0..6 {
            let mut cells = vec!["1".to_string(), "10".to_string()];
            cells.extend((0..extra).map(|i| i.to_string()));
            let (_, blocks) = decode_row(&cells, 2, 2);
            assert_eq!(blocks.len(), extra / 2);
        }
    }

    #[test]
    fn test_decode_row_missing_sentinel() {
        let raw = row(&["1", "oops", "42"]);
        let (record, blocks) = decode_row(&raw, 2, 1);

        assert_eq!(record.values, vec![Numeric(1.0), Missing, Numeric(42.0)]);
        assert_eq!(blocks, vec![vec![Numeric(42.0)]]);
    }

    #[test]
    fn test_decode_row_without_blocks() {
        let raw = row(&["3", "21"]);
        let (record, blocks) = decode_row(&raw, 2, 1);

        assert!(blocks.is_empty());
        // The derived value falls back to the last named cell.
        assert_eq!(record.values, vec![Numeric(3.0), Numeric(21.0), Numeric(21.0)]);
    }

    #[test]
    fn test_decode_logs_buckets_by_iteration() {
        let rows = vec![
            row(&["1", "10", "5"]),
            row(&["2", "11", "6", "7"]),
            row(&["3", "12", "8", "9", "4"]),
        ];
        let data = LogData {
            schema: vec!["ply".to_string(), "score".to_string()],
            row_lengths: rows.iter().map(Vec::len).collect(),
            rows,
            game_lengths: vec![3],
            sources: Vec::new(),
        };
        let summary = analyze_shape(&data, 1).unwrap();
        let decoded = decode_logs(&data, &summary, 1);

        assert_eq!(decoded.ply_records.len(), 3);
        assert_eq!(decoded.iteration_tables.len(), 3);
        // Every row has a first block, two rows a second, one a third.
        assert_eq!(
            decoded.iteration_tables[0],
            vec![vec![Numeric(5.0)], vec![Numeric(6.0)], vec![Numeric(8.0)]]
        );
        assert_eq!(
            decoded.iteration_tables[1],
            vec![vec![Numeric(7.0)], vec![Numeric(9.0)]]
        );
        assert_eq!(decoded.iteration_tables[2], vec![vec![Numeric(4.0)]]);
    }

    #[test]
    fn test_load_shape_decode_chain_on_two_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.csv"),
            "ply;score\n1;10;5\n2;11;6;7\n3;12;8;9;4\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("b.csv"), "ply;score\n1;7;1\n2;8;2\n").unwrap();

        let data = crate::parsing::load_logs(dir.path()).unwrap();
        assert_eq!(data.game_lengths, vec![3, 2]);

        let summary = analyze_shape(&data, 1).unwrap();
        assert_eq!(summary.max_row_length, 5);
        assert_eq!(summary.max_game_length, 3);
        assert_eq!(summary.max_iterations, 3);
        assert_eq!(summary.iteration_row_counts, vec![3, 1, 1]);
        assert_eq!(summary.iteration_block_population, vec![5, 2, 1]);

        let decoded = decode_logs(&data, &summary, 1);
        let table_sizes: Vec<usize> = decoded.iteration_tables.iter().map(Vec::len).collect();
        assert_eq!(table_sizes, summary.iteration_block_population);
    }

    #[test]
    fn test_decode_logs_fills_exactly_to_population() {
        let rows = vec![
            row(&["1", "0", "1", "2"]),
            row(&["2", "0"]),
            row(&["3", "0", "1", "2", "3", "4"]),
        ];
        let data = LogData {
            schema: vec!["ply".to_string(), "x".to_string()],
            row_lengths: rows.iter().map(Vec::len).collect(),
            rows,
            game_lengths: vec![3],
            sources: Vec::new(),
        };
        let summary = analyze_shape(&data, 2).unwrap();
        let decoded = decode_logs(&data, &summary, 2);

        let table_sizes: Vec<usize> = decoded.iteration_tables.iter().map(Vec::len).collect();
        assert_eq!(table_sizes, summary.iteration_block_population);
        assert_eq!(
            decoded.total_blocks(),
            summary.iteration_block_population.iter().sum::<usize>()
        );
    }
}
