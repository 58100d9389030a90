//! Log loading for semicolon-delimited game logs
//!
//! This module scans a directory for `*.csv` files, validates that every
//! file carries the same header, and concatenates all data rows together
//! with per-file row counts (game lengths).

use crate::common::LogData;
use csv::ReaderBuilder;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Field delimiter used by the log writer
pub const LOG_DELIMITER: u8 = b';';

/// Errors that can occur while loading log files
#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("Not a directory (or does not exist): {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("No CSV log files found in {}", .0.display())]
    NoLogsFound(PathBuf),

    #[error("Log file contains no header row: {}", .0.display())]
    EmptyLog(PathBuf),

    #[error("Logs of differing format supplied: {} has header {found:?}, expected {expected:?}", .file.display())]
    SchemaMismatch {
        file: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Failed to read log directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

type Result<T> = core::result::Result<T, ParsingError>;

/// Finds all `*.csv` files in `directory`, sorted by file name
///
/// Sorting fixes the row-processing order: directory listing order is
/// platform dependent, and every downstream figure inherits row order.
pub fn find_log_files(directory: &Path) -> Result<Vec<PathBuf>> {
    if !directory.is_dir() {
        return Err(ParsingError::NotADirectory(directory.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(ParsingError::NoLogsFound(directory.to_path_buf()));
    }
    Ok(files)
}

/// Loads every log file in `directory` into one [`LogData`]
///
/// The first file's header becomes the schema; any later file with a
/// different header fails with [`ParsingError::SchemaMismatch`] before any
/// statistics are computed. Row lengths may vary within a file (trailing
/// iteration blocks), so the reader runs in flexible mode.
pub fn load_logs(directory: &Path) -> Result<LogData> {
    let files = find_log_files(directory)?;

    let mut schema: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row_lengths: Vec<usize> = Vec::new();
    let mut game_lengths: Vec<usize> = Vec::new();

    let progress = ProgressBar::new(files.len() as u64);
    // The default bar template has no {msg} slot, so the file name would
    // never show up without an explicit template.
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}") {
        progress.set_style(style);
    }
    for file in &files {
        progress.set_message(file.display().to_string());
        load_one_log(file, &mut schema, &mut rows, &mut row_lengths, &mut game_lengths)?;
        progress.inc(1);
    }
    progress.finish_and_clear();

    Ok(LogData {
        schema,
        rows,
        row_lengths,
        game_lengths,
        sources: files,
    })
}

fn load_one_log(
    file: &Path,
    schema: &mut Vec<String>,
    rows: &mut Vec<Vec<String>>,
    row_lengths: &mut Vec<usize>,
    game_lengths: &mut Vec<usize>,
) -> Result<()> {
    let mut reader = ReaderBuilder::new()
        .delimiter(LOG_DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_path(file)?;

    let mut records = reader.records();
    let header: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(str::to_owned).collect(),
        None => return Err(ParsingError::EmptyLog(file.to_path_buf())),
    };

    if schema.is_empty() {
        *schema = header;
    } else if *schema != header {
        return Err(ParsingError::SchemaMismatch {
            file: file.to_path_buf(),
            expected: schema.clone(),
            found: header,
        });
    }

    let mut game_length = 0usize;
    for record in records {
        let row: Vec<String> = record?.iter().map(str::to_owned).collect();
        row_lengths.push(row.len());
        rows.push(row);
        game_length += 1;
    }
    game_lengths.push(game_length);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_log(dir: &Path, name: &str, lines: &[&str]) {
        let mut file = File::create(dir.join(name)).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
    }

    #[test]
    fn test_load_logs_totals() {
        let dir = tempdir().unwrap();
        write_log(dir.path(), "a.csv", &["ply;score", "1;10;3", "2;12", "3;9;4;5"]);
        write_log(dir.path(), "b.csv", &["ply;score", "1;7", "2;8"]);

        let data = load_logs(dir.path()).unwrap();
        assert_eq!(data.schema, vec!["ply", "score"]);
        assert_eq!(data.game_lengths, vec![3, 2]);
        assert_eq!(data.rows.len(), 5);
        assert_eq!(data.rows.len(), data.game_lengths.iter().sum::<usize>());
        assert_eq!(data.row_lengths, vec![3, 2, 4, 2, 2]);
    }

    #[test]
    fn test_sources_pair_with_game_lengths() {
        let dir = tempdir().unwrap();
        write_log(dir.path(), "b.csv", &["ply;score", "1;7"]);
        write_log(dir.path(), "a.csv", &["ply;score", "1;10", "2;12"]);

        let data = load_logs(dir.path()).unwrap();
        assert_eq!(
            data.sources,
            vec![dir.path().join("a.csv"), dir.path().join("b.csv")]
        );
        assert_eq!(data.game_lengths, vec![2, 1]);
        assert_eq!(data.sources.len(), data.game_lengths.len());
    }

    #[test]
    fn test_files_processed_in_sorted_order() {
        let dir = tempdir().unwrap();
        // Created out of order on purpose; rows must still come a.csv first.
        write_log(dir.path(), "b.csv", &["ply", "2"]);
        write_log(dir.path(), "a.csv", &["ply", "1"]);

        let data = load_logs(dir.path()).unwrap();
        assert_eq!(data.rows, vec![vec!["1".to_string()], vec!["2".to_string()]]);
    }

    #[test]
    fn test_schema_mismatch_fails() {
        let dir = tempdir().unwrap();
        write_log(dir.path(), "a.csv", &["ply;score", "1;10"]);
        write_log(dir.path(), "b.csv", &["ply;value", "1;10"]);

        let result = load_logs(dir.path());
        assert!(matches!(result, Err(ParsingError::SchemaMismatch { .. })));
    }

    #[test]
    fn test_not_a_directory() {
        let result = load_logs(Path::new("/nonexistent/surely/missing"));
        assert!(matches!(result, Err(ParsingError::NotADirectory(_))));
    }

    #[test]
    fn test_no_logs_found() {
        let dir = tempdir().unwrap();
        write_log(dir.path(), "notes.txt", &["not a log"]);

        let result = load_logs(dir.path());
        assert!(matches!(result, Err(ParsingError::NoLogsFound(_))));
    }

    #[test]
    fn test_header_only_file_counts_as_zero_length_game() {
        let dir = tempdir().unwrap();
        write_log(dir.path(), "a.csv", &["ply;score", "1;10"]);
        write_log(dir.path(), "b.csv", &["ply;score"]);

        let data = load_logs(dir.path()).unwrap();
        assert_eq!(data.game_lengths, vec![1, 0]);
    }
}
