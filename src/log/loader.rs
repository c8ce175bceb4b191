//! Run-log loader.
//!
//! Format:
//! - UTF-8, comma-separated, no header row
//! - exactly five positional fields per row:
//!   `step,train_accuracy,val_accuracy,train_cross_entropy,val_cross_entropy`
//! - blank lines are ignored; any other malformed row fails the whole load
//!
//! The file is reread in full on every call; nothing is cached.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::trace;

use crate::error::{Error, Result};
use crate::log::record::{Column, MetricRecord};
use crate::log::table::MetricTable;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Reads the run log at `path` into a [`MetricTable`].
///
/// # Errors
/// - [`Error::NotFound`] if the file does not exist yet
/// - [`Error::Parse`] on the first malformed row
/// - [`Error::Io`] for any other read failure
pub fn load(path: impl AsRef<Path>) -> Result<MetricTable> {
    let path = path.as_ref();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(Error::Io(e)),
    };

    let table = parse_log(&text)?;
    trace!(path = %path.display(), rows = table.len(), "run log loaded");
    Ok(table)
}

/// Parses run-log text. An empty string yields an empty table.
pub fn parse_log(text: &str) -> Result<MetricTable> {
    let mut records = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        records.push(parse_record(line, idx + 1)?);
    }

    Ok(MetricTable::new(records))
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn parse_record(line: &str, line_no: usize) -> Result<MetricRecord> {
    let cells = split_row(line);
    if cells.len() != Column::ALL.len() {
        return Err(Error::Parse {
            line: line_no,
            column: format!("row (expected {} fields, got {})", Column::ALL.len(), cells.len()),
            value: line.to_owned(),
        });
    }

    let step = cells[0].trim();
    let step: u64 = step.parse().map_err(|_| Error::Parse {
        line: line_no,
        column: Column::Step.name().to_owned(),
        value: step.to_owned(),
    })?;

    Ok(MetricRecord {
        step,
        train_accuracy: parse_float(&cells[1], Column::TrainAccuracy, line_no)?,
        val_accuracy:   parse_float(&cells[2], Column::ValAccuracy, line_no)?,
        train_loss:     parse_float(&cells[3], Column::TrainLoss, line_no)?,
        val_loss:       parse_float(&cells[4], Column::ValLoss, line_no)?,
    })
}

fn parse_float(cell: &str, column: Column, line_no: usize) -> Result<f64> {
    let t = cell.trim();
    t.parse::<f64>().map_err(|_| Error::Parse {
        line: line_no,
        column: column.name().to_owned(),
        value: t.to_owned(),
    })
}

/// Splits a single CSV row, honouring double-quoted fields.
fn split_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const THREE_ROWS: &str = "0,0.1,0.2,1.0,1.1\n1,0.3,0.4,0.9,1.0\n2,0.5,0.6,0.8,0.9\n";

    #[test]
    fn parses_three_rows_in_file_order() {
        let table = parse_log(THREE_ROWS).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.steps(), vec![0, 1, 2]);
        assert_eq!(table.column(Column::TrainAccuracy), vec![0.1, 0.3, 0.5]);
        assert_eq!(table.column(Column::ValLoss), vec![1.1, 1.0, 0.9]);
    }

    #[test]
    fn empty_text_is_an_empty_table() {
        assert!(parse_log("").unwrap().is_empty());
        assert!(parse_log("\n\n").unwrap().is_empty());
    }

    #[test]
    fn tolerates_whitespace_and_crlf() {
        let table = parse_log(" 3 , 0.5,0.4 ,0.7,0.8\r\n").unwrap();
        assert_eq!(table.last().unwrap().step, 3);
        assert_eq!(table.last().unwrap().val_accuracy, 0.4);
    }

    #[test]
    fn quoted_fields_are_unwrapped() {
        let table = parse_log("\"7\",0.1,0.2,0.3,0.4\n").unwrap();
        assert_eq!(table.steps(), vec![7]);
    }

    #[test]
    fn bad_float_fails_the_whole_load() {
        let err = parse_log("0,0.1,0.2,1.0,1.1\n1,0.3,oops,0.9,1.0\n").unwrap_err();
        match err {
            Error::Parse { line, column, value } => {
                assert_eq!(line, 2);
                assert_eq!(column, "val accuracy");
                assert_eq!(value, "oops");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn fractional_step_is_a_parse_error() {
        let err = parse_log("1.5,0.1,0.2,1.0,1.1\n").unwrap_err();
        assert!(matches!(err, Error::Parse { ref column, .. } if column == "step"));
    }

    #[test]
    fn short_row_is_a_parse_error() {
        let err = parse_log("0,0.1,0.2\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run_log.csv");
        let err = load(&path).unwrap_err();
        assert!(err.is_no_data());
        assert!(matches!(err, Error::NotFound(ref p) if p == &path));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(THREE_ROWS.as_bytes()).unwrap();
        let table = load(file.path()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table, load(file.path()).unwrap());
    }
}
