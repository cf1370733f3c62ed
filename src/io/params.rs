// SPDX-License-Identifier: AGPL-3.0-or-later
//! Parameter-row ingestion.
//!
//! Input is a flat text stream, one parameter vector per line, values
//! separated by commas and/or whitespace. Row length is validated once
//! here, against the topology's expected parameter count, so the
//! numerics never see a malformed vector. Blank lines are skipped.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Parse one row of floats. Returns `Ok(None)` for a blank line.
pub fn parse_row(line: &str, expected_len: usize, line_no: usize) -> Result<Option<Vec<f64>>> {
    let normalized = line.replace(',', " ");
    let fields: Vec<&str> = normalized.split_whitespace().collect();
    if fields.is_empty() {
        return Ok(None);
    }
    if fields.len() != expected_len {
        return Err(Error::Params(format!(
            "line {line_no}: expected {expected_len} values, found {}",
            fields.len()
        )));
    }
    let mut row = Vec::with_capacity(expected_len);
    for field in fields {
        let value: f64 = field.parse().map_err(|_| {
            Error::Params(format!("line {line_no}: not a number: {field:?}"))
        })?;
        row.push(value);
    }
    Ok(Some(row))
}

/// Read every parameter vector from `path`, each of `expected_len`
/// values.
pub fn read_parameter_rows(path: &Path, expected_len: usize) -> Result<Vec<Vec<f64>>> {
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut rows = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if let Some(row) = parse_row(line, expected_len, i + 1)? {
            rows.push(row);
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_and_space_mixtures() {
        let row = parse_row("1.0, 2.5,3e-2  4", 4, 1).unwrap().unwrap();
        assert_eq!(row, vec![1.0, 2.5, 0.03, 4.0]);
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert!(parse_row("", 9, 1).unwrap().is_none());
        assert!(parse_row("   \t ", 9, 2).unwrap().is_none());
    }

    #[test]
    fn wrong_column_count_is_reported_with_line_number() {
        let err = parse_row("1 2 3", 4, 7).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 7"), "got: {msg}");
        assert!(msg.contains("expected 4"), "got: {msg}");
    }

    #[test]
    fn bad_float_is_reported() {
        let err = parse_row("1 two 3", 3, 1).unwrap_err();
        assert!(err.to_string().contains("not a number"));
    }
}
