// SPDX-License-Identifier: AGPL-3.0-or-later
//! File-format round trips through real temporary files.

use std::fs;

use habiscan::habituation::Trajectory;
use habiscan::io::{params, table};
use habiscan::sensitivity::SensitivityTable;
use tempfile::TempDir;

#[test]
fn parameter_rows_with_mixed_separators() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("params.txt");
    fs::write(&path, "0.1, 0.2 0.3\n\n1,2,3e-1\n").unwrap();

    let rows = params::read_parameter_rows(&path, 3).unwrap();
    assert_eq!(rows, vec![vec![0.1, 0.2, 0.3], vec![1.0, 2.0, 0.3]]);
}

#[test]
fn parameter_row_width_mismatch_names_the_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("params.txt");
    fs::write(&path, "1 2 3\n4 5\n").unwrap();

    let err = params::read_parameter_rows(&path, 3).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("line 2"), "got: {msg}");
}

#[test]
fn missing_file_reports_its_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.txt");
    let err = params::read_parameter_rows(&path, 3).unwrap_err();
    assert!(err.to_string().contains("absent.txt"));
}

#[test]
fn trajectory_dump_layout() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trajectory.txt");
    let trajectory = Trajectory {
        times: vec![0.0, 0.001],
        states: vec![
            [1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [0.999, 0.0005, 0.0, 0.0, 0.0, 0.0001],
        ],
        output: vec![0.0, 0.0001],
    };
    table::write_trajectory(&path, &trajectory).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in &lines {
        assert_eq!(line.split_whitespace().count(), 7);
    }
    let first: f64 = lines[0].split_whitespace().next().unwrap().parse().unwrap();
    assert_eq!(first, 0.0);
}

#[test]
fn sensitivity_table_roundtrip_is_exact() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("table.txt");
    let written = SensitivityTable {
        rows: vec![(0.5, -0.25), (0.298828125, -0.19921875), (0.0, -0.0)],
    };
    table::write_sensitivity_table(&path, &written).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let mut parsed = Vec::new();
    for line in text.lines() {
        let mut fields = line.split_whitespace();
        let up: f64 = fields.next().unwrap().parse().unwrap();
        let down: f64 = fields.next().unwrap().parse().unwrap();
        assert!(fields.next().is_none());
        parsed.push((up, down));
    }
    assert_eq!(parsed.len(), written.rows.len());
    for ((wu, wd), (pu, pd)) in written.rows.iter().zip(&parsed) {
        assert_eq!(wu.to_bits(), pu.to_bits());
        assert_eq!(wd.to_bits(), pd.to_bits());
    }
}
