// SPDX-License-Identifier: AGPL-3.0-or-later
//! Result writers: trajectory dumps and sensitivity tables.
//!
//! Both formats are whitespace-separated text, one record per line:
//!
//! - trajectory: `time x0 x1 x2 x3 x4 x5`
//! - sensitivity: `maxPositiveExponent maxNegativeExponent`, one line
//!   per parameter, in parameter order.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::habituation::Trajectory;
use crate::sensitivity::SensitivityTable;

fn io_err(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Dump a sampled trajectory for diagnostics.
pub fn write_trajectory(path: &Path, trajectory: &Trajectory) -> Result<()> {
    let file = File::create(path).map_err(|e| io_err(path, e))?;
    let mut out = BufWriter::new(file);
    for (t, x) in trajectory.times.iter().zip(&trajectory.states) {
        write!(out, "{t}").map_err(|e| io_err(path, e))?;
        for v in x {
            write!(out, " {v}").map_err(|e| io_err(path, e))?;
        }
        writeln!(out).map_err(|e| io_err(path, e))?;
    }
    out.flush().map_err(|e| io_err(path, e))
}

/// Write the per-parameter perturbation limits.
pub fn write_sensitivity_table(path: &Path, table: &SensitivityTable) -> Result<()> {
    let file = File::create(path).map_err(|e| io_err(path, e))?;
    let mut out = BufWriter::new(file);
    for (up, down) in &table.rows {
        writeln!(out, "{up} {down}").map_err(|e| io_err(path, e))?;
    }
    out.flush().map_err(|e| io_err(path, e))
}
