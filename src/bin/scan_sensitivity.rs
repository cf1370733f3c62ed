// SPDX-License-Identifier: AGPL-3.0-or-later
//! Driver: read parameter rows, scan sensitivity, write the table.
//!
//! ```text
//! scan_sensitivity <receptor-feedforward|receptor-ra|feedback-concat> \
//!     <params.txt> <table.txt>
//! ```
//!
//! Each input row is one parameter vector for the chosen topology; each
//! produces one output table (numbered suffixes when the input holds
//! more than one row).

use std::path::{Path, PathBuf};
use std::process;

use habiscan::circuit::{Circuit, FeedbackConcat, ReceptorFeedforward, ReceptorRa};
use habiscan::error::Result;
use habiscan::io::{params, table};
use habiscan::sensitivity::scan_sensitivity;

fn numbered(path: &Path, index: usize) -> PathBuf {
    PathBuf::from(format!("{}.{index}", path.display()))
}

fn run<C: Circuit>(circuit: &C, input: &Path, output: &Path) -> Result<()> {
    let rows = params::read_parameter_rows(input, circuit.param_len())?;
    for (i, row) in rows.iter().enumerate() {
        let result = scan_sensitivity(circuit, row)?;
        let path = if rows.len() == 1 {
            output.to_path_buf()
        } else {
            numbered(output, i)
        };
        table::write_sensitivity_table(&path, &result)?;
        println!(
            "{}: row {i}: {} parameters -> {}",
            circuit.name(),
            result.rows.len(),
            path.display()
        );
    }
    Ok(())
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 4 {
        eprintln!(
            "usage: {} <receptor-feedforward|receptor-ra|feedback-concat> <params.txt> <table.txt>",
            args[0]
        );
        process::exit(2);
    }
    let input = Path::new(&args[2]);
    let output = Path::new(&args[3]);

    let outcome = match args[1].as_str() {
        "receptor-feedforward" => run(&ReceptorFeedforward, input, output),
        "receptor-ra" => run(&ReceptorRa, input, output),
        "feedback-concat" => run(&FeedbackConcat, input, output),
        other => {
            eprintln!("unknown topology: {other}");
            process::exit(2);
        }
    };
    if let Err(err) = outcome {
        eprintln!("{err}");
        process::exit(1);
    }
}
