// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for habiscan I/O and computation.
//!
//! All parser and algorithm errors use [`Error`], with variants for each
//! failure mode. No external error crates — zero-dependency error type.

use std::fmt;
use std::path::PathBuf;

/// Errors produced by habiscan parsers and algorithms.
#[derive(Debug)]
pub enum Error {
    /// File I/O error with path context.
    Io {
        /// Path that caused the error.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Parameter-row parsing error (bad float, wrong column count).
    Params(String),
    /// Invalid input parameters (dimensions, ranges, constraints).
    InvalidInput(String),
}

/// Result type alias for habiscan operations.
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Params(msg) => write!(f, "parameter parse error: {msg}"),
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Params(_) | Self::InvalidInput(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_io_error() {
        let err = Error::Io {
            path: PathBuf::from("params/system_single.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("system_single.txt"), "got: {msg}");
        assert!(msg.contains("no such file"), "got: {msg}");
    }

    #[test]
    fn display_params_error() {
        let err = Error::Params("row 3: expected 9 values, found 8".to_string());
        assert!(err.to_string().contains("expected 9 values"));
    }

    #[test]
    fn source_chains_io() {
        let err = Error::Io {
            path: PathBuf::from("x"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "inner"),
        };
        assert!(std::error::Error::source(&err).is_some());
        let err = Error::InvalidInput("n/a".to_string());
        assert!(std::error::Error::source(&err).is_none());
    }
}
