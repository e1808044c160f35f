//! Error types for splitting

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while configuring or running a split.
#[derive(Debug, Error)]
pub enum SplitError {
    // ── Configuration ─────────────────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Unknown encoding '{0}'. Expected one of Default, ASCII, UTF7, UTF8, Unicode, UTF32, BigEndianUnicode")]
    UnknownEncoding(String),

    // ── Input resolution ──────────────────────────────────────────────────────
    #[error("Invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("No input file matches: {patterns}")]
    InvalidPath { patterns: String },

    // ── File I/O ──────────────────────────────────────────────────────────────
    #[error("Failed to open '{}' for reading: {source}", path.display())]
    OpenRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create '{}': {source}", path.display())]
    OpenWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SplitError {
    /// Path of the file involved, for per-file I/O failures
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            SplitError::OpenRead { path, .. }
            | SplitError::OpenWrite { path, .. }
            | SplitError::Read { path, .. }
            | SplitError::Write { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Whether this error concerns a single input file rather than the whole run
    pub fn is_per_file(&self) -> bool {
        self.path().is_some()
    }
}

/// Convenience alias used throughout the crate
pub type Result<T, E = SplitError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_file_errors_carry_path() {
        let err = SplitError::OpenWrite {
            path: PathBuf::from("out/data_1.csv"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.is_per_file());
        assert_eq!(err.path().unwrap(), std::path::Path::new("out/data_1.csv"));
        assert!(err.to_string().contains("out/data_1.csv"));
    }

    #[test]
    fn test_run_level_errors_have_no_path() {
        let err = SplitError::InvalidPath { patterns: "*.csv".into() };
        assert!(!err.is_per_file());
        assert_eq!(err.to_string(), "No input file matches: *.csv");
    }
}
