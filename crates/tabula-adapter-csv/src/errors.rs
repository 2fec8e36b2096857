//! Error types for CSV adapter with context

use thiserror::Error;

/// Whether a row length mismatch is due to missing or extra columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLengthMismatchKind {
    Missing,
    Extra,
}

impl std::fmt::Display for RowLengthMismatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "missing values"),
            Self::Extra => write!(f, "extra values"),
        }
    }
}

/// Errors that can occur when working with CSV
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CsvError {
    /// CSV read error with context
    #[error("CSV read error at line {line}: {message}")]
    Read { line: usize, message: String },

    /// CSV write error
    #[error("CSV write error: {0}")]
    Write(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(String),

    /// Row-length mismatch against expected header width
    #[error(
        "Row length mismatch at line {line}: expected {expected} columns, got {actual} ({kind})"
    )]
    RowLengthMismatch {
        line: usize,
        expected: usize,
        actual: usize,
        kind: RowLengthMismatchKind,
    },

    /// Frame construction error
    #[error("Frame error: {0}")]
    Frame(#[from] tabula_frame::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CsvError {
    /// Create a read error at a specific line
    pub fn read_at(line: usize, message: impl Into<String>) -> Self {
        Self::Read {
            line,
            message: message.into(),
        }
    }

    /// Create a row-length mismatch error.
    pub fn row_length_mismatch(line: usize, expected: usize, actual: usize) -> Self {
        let kind = if actual < expected {
            RowLengthMismatchKind::Missing
        } else {
            RowLengthMismatchKind::Extra
        };
        Self::RowLengthMismatch {
            line,
            expected,
            actual,
            kind,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a write error
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write(message.into())
    }

    /// Get the line number if available
    pub fn line_number(&self) -> Option<usize> {
        match self {
            Self::Read { line, .. } if *line > 0 => Some(*line),
            Self::RowLengthMismatch { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CsvError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<csv::Error> for CsvError {
    fn from(e: csv::Error) -> Self {
        let line = e
            .position()
            .and_then(|p| usize::try_from(p.line()).ok())
            .unwrap_or(0);
        Self::Read {
            line,
            message: e.to_string(),
        }
    }
}

/// Result type alias for CSV operations
pub type CsvResult<T> = std::result::Result<T, CsvError>;
