//! Error types for report loading and analysis.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the aggregation functions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("invalid count mode '{0}': available modes are relative|absolute")]
    InvalidMode(String),

    #[error("unknown field '{0}'")]
    InvalidField(String),

    #[error("cannot compute {operation} from an empty selection")]
    EmptyInput { operation: &'static str },

    #[error("report {ticket} cannot be aggregated: {reason}")]
    InvalidRecord { ticket: i64, reason: &'static str },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors raised while reading a report file from disk.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {message}{}", path.display(), format_location(*line, *column))]
    Yaml {
        path: PathBuf,
        line: Option<usize>,
        column: Option<usize>,
        message: String,
    },
}

impl LoadError {
    /// Path of the file that failed to load.
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::Io { path, .. } | LoadError::Yaml { path, .. } => path,
        }
    }

    /// Line and column of the first YAML error, when the parser knows it.
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            LoadError::Yaml {
                line: Some(line),
                column: Some(column),
                ..
            } => Some((*line, *column)),
            _ => None,
        }
    }
}

fn format_location(line: Option<usize>, column: Option<usize>) -> String {
    match (line, column) {
        (Some(line), Some(column)) => format!(" (Line {}:Column {})", line, column),
        (Some(line), None) => format!(" (Line {})", line),
        _ => String::new(),
    }
}
