//! CLI error types.

use std::io;
use thiserror::Error;
use txkv_core::StoreError;

/// Errors raised while loading or executing a script.
#[derive(Debug, Error)]
pub enum CliError {
    /// A script line could not be parsed.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// A store operation was rejected and `--fail-fast` is set.
    #[error("line {line}: {source}")]
    Store {
        /// 1-based line number.
        line: usize,
        /// The rejected operation's error.
        #[source]
        source: StoreError,
    },

    /// I/O error reading the script or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Creates a parse error.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
