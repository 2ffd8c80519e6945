//! Error types for questform.
//!
//! Library crates use [`QuestformError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! The form transform itself never fails; it reports problems as
//! [`Diagnostic`](crate::Diagnostic)s. These errors cover the plumbing
//! around it (decoding model output, config, submission gating).

use std::path::PathBuf;

/// Top-level error type for all questform operations.
#[derive(Debug, thiserror::Error)]
pub enum QuestformError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Model output could not be decoded into JSON.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// A form definition is not fit for submission.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, QuestformError>;

impl QuestformError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
