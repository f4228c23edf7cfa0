//! Error types for menuforge.
//!
//! Library crates use [`MenuforgeError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all menuforge operations.
#[derive(Debug, thiserror::Error)]
pub enum MenuforgeError {
    /// A working, output, or article directory does not exist.
    #[error("path not found: {path:?}")]
    PathNotFound { path: PathBuf },

    /// A CSV link list does not expose two columns, or cannot be parsed.
    #[error("malformed table {path:?}: {message}")]
    MalformedTable { path: PathBuf, message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// JSON or TOML rendering failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Data validation error (non-UTF-8 names, inconsistent outputs, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, MenuforgeError>;

impl MenuforgeError {
    /// Create a not-found error for a path.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::PathNotFound { path: path.into() }
    }

    /// Create a malformed-table error for a CSV file.
    pub fn malformed(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::MalformedTable {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
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
    ///
    /// `NotFound` errors become [`MenuforgeError::PathNotFound`] so callers see
    /// one variant for missing paths regardless of where the lookup failed.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            return Self::PathNotFound { path };
        }
        Self::Io { path, source }
    }
}
