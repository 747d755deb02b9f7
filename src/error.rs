//! # Error Handling
//!
//! This module defines the centralized error type for `dirpack`. It uses the
//! `thiserror` library to build a single `Error` enum covering every way an
//! archive operation can fail, each variant carrying the context needed to
//! explain the failure (the ignore file and line, the offending path, or the
//! writer operation that was rejected).
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Pattern syntax problems, missing roots,
//!   filesystem failures during traversal, archive writer rejections,
//!   configuration problems and session misuse each have their own variant.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Filtering decisions are never errors. Every error aborts the archive
//! operation in progress; nothing is retried and a partially written archive
//! is left for the caller to discard.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for dirpack operations
#[derive(Error, Debug)]
pub enum Error {
    /// An ignore rule could not be compiled.
    ///
    /// Rule set construction is atomic, so a single bad line fails the whole
    /// set.
    #[error("Pattern syntax error in {origin} line {line}: {message} (pattern: {pattern:?})")]
    PatternSyntax {
        /// Name of the source the rule came from (usually a file path).
        origin: String,
        /// 1-based line number within that source.
        line: usize,
        pattern: String,
        message: String,
    },

    /// The archive root does not exist.
    #[error("Path not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// A read, open, readlink or copy failed during traversal.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The archive writer rejected an open, add or close.
    #[error("Archive writer error: {operation} - {message}")]
    Writer { operation: String, message: String },

    /// An error from the zip container library.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The configuration file is structurally invalid.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The archive session was driven out of order (add before open, etc).
    #[error("Archive session error: {message}")]
    State { message: String },

    /// A filter or transformer asked for the walk to stop.
    #[error("Archive operation aborted: {reason}")]
    Aborted { reason: String },
}

impl Error {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a writer error for the given operation.
    pub fn writer(operation: &str, message: impl std::fmt::Display) -> Self {
        Error::Writer {
            operation: operation.to_string(),
            message: message.to_string(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
