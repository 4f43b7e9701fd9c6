//! Application error types.

use std::path::PathBuf;

use thiserror::Error;

/// Application-level errors for docket-diff.
#[derive(Error, Debug)]
pub enum AppError {
    // Corpus errors
    #[error("Input directory not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Failed to scan input directory {path}: {message}")]
    Scan { path: PathBuf, message: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Text source errors
    #[error(transparent)]
    Source(#[from] SourceError),

    // Report errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Tagging errors
    #[error("Invalid rule pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    // Config errors
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl AppError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }

    /// Stable code used in structured log fields.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InputNotFound(_) => "INPUT_NOT_FOUND",
            AppError::Scan { .. } => "SCAN_ERROR",
            AppError::Io { .. } => "IO_ERROR",
            AppError::Source(_) => "SOURCE_ERROR",
            AppError::Csv(_) => "CSV_ERROR",
            AppError::Json(_) => "JSON_ERROR",
            AppError::Pattern { .. } => "INVALID_PATTERN",
            AppError::Config(_) => "CONFIG_ERROR",
        }
    }
}

/// Failure of a single pair comparison.
///
/// These never abort a run; the pair is logged and left out of the reports.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiffError {
    #[error("Document {side} has {tokens} tokens, above the limit of {limit}")]
    TooManyTokens {
        side: &'static str,
        tokens: usize,
        limit: usize,
    },

    #[error("Failed to write pair report: {0}")]
    Report(String),
}

/// Errors raised by a text source while extracting document text.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Unsupported document type: {0}")]
    Unsupported(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write cache entry {path}: {source}")]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
