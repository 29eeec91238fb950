//! Error types for the doc2md library.
//!
//! Only orchestration-level failures are errors. Serialization, pretty
//! printing and validation never fail; malformed input degrades and
//! validation findings are returned as data.

use std::io;
use thiserror::Error;

/// Result type alias for doc2md operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input could not be identified as any known format.
    #[error("Unknown file format")]
    UnknownFormat,

    /// The format was detected but no extractor is registered for it.
    #[error("Unsupported format: no extractor registered for {0}")]
    UnsupportedFormat(String),

    /// An extractor failed to read the source.
    #[error("Extraction error ({format}): {message}")]
    Extract {
        /// Source format name
        format: String,
        /// Extractor message
        message: String,
    },

    /// The input holds no bytes.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// The input is larger than the configured limit.
    #[error("File too large: {name} is {size} bytes, limit is {limit} bytes")]
    FileTooLarge {
        name: String,
        size: u64,
        limit: u64,
    },

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML (de)serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The requested output encoding is not supported.
    #[error("Unsupported output encoding: {0}")]
    UnsupportedEncoding(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build an extractor error.
    pub fn extract(format: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Extract {
            format: format.into(),
            message: message.into(),
        }
    }
}
