//! Error types for interview-core
//!
//! Only the I/O edges (transcript files, config) can fail. Deriving a
//! projection from a transcript never returns an error.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the interview-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transcript file could not be read as a whole
    #[error("transcript error in {}: {message}", path.display())]
    Transcript { path: PathBuf, message: String },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Quick-reply selection that does not match an active suggestion
    #[error("suggestion error: {0}")]
    Suggestion(String),
}

/// Result type alias for interview-core
pub type Result<T> = std::result::Result<T, Error>;
