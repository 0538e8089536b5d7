//! Error types for the bikit dataset adapters.

use thiserror::Error;

/// Main error type for bikit.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding error
    #[error("Image processing error: {0}")]
    Image(String),

    /// CSV manifest could not be parsed
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// Dataset name is not present in the registry
    #[error("Dataset '{name}' does not exist. Use one of: {available}")]
    NameNotFound { name: String, available: String },

    /// Index outside `[0, len)`
    #[error("Index {index} out of range for dataset of size {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid argument error
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Not found error
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Manifest(err.to_string())
    }
}

/// Specialized Result type for bikit operations.
pub type Result<T> = std::result::Result<T, Error>;
