//! Error types for the benchmark and graph tooling.

use thiserror::Error;

/// Main error type for imagenet-bench operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or processing error
    #[error("Image error: {0}")]
    Image(String),

    /// Model construction or record loading error
    #[error("Model error: {0}")]
    Model(String),

    /// Transient failure while fetching pretrained weights
    #[error("Model fetch failed: {0}")]
    ModelFetch(String),

    /// The hub has no weights under the requested name
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Entry lookup failure in the catalog
    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid argument error
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Device error
    #[error("Device error: {0}")]
    Device(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

/// Specialized Result type for imagenet-bench operations.
pub type Result<T> = std::result::Result<T, Error>;
