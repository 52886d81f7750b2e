//! Error types for the Room Revamp core library.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for core operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The selected file is not one of the accepted image types.
    #[error("Unsupported media type: {0} (accepted: image/jpeg, image/png, image/webp)")]
    UnsupportedMediaType(String),

    /// The selected file could not be turned into an image payload.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// Configuration could not be loaded or is incomplete.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

/// Failure while reading or encoding the selected image.
#[derive(Error, Debug)]
pub enum EncodingError {
    /// The underlying read failed.
    #[error("Failed to read image {}: {source}", path.display())]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// I/O error from the read.
        #[source]
        source: std::io::Error,
    },

    /// The file was readable but contained no bytes.
    #[error("Image {} is empty", .0.display())]
    Empty(PathBuf),

    /// A data URL was malformed, had an unaccepted media type, or carried
    /// an invalid base64 payload.
    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, CoreError>;
