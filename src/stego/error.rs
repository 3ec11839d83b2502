//! Error type shared by every carrier.

use thiserror::Error;

/// Errors that can occur while embedding into or extracting from a carrier.
#[derive(Error, Debug)]
pub enum StegoError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Carrier too small: need {needed} slots, have {capacity}")]
    InsufficientCapacity { needed: usize, capacity: usize },

    #[error("No hidden message found (delimiter missing)")]
    NoDelimiterFound,

    #[error("Secret image too small to embed")]
    SecretTooSmall,

    #[error("Extracted data is not a valid embedded image")]
    InvalidEmbeddedImage,

    #[error("Image load error: {0}")]
    ImageLoad(String),

    #[error("Image save error: {0}")]
    ImageSave(String),

    #[error("Audio load error: {0}")]
    AudioLoad(String),

    #[error("Audio save error: {0}")]
    AudioSave(String),

    #[error("Video load error: {0}")]
    VideoLoad(String),

    #[error("Video save error: {0}")]
    VideoSave(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
