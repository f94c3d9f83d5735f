//! # Error Types Module
//!
//! Error types for the resize pipeline and for startup configuration.
//! Gateway failures (Telegram API, downloads) stay as `anyhow::Error`.

use thiserror::Error;

use crate::dimensions::Dimensions;

/// Errors produced while turning a pending image into a resized document
#[derive(Debug, Error)]
pub enum ResizeError {
    /// Content type outside JPEG and PNG
    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),
    /// Requested side larger than the configured limit
    #[error("Requested dimensions {requested} exceed the {max_side}px limit")]
    TooLarge { requested: Dimensions, max_side: u32 },
    /// Resizing would need a working buffer larger than the pixel budget
    #[error("Resizing to {requested} needs {pixels} working pixels, over the budget of {max_pixels}")]
    TooManyPixels {
        requested: Dimensions,
        pixels: u64,
        max_pixels: u64,
    },
    /// Input bytes could not be decoded
    #[error("Image decode error: {0}")]
    Decode(#[source] image::ImageError),
    /// Resized image could not be re-encoded
    #[error("Image encode error: {0}")]
    Encode(#[source] image::ImageError),
    /// The blocking resize task panicked or was cancelled
    #[error("Resize task failed: {0}")]
    TaskFailed(String),
}

/// Errors raised while reading process configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing ${0} environment variable")]
    Missing(&'static str),
    #[error("Invalid value {value:?} for ${name}")]
    Invalid { name: &'static str, value: String },
}
