//! Error types for the batch-watermark crate.

use std::path::PathBuf;

/// Errors that can occur while watermarking images.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input directory does not exist.
    #[error("Directory {} does not exist", .0.display())]
    InputDirMissing(PathBuf),

    /// The watermark file does not exist.
    #[error("Watermark file {} does not exist", .0.display())]
    WatermarkMissing(PathBuf),

    /// Opacity could not be parsed or lies outside `[0, 1]`.
    #[error("{0} must be between 0 and 1")]
    InvalidOpacity(String),

    /// An image has a zero dimension and cannot be laid out.
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error occurred while decoding or encoding an image.
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
