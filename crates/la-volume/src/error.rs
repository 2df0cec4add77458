//! Error types for volume reading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while opening a volume or reading one of its slices.
#[derive(Debug, Error)]
pub enum VolumeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid NRRD header: {message}")]
    InvalidHeader { message: String },

    #[error("unsupported sample type '{0}'")]
    UnsupportedType(String),

    #[error("unsupported NRRD encoding '{0}' (only raw is supported)")]
    UnsupportedEncoding(String),

    #[error("slice {index} out of range for volume depth {depth}")]
    SliceOutOfRange { index: usize, depth: usize },

    #[error(
        "slice {index} has extent {width}x{height}, expected {expected_width}x{expected_height}"
    )]
    SliceShape {
        index: usize,
        width: usize,
        height: usize,
        expected_width: usize,
        expected_height: usize,
    },

    #[error("volume data truncated while reading slice {index}")]
    Truncated { index: usize },

    #[error("negative label {value} in slice {index}")]
    NegativeLabel { index: usize, value: i64 },

    #[error("image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("unsupported pixel format {format} in {path}")]
    UnsupportedPixelFormat { path: PathBuf, format: String },

    #[error("no PNG slices found in {0}")]
    EmptyStack(PathBuf),

    #[error("unknown volume format: {0}")]
    UnknownFormat(PathBuf),

    #[error(transparent)]
    Core(#[from] la_core::Error),
}

impl VolumeError {
    pub(crate) fn header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }
}
