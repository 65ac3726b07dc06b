//! Error types for segmentation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the segmentation pipeline and its I/O collaborators.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Scale parameter k must be positive and finite, got {0}")]
    InvalidScale(f64),

    #[error("Smoothing sigma must be positive and finite, got {0}")]
    InvalidSigma(f64),

    #[error("Smoothing filter size must be between 1 and 1025, got {0}")]
    InvalidFilterSize(usize),

    #[error("Search slack epsilon must be non-negative and finite, got {0}")]
    InvalidEpsilon(f64),

    #[error("Neighbor count must be positive")]
    InvalidNeighborCount,

    #[error("Image has zero width or height ({width}x{height})")]
    EmptyImage { width: usize, height: usize },

    #[error("Row {row} has {actual} pixels, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Index {index} is out of range for {len} elements")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write report '{path}': {source}")]
    WriteReport {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read config '{path}': {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config '{path}': {source}")]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Checks `index < len`, the precondition of every index-taking operation.
#[inline]
pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(Error::IndexOutOfRange { index, len })
    }
}
