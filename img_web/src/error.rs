//! Error types
//!
//! `BatchError` stops a whole batch before any file is touched.
//! `CodecError` is scoped to one file and becomes a failed `FileOutcome`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Invalid job configuration: {0}")]
    Config(String),

    #[error("No images found in {}", dir.display())]
    NoInput { dir: PathBuf },

    #[error("Cannot read source folder {}: {source}", path.display())]
    SourceDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to start batch worker: {0}")]
    Worker(#[source] std::io::Error),

    #[error("Batch worker panicked")]
    WorkerPanicked,
}

impl BatchError {
    pub(crate) fn config(message: &str) -> Self {
        BatchError::Config(message.to_string())
    }
}

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("cannot decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cannot resize to {width}x{height}: resized height would be zero")]
    Resize { width: u32, height: u32 },

    #[error("cannot encode {}: {reason}", path.display())]
    Encode { path: PathBuf, reason: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, BatchError>;
