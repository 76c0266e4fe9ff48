//! Error types for spectral frame extraction

use thiserror::Error;

use crate::stream::SourceError;

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Window length changed from {expected} to {requested} on the same stream")]
    InconsistentWindowLength { expected: usize, requested: usize },

    #[error("Upstream source failed: {0}")]
    Upstream(#[source] SourceError),

    #[error("Failed to assemble spectrogram: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

pub type Result<T> = std::result::Result<T, FrameError>;
