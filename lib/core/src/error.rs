use std::path::PathBuf;
use thiserror::Error;

use crate::embedding::EmbeddingError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Query embedding dimension does not match dataset: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Dataset not found at '{}'. Run `networth generate` to create it first.", path.display())]
    DatasetNotFound { path: PathBuf },

    #[error("Dataset at '{}' is corrupt: {reason}", path.display())]
    DatasetCorrupt { path: PathBuf, reason: String },

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::DatasetCorrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
