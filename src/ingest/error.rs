use std::path::PathBuf;

use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::vectordb::VectorDbError;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV is missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("vector index error: {0}")]
    Index(#[from] VectorDbError),

    #[error("embedder returned {actual} vectors for a batch of {expected}")]
    BatchMismatch { expected: usize, actual: usize },
}
