use std::path::PathBuf;
use thiserror::Error;

use crate::constants::DimValidationError;

/// Failures while loading the sentence encoder or embedding text.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// A required model file (`config.json`, `tokenizer.json`, weights) is absent.
    #[error("missing model file {path}")]
    ModelNotFound { path: PathBuf },

    #[error("could not load sentence encoder: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("encoder forward pass failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("could not tokenize input: {reason}")]
    TokenizationFailed { reason: String },

    #[error("bad embedder settings: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    Dimension(#[from] DimValidationError),
}

impl From<candle_core::Error> for EmbeddingError {
    fn from(err: candle_core::Error) -> Self {
        Self::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for EmbeddingError {
    fn from(err: std::io::Error) -> Self {
        Self::ModelLoadFailed {
            reason: err.to_string(),
        }
    }
}
