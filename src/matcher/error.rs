use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::vectordb::VectorDbError;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("query text is empty")]
    EmptyQuery,

    #[error("n_results must be positive, got {value}")]
    InvalidResultCount { value: usize },

    #[error("min_score must be within [0, 1], got {value}")]
    MinScoreOutOfRange { value: f32 },

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("vector index error: {0}")]
    Index(#[from] VectorDbError),
}

impl MatchError {
    /// `true` for errors raised before any embedding or index call.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            MatchError::EmptyQuery
                | MatchError::InvalidResultCount { .. }
                | MatchError::MinScoreOutOfRange { .. }
        )
    }
}
