use std::path::PathBuf;

use crate::embedding::error::EmbeddingError;

/// Default output dimension.
pub const MINILM_EMBEDDING_DIM: usize = crate::constants::DEFAULT_EMBEDDING_DIM;

/// Default max sequence length.
pub const MINILM_MAX_SEQ_LEN: usize = crate::constants::DEFAULT_MAX_SEQ_LEN;

/// Configuration for [`MiniLmEmbedder`](super::MiniLmEmbedder).
#[derive(Debug, Clone)]
pub struct MiniLmConfig {
    /// Directory holding `config.json`, `model.safetensors` and `tokenizer.json`.
    pub model_dir: PathBuf,
    /// Max tokens to consider.
    pub max_seq_len: usize,
    /// Expected output embedding dimension.
    pub embedding_dim: usize,
    /// Model identifier reported in stats.
    pub model_id: String,
    /// If true, run in deterministic stub mode (no model files required).
    pub testing_stub: bool,
}

impl Default for MiniLmConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::new(),
            max_seq_len: MINILM_MAX_SEQ_LEN,
            embedding_dim: MINILM_EMBEDDING_DIM,
            model_id: crate::constants::DEFAULT_EMBEDDING_MODEL.to_string(),
            testing_stub: false,
        }
    }
}

impl MiniLmConfig {
    /// Creates a config for a model directory.
    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: model_dir.into(),
            ..Default::default()
        }
    }

    /// Creates a stub config (no model files; lexical feature-hashing embeddings).
    pub fn stub() -> Self {
        Self {
            model_id: crate::constants::STUB_EMBEDDING_MODEL.to_string(),
            testing_stub: true,
            ..Default::default()
        }
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_embedding_dim(mut self, embedding_dim: usize) -> Self {
        self.embedding_dim = embedding_dim;
        self
    }

    /// Validates required fields for the configured mode.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.embedding_dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedding_dim must be positive".to_string(),
            });
        }

        if self.testing_stub {
            return Ok(());
        }

        if self.model_dir.as_os_str().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model_dir is required (stubbing is disabled)".to_string(),
            });
        }

        if !self.model_dir.is_dir() {
            return Err(EmbeddingError::ModelNotFound {
                path: self.model_dir.clone(),
            });
        }

        for file in ["config.json", "model.safetensors", "tokenizer.json"] {
            let path = self.model_dir.join(file);
            if !path.exists() {
                return Err(EmbeddingError::ModelNotFound { path });
            }
        }

        Ok(())
    }
}
