//! Sentence embedder (MiniLM / BERT family via candle).
//!
//! Use [`MiniLmConfig::stub`] for tests and model-less runs: the stub hashes word tokens into
//! the vector, so texts that share vocabulary still land close to each other.

/// Embedder configuration.
pub mod config;


pub use config::{MINILM_EMBEDDING_DIM, MINILM_MAX_SEQ_LEN, MiniLmConfig};

use candle_core::Device;
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::constants::validate_embedding_dim;
use crate::embedding::TextEmbedder;
use crate::embedding::bert::BertSentenceEncoder;
use crate::embedding::device::{device_label, select_device};
use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::{l2_normalize, load_tokenizer_with_truncation, word_tokens};
use crate::hashing::token_bucket;

enum EmbedderBackend {
    Model {
        encoder: BertSentenceEncoder,
        tokenizer: Tokenizer,
        device: Device,
    },
    Stub,
}

/// Sentence embedder producing L2-normalized vectors (supports stub mode).
pub struct MiniLmEmbedder {
    backend: EmbedderBackend,
    config: MiniLmConfig,
}

impl std::fmt::Debug for MiniLmEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiniLmEmbedder")
            .field(
                "backend",
                &match &self.backend {
                    EmbedderBackend::Model { device, .. } => {
                        format!("Model({})", device_label(device))
                    }
                    EmbedderBackend::Stub => "Stub".to_string(),
                },
            )
            .field("model_id", &self.config.model_id)
            .field("embedding_dim", &self.config.embedding_dim)
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl MiniLmEmbedder {
    /// Loads the embedder from a config (stub mode is supported).
    pub fn load(config: MiniLmConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        if config.testing_stub {
            warn!(
                embedding_dim = config.embedding_dim,
                "Embedder running in STUB mode (lexical hashing, no model)"
            );
            return Ok(Self {
                backend: EmbedderBackend::Stub,
                config,
            });
        }

        let device = select_device();
        debug!(device = device_label(&device), "Selected compute device for embedder");

        let encoder = BertSentenceEncoder::load(&config.model_dir, &device).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load BERT encoder: {}", e),
            }
        })?;
        validate_embedding_dim(encoder.hidden_size(), config.embedding_dim)?;

        let tokenizer = load_tokenizer_with_truncation(&config.model_dir, config.max_seq_len)
            .map_err(|e| EmbeddingError::TokenizationFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            })?;

        info!(
            model_dir = %config.model_dir.display(),
            model_id = %config.model_id,
            embedding_dim = config.embedding_dim,
            max_seq_len = config.max_seq_len,
            "Sentence embedder loaded"
        );

        Ok(Self {
            backend: EmbedderBackend::Model {
                encoder,
                tokenizer,
                device,
            },
            config,
        })
    }

    /// Shorthand for `load(MiniLmConfig::stub())`.
    pub fn stub() -> Result<Self, EmbeddingError> {
        Self::load(MiniLmConfig::stub())
    }

    fn embed_with_model(
        &self,
        text: &str,
        encoder: &BertSentenceEncoder,
        tokenizer: &Tokenizer,
        device: &Device,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        let ids = encoding.get_ids();
        if ids.is_empty() {
            return Ok(vec![0.0; self.config.embedding_dim]);
        }

        debug!(
            text_len = text.len(),
            token_count = ids.len(),
            "Generating embedding (encoder forward pass)"
        );

        let mut embedding = encoder
            .encode(ids, encoding.get_type_ids(), device)
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("Encoder forward pass failed: {}", e),
            })?;

        l2_normalize(&mut embedding);
        Ok(embedding)
    }

    fn embed_stub(&self, text: &str) -> Vec<f32> {
        let dim = self.config.embedding_dim;
        let mut embedding = vec![0.0f32; dim];

        for token in word_tokens(text) {
            let (bucket, sign) = token_bucket(&token, dim);
            embedding[bucket] += sign;
        }

        l2_normalize(&mut embedding);
        embedding
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EmbedderBackend::Stub)
    }

    /// Returns the embedder configuration.
    pub fn config(&self) -> &MiniLmConfig {
        &self.config
    }
}

impl TextEmbedder for MiniLmEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match &self.backend {
            EmbedderBackend::Model {
                encoder,
                tokenizer,
                device,
            } => self.embed_with_model(text, encoder, tokenizer, device),
            EmbedderBackend::Stub => Ok(self.embed_stub(text)),
        }
    }

    fn dimension(&self) -> usize {
        self.config.embedding_dim
    }

    fn model_id(&self) -> &str {
        &self.config.model_id
    }

    fn is_stub(&self) -> bool {
        MiniLmEmbedder::is_stub(self)
    }
}
