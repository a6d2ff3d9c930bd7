//! Text embedding.
//!
//! - [`TextEmbedder`] is the seam the matcher and ingestion depend on.
//! - [`minilm`] provides the candle-backed sentence embedder (with a stub mode).

/// BERT encoder used by the sentence embedder.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// Sentence embedder.
pub mod minilm;
/// Tokenizer loading and vector helpers.
pub mod utils;

pub use error::EmbeddingError;
pub use minilm::{MINILM_EMBEDDING_DIM, MINILM_MAX_SEQ_LEN, MiniLmConfig, MiniLmEmbedder};

/// Maps text to a fixed-length vector.
///
/// Implementations must be deterministic for a given model and must be the same model for
/// ingestion and querying; distances between vectors from different models are meaningless.
pub trait TextEmbedder: Send + Sync {
    /// Embeds a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embeds several texts, preserving order.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    /// Output vector length.
    fn dimension(&self) -> usize;

    /// Model identifier (reported in stats).
    fn model_id(&self) -> &str;

    /// `true` when no real model backs this embedder.
    fn is_stub(&self) -> bool {
        false
    }
}
