//! Career-match library crate (used by the `career-match` binary and integration tests).
//!
//! Embeds resumes and job descriptions into one vector space and answers similarity queries
//! in both directions: best jobs for a resume, best resumes for a job.
//!
//! # Public API Surface
//!
//! ## Matching
//! - [`CareerCoachMatcher`] - the query façade, generic over its collaborators
//! - [`SearchResult`], [`MatchOptions`], [`MatcherConfig`], [`DbStats`], [`MatchError`]
//! - [`SimilarityTransform`] - distance → similarity mapping shared by both directions
//!
//! ## Collaborators
//! - [`TextEmbedder`], [`MiniLmEmbedder`], [`MiniLmConfig`] - sentence embeddings (candle)
//! - [`VectorIndex`], [`QdrantIndex`] - nearest-neighbour search with metadata filters
//!
//! ## Ingestion & Serving
//! - [`Ingestor`], [`IngestReport`] - batched CSV ingestion
//! - [`gateway`] - Axum router exposing the matcher over HTTP
//! - [`Config`] - `CAREER_*` environment configuration
//!
//! ## Test/Mock Support
//! `MockVectorIndex` is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod hashing;
pub mod ingest;
pub mod matcher;
pub mod scoring;
pub mod vectordb;

pub use config::{Config, ConfigError};
pub use constants::{DimValidationError, validate_embedding_dim};
pub use embedding::{EmbeddingError, MiniLmConfig, MiniLmEmbedder, TextEmbedder};
pub use hashing::{hash_to_u64, point_id_for_record};
pub use ingest::{IngestError, IngestReport, Ingestor};
pub use matcher::{
    CareerCoachMatcher, DbStats, MatchError, MatchOptions, MatcherConfig, SearchResult,
    job_query_text,
};
pub use scoring::{ScoringError, SimilarityTransform};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockVectorIndex;
pub use vectordb::{
    IndexHit, IndexRecord, Metadata, MetadataFilter, MetadataValue, QdrantIndex, VectorDbError,
    VectorIndex,
};
