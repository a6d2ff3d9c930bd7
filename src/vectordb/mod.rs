//! Vector index integration (Qdrant, plus an in-memory index for tests).

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;

#[cfg(test)]
mod tests;

pub use client::{QdrantIndex, VectorIndex};
pub use error::VectorDbError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockVectorIndex, cosine_distance};
pub use model::{
    IndexHit, IndexRecord, Metadata, MetadataFilter, MetadataValue, PAYLOAD_DOCUMENT,
    PAYLOAD_RECORD_ID,
};

/// Default Qdrant gRPC endpoint.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
