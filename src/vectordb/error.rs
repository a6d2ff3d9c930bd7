use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by vector index operations.
pub enum VectorDbError {
    /// Could not connect to the index endpoint.
    #[error("failed to connect to vector index at '{url}': {message}")]
    ConnectionFailed {
        /// Endpoint URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// Collection creation failed.
    #[error("failed to create collection '{collection}': {message}")]
    CreateCollectionFailed {
        /// Collection name.
        collection: String,
        /// Error message.
        message: String,
    },

    /// Collection does not exist (write paths only; reads treat it as empty).
    #[error("collection not found: {collection}")]
    CollectionNotFound {
        /// Collection name.
        collection: String,
    },

    /// Upsert failed.
    #[error("failed to upsert records to '{collection}': {message}")]
    UpsertFailed {
        /// Collection name.
        collection: String,
        /// Error message.
        message: String,
    },

    /// Nearest-neighbor query failed.
    #[error("failed to query '{collection}': {message}")]
    QueryFailed {
        /// Collection name.
        collection: String,
        /// Error message.
        message: String,
    },

    /// Metadata scan or count failed.
    #[error("failed to read '{collection}': {message}")]
    ReadFailed {
        /// Collection name.
        collection: String,
        /// Error message.
        message: String,
    },

    /// Vector dimension mismatch.
    #[error("invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },
}
