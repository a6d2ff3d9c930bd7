//! Defaults shared by ingestion, matching and the server.
//!
//! # Embedding-space invariants
//!
//! Ingestion and querying must use the same model and dimension, otherwise cosine distances
//! between stored records and queries are meaningless. The values here are the defaults both
//! sides agree on; use [`validate_embedding_dim`] at module boundaries to catch mismatches early.

/// Output dimension of the default sentence embedder.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Identifier of the default sentence embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";

/// Model identifier reported by the feature-hashing stub embedder.
pub const STUB_EMBEDDING_MODEL: &str = "stub-feature-hash";

/// Max tokens fed to the embedder per text.
pub const DEFAULT_MAX_SEQ_LEN: usize = 256;

pub const RESUMES_COLLECTION: &str = "resumes";
pub const JOBS_COLLECTION: &str = "job_descriptions";

/// Metadata field used for the resume category filter.
pub const CATEGORY_FIELD: &str = "category";

/// Metadata field holding a job's row number; job hits are reported under it.
pub const JOB_INDEX_FIELD: &str = "job_index";

/// Category bucket for resumes stored without a category.
pub const UNKNOWN_CATEGORY: &str = "unknown";

pub const DEFAULT_N_RESULTS: usize = 10;
pub const DEFAULT_MIN_SCORE: f32 = 0.5;

/// Records embedded and upserted per ingestion round-trip.
pub const INGEST_BATCH_SIZE: usize = 32;

/// Resumes with less trimmed text than this are not ingested.
pub const MIN_RESUME_TEXT_LEN: usize = 20;

/// Job titles are truncated to this many characters in metadata.
pub const JOB_TITLE_METADATA_LEN: usize = 100;

/// An embedder whose output width disagrees with the stored vectors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DimValidationError {
    #[error("embedding width is zero")]
    ZeroDimension,
    #[error("embedding width {actual} does not match the expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Checks an embedder's output width against the width the index was built with.
///
/// # Example
///
/// ```
/// use career_match::constants::{validate_embedding_dim, DEFAULT_EMBEDDING_DIM};
///
/// let model_hidden_size = 384;
/// validate_embedding_dim(model_hidden_size, DEFAULT_EMBEDDING_DIM).unwrap();
/// ```
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if actual == 0 {
        return Err(DimValidationError::ZeroDimension);
    }
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_width_passes() {
        assert!(validate_embedding_dim(384, DEFAULT_EMBEDDING_DIM).is_ok());
    }

    #[test]
    fn test_zero_width_rejected() {
        assert_eq!(
            validate_embedding_dim(0, 384),
            Err(DimValidationError::ZeroDimension)
        );
    }

    #[test]
    fn test_mismatched_width_rejected() {
        assert_eq!(
            validate_embedding_dim(768, 384),
            Err(DimValidationError::DimensionMismatch {
                expected: 384,
                actual: 768
            })
        );
    }

    #[test]
    fn test_dim_error_mentions_both_widths() {
        let err = DimValidationError::DimensionMismatch {
            expected: 384,
            actual: 768,
        };
        assert!(err.to_string().contains("384"));
        assert!(err.to_string().contains("768"));
    }

    #[test]
    fn test_defaults_are_in_range() {
        assert!((0.0..=1.0).contains(&DEFAULT_MIN_SCORE));
        assert!(DEFAULT_N_RESULTS > 0);
    }
}
