//! Similarity scoring.
//!
//! Indexes report cosine *distance* (lower is closer). Callers reason in *similarity*
//! (higher is better, bounded to `[0, 1]`), and `min_score` thresholds are expressed in it.
//! [`SimilarityTransform`] is the single place where one becomes the other.

pub mod error;
pub mod transform;


pub use error::ScoringError;
pub use transform::SimilarityTransform;

/// Transform used unless configuration says otherwise.
pub const DEFAULT_SIMILARITY_TRANSFORM: SimilarityTransform = SimilarityTransform::OneMinusDistance;
