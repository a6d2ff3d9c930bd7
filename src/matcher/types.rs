use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CATEGORY_FIELD, DEFAULT_MIN_SCORE, DEFAULT_N_RESULTS, JOBS_COLLECTION, RESUMES_COLLECTION,
};
use crate::scoring::SimilarityTransform;
use crate::vectordb::{IndexHit, Metadata};

/// One ranked hit returned by the matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// `resume_<id>` for resumes; the job's `job_index` (its CSV row) for jobs.
    pub id: String,
    /// Original document text, for preview.
    pub text: String,
    /// Stored metadata, unchanged.
    pub metadata: Metadata,
    /// Raw cosine distance from the index.
    pub distance: f32,
    /// `transform(distance)`, in `[0, 1]`.
    pub similarity_score: f32,
}

impl SearchResult {
    /// Builds a result from an index hit. With `id_field` set, the id is read from that
    /// metadata field, falling back to the record id when the field is absent.
    pub(crate) fn from_hit(
        hit: IndexHit,
        transform: SimilarityTransform,
        id_field: Option<&str>,
    ) -> Self {
        let id = id_field
            .and_then(|field| hit.metadata.get(field))
            .map(|v| v.to_string())
            .unwrap_or(hit.id);

        Self {
            similarity_score: transform.apply(hit.distance),
            id,
            text: hit.text,
            metadata: hit.metadata,
            distance: hit.distance,
        }
    }

    /// Display title: `job_title` metadata when present, the id otherwise.
    pub fn title(&self) -> String {
        self.metadata
            .get("job_title")
            .map(|v| v.to_string())
            .unwrap_or_else(|| self.id.clone())
    }

    /// First `max_chars` characters of the text.
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.text.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.text[..idx],
            None => &self.text,
        }
    }
}

/// Result count and similarity floor for a match query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Maximum number of results (must be positive).
    pub n_results: usize,
    /// Results scoring below this are dropped (must be within `[0, 1]`).
    pub min_score: f32,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            n_results: DEFAULT_N_RESULTS,
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

impl MatchOptions {
    pub fn new(n_results: usize, min_score: f32) -> Self {
        Self {
            n_results,
            min_score,
        }
    }

    pub fn with_n_results(mut self, n_results: usize) -> Self {
        self.n_results = n_results;
        self
    }

    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }
}

/// Collection layout and scoring used by [`CareerCoachMatcher`](super::CareerCoachMatcher).
#[derive(Debug, Clone, PartialEq)]
pub struct MatcherConfig {
    pub resumes_collection: String,
    pub jobs_collection: String,
    /// Resume metadata field holding the category.
    pub category_field: String,
    pub transform: SimilarityTransform,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            resumes_collection: RESUMES_COLLECTION.to_string(),
            jobs_collection: JOBS_COLLECTION.to_string(),
            category_field: CATEGORY_FIELD.to_string(),
            transform: SimilarityTransform::default(),
        }
    }
}

impl MatcherConfig {
    pub fn resumes_collection(mut self, name: impl Into<String>) -> Self {
        self.resumes_collection = name.into();
        self
    }

    pub fn jobs_collection(mut self, name: impl Into<String>) -> Self {
        self.jobs_collection = name.into();
        self
    }

    pub fn transform(mut self, transform: SimilarityTransform) -> Self {
        self.transform = transform;
        self
    }
}

/// Point-in-time database summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbStats {
    pub total_resumes: u64,
    pub total_jobs: u64,
    pub resume_categories: BTreeMap<String, u64>,
    pub embedding_model: String,
    pub embedding_dimension: usize,
}
