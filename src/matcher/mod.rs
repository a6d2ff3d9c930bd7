//! Resume ⇄ job similarity matching.
//!
//! [`CareerCoachMatcher`] embeds a query with the injected [`TextEmbedder`], asks the injected
//! [`VectorIndex`] for the nearest records of the *other* collection, turns distances into
//! similarity scores and drops anything below the caller's floor.
//!
//! Both directions use the same [`SimilarityTransform`](crate::scoring::SimilarityTransform),
//! so a `min_score` of 0.6 means the same thing whether the query is a resume or a job.

pub mod error;
pub mod types;


pub use error::MatchError;
pub use types::{DbStats, MatchOptions, MatcherConfig, SearchResult};

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::constants::{JOB_INDEX_FIELD, UNKNOWN_CATEGORY};
use crate::embedding::TextEmbedder;
use crate::vectordb::{MetadataFilter, VectorIndex};

/// Text a job is embedded as, both at ingestion and at query time.
pub fn job_query_text(job_title: &str, job_description: &str) -> String {
    format!("{}. {}", job_title.trim(), job_description.trim())
}

/// Similarity matcher over a resume collection and a job collection.
pub struct CareerCoachMatcher<E, I> {
    embedder: Arc<E>,
    index: Arc<I>,
    config: MatcherConfig,
}

impl<E, I> Clone for CareerCoachMatcher<E, I> {
    fn clone(&self) -> Self {
        Self {
            embedder: Arc::clone(&self.embedder),
            index: Arc::clone(&self.index),
            config: self.config.clone(),
        }
    }
}

impl<E, I> std::fmt::Debug for CareerCoachMatcher<E, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CareerCoachMatcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<E, I> CareerCoachMatcher<E, I>
where
    E: TextEmbedder,
    I: VectorIndex,
{
    pub fn new(embedder: Arc<E>, index: Arc<I>, config: MatcherConfig) -> Self {
        Self {
            embedder,
            index,
            config,
        }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    /// Best-matching jobs for a resume.
    #[instrument(skip(self, resume_text), fields(text_len = resume_text.len()))]
    pub async fn find_jobs_for_resume(
        &self,
        resume_text: &str,
        options: MatchOptions,
    ) -> Result<Vec<SearchResult>, MatchError> {
        validate(resume_text, &options)?;

        let collection = self.config.jobs_collection.clone();
        self.search(&collection, resume_text, None, Some(JOB_INDEX_FIELD), options)
            .await
    }

    /// Best-matching resumes for a job, optionally restricted to one category.
    ///
    /// The category restriction is evaluated by the index before the `n_results` cut, so the
    /// result is the top-K *within* the category. An empty category means no restriction.
    #[instrument(skip(self, job_title, job_description))]
    pub async fn find_resumes_for_job(
        &self,
        job_title: &str,
        job_description: &str,
        category_filter: Option<&str>,
        options: MatchOptions,
    ) -> Result<Vec<SearchResult>, MatchError> {
        if job_title.trim().is_empty() && job_description.trim().is_empty() {
            return Err(MatchError::EmptyQuery);
        }
        let query = job_query_text(job_title, job_description);
        validate(&query, &options)?;

        let filter = category_filter
            .filter(|c| !c.is_empty())
            .map(|c| MetadataFilter::equals(self.config.category_field.clone(), c));

        let collection = self.config.resumes_collection.clone();
        self.search(&collection, &query, filter, None, options).await
    }

    async fn search(
        &self,
        collection: &str,
        query: &str,
        filter: Option<MetadataFilter>,
        id_field: Option<&str>,
        options: MatchOptions,
    ) -> Result<Vec<SearchResult>, MatchError> {
        let vector = self.embedder.embed(query)?;

        let hits = self
            .index
            .query(collection, vector, options.n_results as u64, filter)
            .await?;
        let candidates = hits.len();

        let transform = self.config.transform;
        let mut results: Vec<SearchResult> = hits
            .into_iter()
            .map(|hit| SearchResult::from_hit(hit, transform, id_field))
            .filter(|r| r.similarity_score >= options.min_score)
            .collect();

        // Stable: equal scores keep the index's distance-ascending order.
        results.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
        results.truncate(options.n_results);

        debug!(
            collection,
            candidates,
            returned = results.len(),
            min_score = options.min_score,
            "Match query complete"
        );

        Ok(results)
    }

    /// Distinct resume categories, sorted.
    pub async fn get_all_categories(&self) -> Result<Vec<String>, MatchError> {
        let metadata = self
            .index
            .scan_metadata(&self.config.resumes_collection)
            .await?;

        let categories: BTreeSet<String> = metadata
            .iter()
            .filter_map(|m| m.get(&self.config.category_field))
            .map(|v| v.to_string())
            .collect();

        Ok(categories.into_iter().collect())
    }

    /// Resume count per category; resumes without one count as `"unknown"`.
    pub async fn get_category_stats(&self) -> Result<BTreeMap<String, u64>, MatchError> {
        let metadata = self
            .index
            .scan_metadata(&self.config.resumes_collection)
            .await?;

        let mut stats = BTreeMap::new();
        for m in &metadata {
            let category = m
                .get(&self.config.category_field)
                .map(|v| v.to_string())
                .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());
            *stats.entry(category).or_insert(0) += 1;
        }

        Ok(stats)
    }

    /// Collection sizes, category breakdown and embedder identity, computed now.
    pub async fn get_db_stats(&self) -> Result<DbStats, MatchError> {
        let total_resumes = self.index.count(&self.config.resumes_collection).await?;
        let total_jobs = self.index.count(&self.config.jobs_collection).await?;
        let resume_categories = self.get_category_stats().await?;

        Ok(DbStats {
            total_resumes,
            total_jobs,
            resume_categories,
            embedding_model: self.embedder.model_id().to_string(),
            embedding_dimension: self.embedder.dimension(),
        })
    }
}

fn validate(query: &str, options: &MatchOptions) -> Result<(), MatchError> {
    if query.trim().is_empty() {
        return Err(MatchError::EmptyQuery);
    }
    if options.n_results == 0 {
        return Err(MatchError::InvalidResultCount {
            value: options.n_results,
        });
    }
    if !(0.0..=1.0).contains(&options.min_score) {
        return Err(MatchError::MinScoreOutOfRange {
            value: options.min_score,
        });
    }
    Ok(())
}
