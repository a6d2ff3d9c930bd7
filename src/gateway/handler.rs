use std::collections::BTreeMap;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};

use crate::embedding::TextEmbedder;
use crate::gateway::error::GatewayError;
use crate::gateway::state::HandlerState;
use crate::matcher::{DbStats, MatchOptions, SearchResult};
use crate::vectordb::VectorIndex;

#[derive(Debug, Clone, Deserialize)]
pub struct MatchJobsRequest {
    pub resume_text: String,
    #[serde(default)]
    pub n_results: Option<usize>,
    #[serde(default)]
    pub min_score: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchResumesRequest {
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub category_filter: Option<String>,
    #[serde(default)]
    pub n_results: Option<usize>,
    #[serde(default)]
    pub min_score: Option<f32>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub count: usize,
    pub results: Vec<SearchResult>,
}

impl From<Vec<SearchResult>> for MatchResponse {
    fn from(results: Vec<SearchResult>) -> Self {
        Self {
            count: results.len(),
            results,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryStatsResponse {
    pub total: u64,
    pub categories: BTreeMap<String, u64>,
}

fn options(n_results: Option<usize>, min_score: Option<f32>) -> MatchOptions {
    let defaults = MatchOptions::default();
    MatchOptions::new(
        n_results.unwrap_or(defaults.n_results),
        min_score.unwrap_or(defaults.min_score),
    )
}

/// Bodies are taken as raw JSON so schema errors get the same `{error, code}` shape as
/// every other failure.
fn parse_body<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, GatewayError> {
    serde_json::from_value(body)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))
}

#[instrument(skip(state, body))]
pub async fn match_jobs_handler<E, I>(
    State(state): State<HandlerState<E, I>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<MatchResponse>, GatewayError>
where
    E: TextEmbedder + 'static,
    I: VectorIndex + 'static,
{
    let request: MatchJobsRequest = parse_body(body)?;
    let options = options(request.n_results, request.min_score);

    let results = state
        .matcher
        .find_jobs_for_resume(&request.resume_text, options)
        .await?;
    debug!(count = results.len(), "Matched jobs for resume");

    Ok(Json(results.into()))
}

#[instrument(skip(state, body))]
pub async fn match_resumes_handler<E, I>(
    State(state): State<HandlerState<E, I>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<MatchResponse>, GatewayError>
where
    E: TextEmbedder + 'static,
    I: VectorIndex + 'static,
{
    let request: MatchResumesRequest = parse_body(body)?;
    let options = options(request.n_results, request.min_score);

    let results = state
        .matcher
        .find_resumes_for_job(
            &request.job_title,
            &request.job_description,
            request.category_filter.as_deref(),
            options,
        )
        .await?;
    debug!(count = results.len(), "Matched resumes for job");

    Ok(Json(results.into()))
}

#[instrument(skip(state))]
pub async fn categories_handler<E, I>(
    State(state): State<HandlerState<E, I>>,
) -> Result<Json<CategoriesResponse>, GatewayError>
where
    E: TextEmbedder + 'static,
    I: VectorIndex + 'static,
{
    let categories = state.matcher.get_all_categories().await?;
    Ok(Json(CategoriesResponse { categories }))
}

#[instrument(skip(state))]
pub async fn category_stats_handler<E, I>(
    State(state): State<HandlerState<E, I>>,
) -> Result<Json<CategoryStatsResponse>, GatewayError>
where
    E: TextEmbedder + 'static,
    I: VectorIndex + 'static,
{
    let categories = state.matcher.get_category_stats().await?;
    Ok(Json(CategoryStatsResponse {
        total: categories.values().sum(),
        categories,
    }))
}

#[instrument(skip(state))]
pub async fn db_stats_handler<E, I>(
    State(state): State<HandlerState<E, I>>,
) -> Result<Json<DbStats>, GatewayError>
where
    E: TextEmbedder + 'static,
    I: VectorIndex + 'static,
{
    Ok(Json(state.matcher.get_db_stats().await?))
}
