//! Ingest → match flows over the in-memory index.

mod common;

use std::io::Write;

use career_match::{
    Ingestor, MatchError, MatchOptions, MatcherConfig, SimilarityTransform, TextEmbedder,
    VectorIndex,
};
use tempfile::NamedTempFile;

use common::fixtures::{
    CLOUD_RESUME, JOB_ROWS_VALID, JOBS_CSV, RESUME_ROWS_VALID, RESUMES_CSV, empty_matcher,
    seeded_matcher, seeded_matcher_with, stub_embedder,
};

fn everything() -> MatchOptions {
    MatchOptions::new(50, 0.0)
}

#[tokio::test]
async fn test_cloud_resume_ranks_cloud_engineer_above_cashier() {
    let matcher = seeded_matcher().await;

    let results = matcher
        .find_jobs_for_resume(CLOUD_RESUME, everything())
        .await
        .unwrap();

    let position = |title: &str| results.iter().position(|r| r.title() == title);
    let cloud = position("Cloud Engineer").expect("cloud engineer should be returned");
    let cashier = position("Retail Cashier").expect("cashier should be returned");

    assert_eq!(cloud, 0);
    assert!(cloud < cashier);
    assert!(results[cloud].similarity_score > results[cashier].similarity_score);
}

#[tokio::test]
async fn test_job_query_finds_matching_resume_first() {
    let matcher = seeded_matcher().await;

    let results = matcher
        .find_resumes_for_job(
            "Financial Analyst",
            "Budgets, forecasting models and variance reporting.",
            None,
            MatchOptions::new(3, 0.0),
        )
        .await
        .unwrap();

    assert_eq!(results[0].id, "resume_10003");
    assert_eq!(
        results[0].metadata.get("category").map(|v| v.to_string()),
        Some("FINANCE".to_string())
    );
}

#[tokio::test]
async fn test_category_filter_is_applied_before_top_k() {
    let matcher = seeded_matcher().await;

    let results = matcher
        .find_resumes_for_job(
            "Cloud Engineer",
            "AWS, Kubernetes, Terraform",
            Some("RETAIL"),
            MatchOptions::new(1, 0.0),
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "resume_10004");
}

#[tokio::test]
async fn test_filter_matching_nothing_is_empty() {
    let matcher = seeded_matcher().await;

    let results = matcher
        .find_resumes_for_job("Nurse", "Patient care", Some("HEALTHCARE"), everything())
        .await
        .unwrap();

    assert!(results.is_empty());
}

#[tokio::test]
async fn test_thresholds_hold_across_option_grid() {
    let matcher = seeded_matcher().await;

    for n_results in [1, 2, 3, 10] {
        for min_score in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let options = MatchOptions::new(n_results, min_score);
            let results = matcher
                .find_jobs_for_resume(CLOUD_RESUME, options)
                .await
                .unwrap();

            assert!(results.len() <= n_results);
            for r in &results {
                assert!(r.similarity_score >= min_score);
                assert!((0.0..=1.0).contains(&r.similarity_score));
            }
            for pair in results.windows(2) {
                assert!(pair[0].similarity_score >= pair[1].similarity_score);
            }
        }
    }
}

#[tokio::test]
async fn test_identical_queries_return_identical_results() {
    let matcher = seeded_matcher().await;

    let a = matcher
        .find_jobs_for_resume(CLOUD_RESUME, everything())
        .await
        .unwrap();
    let b = matcher
        .find_jobs_for_resume(CLOUD_RESUME, everything())
        .await
        .unwrap();

    assert_eq!(a, b);
}

#[tokio::test]
async fn test_invalid_inputs_fail_without_querying() {
    let matcher = seeded_matcher().await;

    for options in [
        MatchOptions::new(0, 0.5),
        MatchOptions::new(5, -0.5),
        MatchOptions::new(5, 1.01),
    ] {
        let err = matcher
            .find_jobs_for_resume(CLOUD_RESUME, options)
            .await
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    let err = matcher
        .find_jobs_for_resume("", MatchOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, MatchError::EmptyQuery));

    assert_eq!(matcher.index().query_calls(), 0);
}

#[tokio::test]
async fn test_stats_match_ingested_rows() {
    let matcher = seeded_matcher().await;

    let stats = matcher.get_db_stats().await.unwrap();

    assert_eq!(stats.total_jobs, JOB_ROWS_VALID as u64);
    assert_eq!(stats.total_resumes, RESUME_ROWS_VALID as u64);
    assert_eq!(
        stats.resume_categories.values().sum::<u64>(),
        stats.total_resumes
    );
    assert_eq!(stats.resume_categories.get("unknown"), Some(&1));
    assert_eq!(stats.resume_categories.get("FINANCE"), Some(&1));
    assert_eq!(stats.embedding_dimension, matcher.embedder().dimension());
    assert_eq!(stats.embedding_model, "stub-feature-hash");
}

#[tokio::test]
async fn test_categories_are_sorted() {
    let matcher = seeded_matcher().await;

    let categories = matcher.get_all_categories().await.unwrap();

    let mut sorted = categories.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(categories, sorted);
    assert_eq!(
        categories,
        vec!["FINANCE", "HR", "INFORMATION-TECHNOLOGY", "RETAIL", "unknown"]
    );
}

#[tokio::test]
async fn test_empty_index_answers_empty() {
    let matcher = empty_matcher();

    assert!(
        matcher
            .find_resumes_for_job("Cloud Engineer", "AWS", Some("HR"), everything())
            .await
            .unwrap()
            .is_empty()
    );

    let stats = matcher.get_db_stats().await.unwrap();
    assert_eq!(stats.total_jobs, 0);
    assert!(stats.resume_categories.is_empty());
}

#[tokio::test]
async fn test_half_cosine_keeps_ranking() {
    let default = seeded_matcher().await;
    let half = seeded_matcher_with(
        MatcherConfig::default().transform(SimilarityTransform::HalfCosine),
    )
    .await;

    let a = default
        .find_jobs_for_resume(CLOUD_RESUME, everything())
        .await
        .unwrap();
    let b = half
        .find_jobs_for_resume(CLOUD_RESUME, everything())
        .await
        .unwrap();

    let ids = |rs: &[career_match::SearchResult]| rs.iter().map(|r| r.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(a.as_slice()), ids(b.as_slice()));
    for (x, y) in a.iter().zip(&b) {
        assert!(y.similarity_score >= x.similarity_score);
    }
}

#[tokio::test]
async fn test_csv_files_on_disk() {
    let mut jobs = NamedTempFile::new().unwrap();
    jobs.write_all(JOBS_CSV.as_bytes()).unwrap();
    let mut resumes = NamedTempFile::new().unwrap();
    resumes.write_all(RESUMES_CSV.as_bytes()).unwrap();

    let index = std::sync::Arc::new(career_match::MockVectorIndex::new());
    let ingestor = Ingestor::new(stub_embedder(), std::sync::Arc::clone(&index));

    let job_report = ingestor.ingest_jobs_csv(jobs.path(), "jobs").await.unwrap();
    let resume_report = ingestor
        .ingest_resumes_csv(resumes.path(), "resumes")
        .await
        .unwrap();

    assert_eq!(job_report.ingested, JOB_ROWS_VALID);
    assert_eq!(job_report.skipped, 2);
    assert_eq!(resume_report.ingested, RESUME_ROWS_VALID);
    assert_eq!(resume_report.skipped, 1);
    assert_eq!(index.count("jobs").await.unwrap(), JOB_ROWS_VALID as u64);
}
