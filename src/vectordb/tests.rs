use std::collections::HashMap;

use qdrant_client::qdrant::{ScoredPoint, Value};

use super::client::VectorIndex;
use super::error::VectorDbError;
use super::mock::{MockVectorIndex, cosine_distance};
use super::model::{
    IndexHit, IndexRecord, Metadata, MetadataFilter, MetadataValue, PAYLOAD_DOCUMENT,
    PAYLOAD_RECORD_ID, split_payload,
};

const TEST_COLLECTION: &str = "test_collection";
const TEST_VECTOR_SIZE: u64 = 4;

fn record(id: &str, vector: [f32; 4], category: &str) -> IndexRecord {
    IndexRecord::new(id, vector.to_vec(), format!("text of {}", id))
        .with_metadata("category", category)
}

async fn seeded_index() -> MockVectorIndex {
    let index = MockVectorIndex::new();
    index
        .ensure_collection(TEST_COLLECTION, TEST_VECTOR_SIZE)
        .await
        .unwrap();
    index
        .upsert(
            TEST_COLLECTION,
            vec![
                record("a", [1.0, 0.0, 0.0, 0.0], "IT"),
                record("b", [0.9, 0.1, 0.0, 0.0], "HR"),
                record("c", [0.0, 1.0, 0.0, 0.0], "IT"),
                record("d", [0.0, 0.0, 1.0, 0.0], "FINANCE"),
            ],
        )
        .await
        .unwrap();
    index
}

#[tokio::test]
async fn test_ensure_collection_idempotent() {
    let index = MockVectorIndex::new();

    index
        .ensure_collection(TEST_COLLECTION, TEST_VECTOR_SIZE)
        .await
        .unwrap();
    index
        .ensure_collection(TEST_COLLECTION, TEST_VECTOR_SIZE)
        .await
        .unwrap();

    assert_eq!(index.record_count(TEST_COLLECTION), Some(0));
}

#[tokio::test]
async fn test_upsert_replaces_existing_id() {
    let index = seeded_index().await;

    index
        .upsert(
            TEST_COLLECTION,
            vec![IndexRecord::new("a", vec![0.0, 0.0, 0.0, 1.0], "rewritten")],
        )
        .await
        .unwrap();

    assert_eq!(index.record_count(TEST_COLLECTION), Some(4));
    let hits = index
        .query(TEST_COLLECTION, vec![0.0, 0.0, 0.0, 1.0], 1, None)
        .await
        .unwrap();
    assert_eq!(hits[0].id, "a");
    assert_eq!(hits[0].text, "rewritten");
}

#[tokio::test]
async fn test_upsert_into_missing_collection_fails() {
    let index = MockVectorIndex::new();
    let result = index
        .upsert("nope", vec![IndexRecord::new("x", vec![1.0; 4], "x")])
        .await;

    assert!(matches!(
        result,
        Err(VectorDbError::CollectionNotFound { .. })
    ));
}

#[tokio::test]
async fn test_upsert_dimension_mismatch() {
    let index = MockVectorIndex::new();
    index
        .ensure_collection(TEST_COLLECTION, TEST_VECTOR_SIZE)
        .await
        .unwrap();

    let result = index
        .upsert(TEST_COLLECTION, vec![IndexRecord::new("x", vec![1.0; 3], "x")])
        .await;

    assert!(matches!(
        result,
        Err(VectorDbError::InvalidDimension {
            expected: 4,
            actual: 3
        })
    ));
}

#[tokio::test]
async fn test_query_orders_by_distance() {
    let index = seeded_index().await;

    let hits = index
        .query(TEST_COLLECTION, vec![1.0, 0.0, 0.0, 0.0], 10, None)
        .await
        .unwrap();

    let ids: Vec<_> = hits.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids[0], "a");
    assert_eq!(ids[1], "b");
    assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
    assert!(hits[0].distance.abs() < 1e-6);
}

#[tokio::test]
async fn test_query_respects_limit() {
    let index = seeded_index().await;
    let hits = index
        .query(TEST_COLLECTION, vec![1.0, 0.0, 0.0, 0.0], 2, None)
        .await
        .unwrap();
    assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn test_filter_applies_before_limit() {
    let index = seeded_index().await;

    // "a" and "b" are the two nearest overall; restricted to IT the top two are "a" and "c".
    let hits = index
        .query(
            TEST_COLLECTION,
            vec![1.0, 0.0, 0.0, 0.0],
            2,
            Some(MetadataFilter::equals("category", "IT")),
        )
        .await
        .unwrap();

    let ids: Vec<_> = hits.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
}

#[tokio::test]
async fn test_filter_without_matches_is_empty() {
    let index = seeded_index().await;
    let hits = index
        .query(
            TEST_COLLECTION,
            vec![1.0, 0.0, 0.0, 0.0],
            5,
            Some(MetadataFilter::equals("category", "LEGAL")),
        )
        .await
        .unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_query_missing_collection_is_empty() {
    let index = MockVectorIndex::new();
    let hits = index
        .query("missing", vec![1.0, 0.0, 0.0, 0.0], 5, None)
        .await
        .unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_query_dimension_mismatch() {
    let index = seeded_index().await;
    let result = index.query(TEST_COLLECTION, vec![1.0; 8], 5, None).await;
    assert!(matches!(result, Err(VectorDbError::InvalidDimension { .. })));
}

#[tokio::test]
async fn test_equal_distances_have_stable_order() {
    let index = MockVectorIndex::new();
    index
        .ensure_collection(TEST_COLLECTION, TEST_VECTOR_SIZE)
        .await
        .unwrap();
    index
        .upsert(
            TEST_COLLECTION,
            vec![
                record("z", [1.0, 0.0, 0.0, 0.0], "IT"),
                record("m", [1.0, 0.0, 0.0, 0.0], "IT"),
                record("b", [1.0, 0.0, 0.0, 0.0], "IT"),
            ],
        )
        .await
        .unwrap();

    let first = index
        .query(TEST_COLLECTION, vec![1.0, 0.0, 0.0, 0.0], 3, None)
        .await
        .unwrap();
    let second = index
        .query(TEST_COLLECTION, vec![1.0, 0.0, 0.0, 0.0], 3, None)
        .await
        .unwrap();

    assert_eq!(first, second);
    let ids: Vec<_> = first.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "m", "z"]);
}

#[tokio::test]
async fn test_scan_metadata_and_count() {
    let index = seeded_index().await;

    let metadata = index.scan_metadata(TEST_COLLECTION).await.unwrap();
    assert_eq!(metadata.len(), 4);
    assert_eq!(index.count(TEST_COLLECTION).await.unwrap(), 4);

    assert!(index.scan_metadata("missing").await.unwrap().is_empty());
    assert_eq!(index.count("missing").await.unwrap(), 0);
}

#[tokio::test]
async fn test_unavailable_index_fails_every_call() {
    let index = seeded_index().await;
    index.set_unavailable(true);

    assert!(index.health_check().await.is_err());
    assert!(matches!(
        index
            .query(TEST_COLLECTION, vec![1.0, 0.0, 0.0, 0.0], 1, None)
            .await,
        Err(VectorDbError::ConnectionFailed { .. })
    ));
    assert!(index.count(TEST_COLLECTION).await.is_err());

    index.set_unavailable(false);
    assert!(index.health_check().await.is_ok());
}

#[test]
fn test_cosine_distance_bounds() {
    assert!(cosine_distance(&[1.0, 0.0], &[1.0, 0.0]).abs() < 1e-6);
    assert!((cosine_distance(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-6);
    assert!((cosine_distance(&[1.0, 0.0], &[-1.0, 0.0]) - 2.0).abs() < 1e-6);
    assert_eq!(cosine_distance(&[0.0, 0.0], &[1.0, 0.0]), 1.0);
    assert_eq!(cosine_distance(&[1.0], &[1.0, 0.0]), 1.0);
}

#[test]
fn test_metadata_filter_matches_only_strings() {
    let mut metadata = Metadata::new();
    metadata.insert("category".to_string(), MetadataValue::from("HR"));
    metadata.insert("year".to_string(), MetadataValue::from(2024i64));

    assert!(MetadataFilter::equals("category", "HR").matches(&metadata));
    assert!(!MetadataFilter::equals("category", "hr").matches(&metadata));
    assert!(!MetadataFilter::equals("year", "2024").matches(&metadata));
    assert!(!MetadataFilter::equals("missing", "HR").matches(&metadata));
}

#[test]
fn test_metadata_value_json_shape() {
    let mut metadata = Metadata::new();
    metadata.insert("category".to_string(), "IT".into());
    metadata.insert("job_index".to_string(), 7i64.into());
    metadata.insert("score".to_string(), 0.25f64.into());
    metadata.insert("remote".to_string(), true.into());

    let json = serde_json::to_value(&metadata).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"category": "IT", "job_index": 7, "remote": true, "score": 0.25})
    );

    let back: Metadata = serde_json::from_value(json).unwrap();
    assert_eq!(back, metadata);
}

#[test]
fn test_payload_roundtrip_keeps_reserved_keys_out_of_metadata() {
    let (id, vector, payload) = IndexRecord::new("resume_42", vec![0.5; 4], "resume body")
        .with_metadata("category", "HR")
        .with_metadata("resume_id", "42")
        .into_payload();

    assert_eq!(id, "resume_42");
    assert_eq!(vector.len(), 4);
    assert!(payload.contains_key(PAYLOAD_RECORD_ID));
    assert!(payload.contains_key(PAYLOAD_DOCUMENT));

    let (id, text, metadata) = split_payload(payload).unwrap();
    assert_eq!(id, "resume_42");
    assert_eq!(text, "resume body");
    assert_eq!(metadata.len(), 2);
    assert_eq!(metadata["category"], MetadataValue::from("HR"));
}

#[test]
fn test_scored_point_score_becomes_distance() {
    let mut payload: HashMap<String, Value> = HashMap::new();
    payload.insert(PAYLOAD_RECORD_ID.to_string(), "job_3".into());
    payload.insert(PAYLOAD_DOCUMENT.to_string(), "Cloud Engineer. AWS".into());
    payload.insert("job_title".to_string(), "Cloud Engineer".into());

    let point = ScoredPoint {
        payload,
        score: 0.8,
        ..Default::default()
    };

    let hit = IndexHit::from_scored_point(point).unwrap();
    assert_eq!(hit.id, "job_3");
    assert!((hit.distance - 0.2).abs() < 1e-6);
    assert_eq!(hit.metadata["job_title"], MetadataValue::from("Cloud Engineer"));
}

#[test]
fn test_scored_point_without_record_id_is_skipped() {
    let point = ScoredPoint {
        score: 0.9,
        ..Default::default()
    };
    assert!(IndexHit::from_scored_point(point).is_none());
}
