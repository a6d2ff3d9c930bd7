use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::RwLock;

use crate::vectordb::{
    IndexHit, IndexRecord, Metadata, MetadataFilter, VectorDbError, VectorIndex,
};

const MOCK_URL: &str = "memory://mock";

/// In-memory [`VectorIndex`] with exact cosine search.
///
/// Records are kept ordered by id, so equal distances always come back in the same order.
#[derive(Default)]
pub struct MockVectorIndex {
    collections: RwLock<BTreeMap<String, MockCollection>>,
    unavailable: AtomicBool,
    query_calls: AtomicUsize,
}

#[derive(Default, Clone)]
struct MockCollection {
    vector_size: u64,
    records: BTreeMap<String, MockStoredRecord>,
}

#[derive(Clone)]
struct MockStoredRecord {
    vector: Vec<f32>,
    text: String,
    metadata: Metadata,
}

impl MockVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_count(&self, collection: &str) -> Option<usize> {
        self.collections
            .read()
            .get(collection)
            .map(|c| c.records.len())
    }

    /// Makes every subsequent call fail as if the backend were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `query` calls served so far.
    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), VectorDbError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(VectorDbError::ConnectionFailed {
                url: MOCK_URL.to_string(),
                message: "index marked unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl VectorIndex for MockVectorIndex {
    async fn health_check(&self) -> Result<(), VectorDbError> {
        self.check_available()
    }

    async fn ensure_collection(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        self.check_available()?;

        self.collections
            .write()
            .entry(name.to_string())
            .or_insert(MockCollection {
                vector_size,
                records: BTreeMap::new(),
            });

        Ok(())
    }

    async fn upsert(
        &self,
        collection: &str,
        records: Vec<IndexRecord>,
    ) -> Result<(), VectorDbError> {
        self.check_available()?;

        let mut collections = self.collections.write();
        let coll =
            collections
                .get_mut(collection)
                .ok_or_else(|| VectorDbError::CollectionNotFound {
                    collection: collection.to_string(),
                })?;

        for record in records {
            if record.vector.len() as u64 != coll.vector_size {
                return Err(VectorDbError::InvalidDimension {
                    expected: coll.vector_size as usize,
                    actual: record.vector.len(),
                });
            }

            coll.records.insert(
                record.id,
                MockStoredRecord {
                    vector: record.vector,
                    text: record.text,
                    metadata: record.metadata,
                },
            );
        }

        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: u64,
        filter: Option<MetadataFilter>,
    ) -> Result<Vec<IndexHit>, VectorDbError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let collections = self.collections.read();
        let Some(coll) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        if vector.len() as u64 != coll.vector_size {
            return Err(VectorDbError::InvalidDimension {
                expected: coll.vector_size as usize,
                actual: vector.len(),
            });
        }

        let mut hits: Vec<IndexHit> = coll
            .records
            .iter()
            .filter(|(_, r)| filter.as_ref().is_none_or(|f| f.matches(&r.metadata)))
            .map(|(id, r)| IndexHit {
                id: id.clone(),
                text: r.text.clone(),
                metadata: r.metadata.clone(),
                distance: cosine_distance(&vector, &r.vector),
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(limit as usize);
        Ok(hits)
    }

    async fn scan_metadata(&self, collection: &str) -> Result<Vec<Metadata>, VectorDbError> {
        self.check_available()?;

        Ok(self
            .collections
            .read()
            .get(collection)
            .map(|c| c.records.values().map(|r| r.metadata.clone()).collect())
            .unwrap_or_default())
    }

    async fn count(&self, collection: &str) -> Result<u64, VectorDbError> {
        self.check_available()?;

        Ok(self
            .collections
            .read()
            .get(collection)
            .map(|c| c.records.len() as u64)
            .unwrap_or(0))
    }
}

/// Cosine distance in `[0, 2]`; `1.0` when either vector has zero norm.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 1.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        1.0
    } else {
        (1.0 - dot_product / (norm_a * norm_b)).clamp(0.0, 2.0)
    }
}
