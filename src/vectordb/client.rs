use qdrant_client::{Qdrant, QdrantError};
use qdrant_client::qdrant::{
    Condition, CountPointsBuilder, CreateCollectionBuilder, Distance, Filter, PointStruct,
    ScrollPointsBuilder, SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};
use tracing::debug;

use super::error::VectorDbError;
use super::model::{IndexHit, IndexRecord, Metadata, MetadataFilter, split_payload};
use crate::hashing::point_id_for_record;

/// Points fetched per scroll page when scanning metadata.
const SCROLL_PAGE_SIZE: u32 = 256;

/// gRPC `NOT_FOUND`, returned by Qdrant for reads against a missing collection.
const GRPC_NOT_FOUND: i32 = 5;

fn is_not_found_code(code: i32) -> bool {
    code == GRPC_NOT_FOUND
}

/// `true` when Qdrant rejected the request because the collection does not exist.
fn is_missing_collection(err: &QdrantError) -> bool {
    match err {
        QdrantError::ResponseError { status } => is_not_found_code(i32::from(status.code())),
        _ => false,
    }
}

/// Qdrant-backed [`VectorIndex`].
#[derive(Clone)]
pub struct QdrantIndex {
    client: Qdrant,
    url: String,
}

impl QdrantIndex {
    /// Creates a client for `url` (gRPC endpoint, e.g. `http://localhost:6334`).
    pub fn new(url: &str) -> Result<Self, VectorDbError> {
        let client =
            Qdrant::from_url(url)
                .build()
                .map_err(|e| VectorDbError::ConnectionFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Returns the configured URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Performs a basic health check request.
    pub async fn health_check(&self) -> Result<(), VectorDbError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Returns `true` if the collection exists.
    pub async fn collection_exists(&self, name: &str) -> Result<bool, VectorDbError> {
        self.client
            .collection_exists(name)
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })
    }

    /// Ensures a cosine-distance collection exists (creates it if missing).
    pub async fn ensure_collection(
        &self,
        name: &str,
        vector_size: u64,
    ) -> Result<(), VectorDbError> {
        if self.collection_exists(name).await? {
            return Ok(());
        }

        let vectors_config = VectorParamsBuilder::new(vector_size, Distance::Cosine);
        self.client
            .create_collection(
                CreateCollectionBuilder::new(name)
                    .vectors_config(vectors_config)
                    .on_disk_payload(true),
            )
            .await
            .map_err(|e| VectorDbError::CreateCollectionFailed {
                collection: name.to_string(),
                message: e.to_string(),
            })?;

        debug!(collection = name, vector_size, "Created collection");
        Ok(())
    }

    /// Upserts records; ids are hashed into point ids so re-ingesting overwrites.
    pub async fn upsert(
        &self,
        collection: &str,
        records: Vec<IndexRecord>,
    ) -> Result<(), VectorDbError> {
        if records.is_empty() {
            return Ok(());
        }

        let points: Vec<PointStruct> = records
            .into_iter()
            .map(|record| {
                let (id, vector, payload) = record.into_payload();
                PointStruct::new(point_id_for_record(collection, &id), vector, payload)
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, points).wait(true))
            .await
            .map_err(|e| VectorDbError::UpsertFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    /// Nearest-neighbor query, optionally restricted by a payload equality filter.
    ///
    /// The filter is evaluated by Qdrant before the `limit` cut. A missing collection yields
    /// no hits.
    pub async fn query(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: u64,
        filter: Option<MetadataFilter>,
    ) -> Result<Vec<IndexHit>, VectorDbError> {
        let mut search = SearchPointsBuilder::new(collection, vector, limit).with_payload(true);
        if let Some(filter) = filter {
            search = search.filter(Filter::must([Condition::matches(filter.key, filter.value)]));
        }

        let response = match self.client.search_points(search).await {
            Ok(response) => response,
            Err(e) if is_missing_collection(&e) => {
                debug!(collection, "Query against missing collection");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(VectorDbError::QueryFailed {
                    collection: collection.to_string(),
                    message: e.to_string(),
                });
            }
        };

        Ok(response
            .result
            .into_iter()
            .filter_map(IndexHit::from_scored_point)
            .collect())
    }

    /// Reads the metadata of every record in the collection (scrolling page by page).
    pub async fn scan_metadata(&self, collection: &str) -> Result<Vec<Metadata>, VectorDbError> {
        let mut all = Vec::new();
        let mut offset = None;

        loop {
            let mut scroll = ScrollPointsBuilder::new(collection)
                .limit(SCROLL_PAGE_SIZE)
                .with_payload(true)
                .with_vectors(false);
            if let Some(id) = offset.take() {
                scroll = scroll.offset(id);
            }

            let page = match self.client.scroll(scroll).await {
                Ok(page) => page,
                Err(e) if is_missing_collection(&e) => {
                    debug!(collection, "Scan of missing collection");
                    return Ok(Vec::new());
                }
                Err(e) => {
                    return Err(VectorDbError::ReadFailed {
                        collection: collection.to_string(),
                        message: e.to_string(),
                    });
                }
            };

            all.extend(
                page.result
                    .into_iter()
                    .filter_map(|point| split_payload(point.payload))
                    .map(|(_, _, metadata)| metadata),
            );

            match page.next_page_offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        Ok(all)
    }

    /// Exact record count; `0` for a missing collection.
    pub async fn count(&self, collection: &str) -> Result<u64, VectorDbError> {
        let response = match self
            .client
            .count(CountPointsBuilder::new(collection).exact(true))
            .await
        {
            Ok(response) => response,
            Err(e) if is_missing_collection(&e) => return Ok(0),
            Err(e) => {
                return Err(VectorDbError::ReadFailed {
                    collection: collection.to_string(),
                    message: e.to_string(),
                });
            }
        };

        Ok(response.result.map(|r| r.count).unwrap_or(0))
    }
}

/// Async interface to a nearest-neighbor index over named collections.
///
/// Every collection uses cosine distance. Reads against a missing collection behave as if
/// it were empty; absence of data is an expected bootstrap state.
pub trait VectorIndex: Send + Sync {
    /// Checks that the backend is reachable.
    fn health_check(&self) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    /// Ensures a collection exists.
    fn ensure_collection(
        &self,
        name: &str,
        vector_size: u64,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    /// Inserts or replaces records by id.
    fn upsert(
        &self,
        collection: &str,
        records: Vec<IndexRecord>,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    /// Returns up to `limit` hits ordered by ascending distance.
    fn query(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: u64,
        filter: Option<MetadataFilter>,
    ) -> impl std::future::Future<Output = Result<Vec<IndexHit>, VectorDbError>> + Send;

    /// Returns the metadata of every record.
    fn scan_metadata(
        &self,
        collection: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Metadata>, VectorDbError>> + Send;

    /// Returns the number of records.
    fn count(
        &self,
        collection: &str,
    ) -> impl std::future::Future<Output = Result<u64, VectorDbError>> + Send;
}

impl VectorIndex for QdrantIndex {
    async fn health_check(&self) -> Result<(), VectorDbError> {
        self.health_check().await
    }

    async fn ensure_collection(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        self.ensure_collection(name, vector_size).await
    }

    async fn upsert(
        &self,
        collection: &str,
        records: Vec<IndexRecord>,
    ) -> Result<(), VectorDbError> {
        self.upsert(collection, records).await
    }

    async fn query(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: u64,
        filter: Option<MetadataFilter>,
    ) -> Result<Vec<IndexHit>, VectorDbError> {
        self.query(collection, vector, limit, filter).await
    }

    async fn scan_metadata(&self, collection: &str) -> Result<Vec<Metadata>, VectorDbError> {
        self.scan_metadata(collection).await
    }

    async fn count(&self, collection: &str) -> Result<u64, VectorDbError> {
        self.count(collection).await
    }
}
