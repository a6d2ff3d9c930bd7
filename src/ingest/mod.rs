//! CSV ingestion into the resume and job collections.
//!
//! Rows are parsed and filtered up front, then embedded and upserted in fixed-size batches.
//! Re-running an ingestion overwrites records with the same id.

pub mod error;
pub mod records;


pub use error::IngestError;
pub use records::{JobRow, PreparedRecord, ResumeRow};

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::constants::INGEST_BATCH_SIZE;
use crate::embedding::TextEmbedder;
use crate::vectordb::{IndexRecord, VectorIndex};
use records::{JOB_DESCRIPTION_COLUMN, JOB_TITLE_COLUMN, RESUME_TEXT_COLUMN};

/// Outcome of one ingestion run.
///
/// `ingested` counts distinct record ids written; rows repeating an earlier id are folded
/// into it (the last row wins) and counted in `duplicates`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub ingested: usize,
    pub skipped: usize,
    pub duplicates: usize,
    pub batches: usize,
}

/// Embeds CSV rows and writes them to a [`VectorIndex`].
pub struct Ingestor<E, I> {
    embedder: Arc<E>,
    index: Arc<I>,
    batch_size: usize,
}

impl<E, I> Ingestor<E, I>
where
    E: TextEmbedder,
    I: VectorIndex,
{
    pub fn new(embedder: Arc<E>, index: Arc<I>) -> Self {
        Self {
            embedder,
            index,
            batch_size: INGEST_BATCH_SIZE,
        }
    }

    /// Overrides the batch size (minimum 1).
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub async fn ingest_jobs_csv(
        &self,
        path: &Path,
        collection: &str,
    ) -> Result<IngestReport, IngestError> {
        let file = open(path)?;
        self.ingest_jobs(file, &source_name(path), collection).await
    }

    /// Ingests job postings (`Job Title`, `Job Description` columns) from any CSV reader.
    pub async fn ingest_jobs<R: Read>(
        &self,
        reader: R,
        source: &str,
        collection: &str,
    ) -> Result<IngestReport, IngestError> {
        let (prepared, skipped) = read_rows::<JobRow, _>(
            reader,
            &[JOB_TITLE_COLUMN, JOB_DESCRIPTION_COLUMN],
            |row, idx| row.prepare(idx, source),
        )?;
        info!(collection, source, rows = prepared.len() + skipped, "Ingesting jobs");

        self.write(collection, prepared, skipped).await
    }

    pub async fn ingest_resumes_csv(
        &self,
        path: &Path,
        collection: &str,
    ) -> Result<IngestReport, IngestError> {
        let file = open(path)?;
        self.ingest_resumes(file, &source_name(path), collection)
            .await
    }

    /// Ingests resumes (`resume_id`, `category`, `file_path`, `resume_text` columns).
    pub async fn ingest_resumes<R: Read>(
        &self,
        reader: R,
        source: &str,
        collection: &str,
    ) -> Result<IngestReport, IngestError> {
        let (prepared, skipped) = read_rows::<ResumeRow, _>(
            reader,
            &[RESUME_TEXT_COLUMN],
            |row, idx| row.prepare(idx, source),
        )?;
        info!(collection, source, rows = prepared.len() + skipped, "Ingesting resumes");

        self.write(collection, prepared, skipped).await
    }

    async fn write(
        &self,
        collection: &str,
        prepared: Vec<PreparedRecord>,
        skipped: usize,
    ) -> Result<IngestReport, IngestError> {
        self.index
            .ensure_collection(collection, self.embedder.dimension() as u64)
            .await?;

        let (prepared, duplicates) = dedup_by_id(prepared);
        if duplicates > 0 {
            warn!(collection, duplicates, "Rows with repeated ids, keeping the last of each");
        }

        let mut report = IngestReport {
            skipped,
            duplicates,
            ..Default::default()
        };

        for chunk in prepared.chunks(self.batch_size) {
            let texts: Vec<&str> = chunk.iter().map(|r| r.text.as_str()).collect();
            let vectors = self.embedder.embed_batch(&texts)?;
            if vectors.len() != chunk.len() {
                return Err(IngestError::BatchMismatch {
                    expected: chunk.len(),
                    actual: vectors.len(),
                });
            }

            let records: Vec<IndexRecord> = chunk
                .iter()
                .zip(vectors)
                .map(|(r, vector)| IndexRecord {
                    id: r.id.clone(),
                    vector,
                    text: r.text.clone(),
                    metadata: r.metadata.clone(),
                })
                .collect();

            self.index.upsert(collection, records).await?;
            report.ingested += chunk.len();
            report.batches += 1;

            debug!(
                collection,
                batch = report.batches,
                ingested = report.ingested,
                "Ingested batch"
            );
        }

        info!(
            collection,
            ingested = report.ingested,
            skipped = report.skipped,
            duplicates = report.duplicates,
            batches = report.batches,
            "Ingestion complete"
        );

        Ok(report)
    }
}

fn open(path: &Path) -> Result<File, IngestError> {
    File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Collapses records sharing an id into one (the last), keeping first-seen order.
fn dedup_by_id(records: Vec<PreparedRecord>) -> (Vec<PreparedRecord>, usize) {
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(records.len());
    let mut unique: Vec<PreparedRecord> = Vec::with_capacity(records.len());
    let mut duplicates = 0;

    for record in records {
        match positions.get(&record.id) {
            Some(&pos) => {
                unique[pos] = record;
                duplicates += 1;
            }
            None => {
                positions.insert(record.id.clone(), unique.len());
                unique.push(record);
            }
        }
    }

    (unique, duplicates)
}

/// Parses every row, returning the rows that survived `prepare` and the number skipped.
fn read_rows<T, R>(
    reader: R,
    required: &[&str],
    prepare: impl Fn(&T, usize) -> Option<PreparedRecord>,
) -> Result<(Vec<PreparedRecord>, usize), IngestError>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv.headers()?.clone();
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(IngestError::MissingColumn {
                column: column.to_string(),
            });
        }
    }

    let mut prepared = Vec::new();
    let mut skipped = 0;
    for (idx, row) in csv.deserialize::<T>().enumerate() {
        match prepare(&row?, idx) {
            Some(record) => prepared.push(record),
            None => skipped += 1,
        }
    }

    Ok((prepared, skipped))
}
