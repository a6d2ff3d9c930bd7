use serde::Deserialize;

use crate::constants::{
    JOB_INDEX_FIELD, JOB_TITLE_METADATA_LEN, MIN_RESUME_TEXT_LEN, UNKNOWN_CATEGORY,
};
use crate::matcher::job_query_text;
use crate::vectordb::Metadata;

pub const JOB_TITLE_COLUMN: &str = "Job Title";
pub const JOB_DESCRIPTION_COLUMN: &str = "Job Description";
pub const RESUME_TEXT_COLUMN: &str = "resume_text";

/// One row of a job-postings CSV. Extra columns are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobRow {
    #[serde(rename = "Job Title", default)]
    pub job_title: Option<String>,
    #[serde(rename = "Job Description", default)]
    pub job_description: Option<String>,
}

/// One row of an extracted-resumes CSV.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResumeRow {
    #[serde(default)]
    pub resume_id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub resume_text: Option<String>,
}

/// A row that passed filtering, ready to be embedded.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRecord {
    pub id: String,
    pub text: String,
    pub metadata: Metadata,
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// First `max_chars` characters of `s`.
pub(crate) fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

impl JobRow {
    /// `None` when the title or the description is blank.
    pub fn prepare(&self, row: usize, source: &str) -> Option<PreparedRecord> {
        let title = trimmed(&self.job_title)?;
        let description = trimmed(&self.job_description)?;

        let mut metadata = Metadata::new();
        metadata.insert(
            "job_title".to_string(),
            truncate_chars(title, JOB_TITLE_METADATA_LEN).into(),
        );
        metadata.insert(JOB_INDEX_FIELD.to_string(), row.to_string().into());
        metadata.insert("source".to_string(), source.into());

        Some(PreparedRecord {
            id: format!("job_{row}"),
            text: job_query_text(title, description),
            metadata,
        })
    }
}

impl ResumeRow {
    /// `None` when the trimmed text is shorter than the ingestion minimum.
    pub fn prepare(&self, row: usize, source: &str) -> Option<PreparedRecord> {
        let text = trimmed(&self.resume_text)?;
        if text.chars().count() < MIN_RESUME_TEXT_LEN {
            return None;
        }

        let resume_id = trimmed(&self.resume_id)
            .map(str::to_string)
            .unwrap_or_else(|| row.to_string());
        let category = trimmed(&self.category).unwrap_or(UNKNOWN_CATEGORY);

        let mut metadata = Metadata::new();
        metadata.insert("resume_id".to_string(), resume_id.clone().into());
        metadata.insert("category".to_string(), category.into());
        if let Some(path) = trimmed(&self.file_path) {
            metadata.insert("file_path".to_string(), path.into());
        }
        metadata.insert("source".to_string(), source.into());

        Some(PreparedRecord {
            id: format!("resume_{resume_id}"),
            text: text.to_string(),
            metadata,
        })
    }
}
