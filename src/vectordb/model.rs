use std::collections::{BTreeMap, HashMap};
use std::fmt;

use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{ScoredPoint, Value};
use serde::{Deserialize, Serialize};

/// Payload key holding the caller-facing record id.
pub const PAYLOAD_RECORD_ID: &str = "record_id";
/// Payload key holding the document text.
pub const PAYLOAD_DOCUMENT: &str = "document";

/// A scalar metadata value, passed through the index unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl MetadataValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(s) => Some(s),
            _ => None,
        }
    }

    fn from_qdrant(value: Value) -> Option<Self> {
        match value.kind? {
            Kind::StringValue(s) => Some(MetadataValue::Text(s)),
            Kind::IntegerValue(i) => Some(MetadataValue::Integer(i)),
            Kind::DoubleValue(d) => Some(MetadataValue::Float(d)),
            Kind::BoolValue(b) => Some(MetadataValue::Bool(b)),
            _ => None,
        }
    }

    fn into_qdrant(self) -> Value {
        match self {
            MetadataValue::Text(s) => s.into(),
            MetadataValue::Integer(i) => i.into(),
            MetadataValue::Float(d) => d.into(),
            MetadataValue::Bool(b) => b.into(),
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Text(s) => f.write_str(s),
            MetadataValue::Integer(i) => write!(f, "{}", i),
            MetadataValue::Float(d) => write!(f, "{}", d),
            MetadataValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::Text(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::Text(s)
    }
}

impl From<i64> for MetadataValue {
    fn from(i: i64) -> Self {
        MetadataValue::Integer(i)
    }
}

impl From<f64> for MetadataValue {
    fn from(d: f64) -> Self {
        MetadataValue::Float(d)
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        MetadataValue::Bool(b)
    }
}

/// Record metadata. Ordered so that serialized output is stable.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A record to be written to a collection.
#[derive(Debug, Clone)]
pub struct IndexRecord {
    pub id: String,
    pub vector: Vec<f32>,
    pub text: String,
    pub metadata: Metadata,
}

impl IndexRecord {
    pub fn new(id: impl Into<String>, vector: Vec<f32>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            vector,
            text: text.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Builds the Qdrant payload: metadata fields flattened at the top level, then the
    /// reserved `record_id` / `document` keys (which win on a name clash).
    pub(crate) fn into_payload(self) -> (String, Vec<f32>, HashMap<String, Value>) {
        let mut payload: HashMap<String, Value> = self
            .metadata
            .into_iter()
            .map(|(k, v)| (k, v.into_qdrant()))
            .collect();
        payload.insert(PAYLOAD_RECORD_ID.to_string(), self.id.clone().into());
        payload.insert(PAYLOAD_DOCUMENT.to_string(), self.text.into());
        (self.id, self.vector, payload)
    }
}

/// One nearest-neighbor hit, as returned by a [`VectorIndex`](super::VectorIndex).
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    pub id: String,
    pub text: String,
    pub metadata: Metadata,
    /// Cosine distance, lower is closer.
    pub distance: f32,
}

impl IndexHit {
    /// Converts a Qdrant hit. Qdrant reports cosine *similarity*; it is turned back into a
    /// distance (`1 - score`) so every index speaks the same unit.
    pub fn from_scored_point(point: ScoredPoint) -> Option<Self> {
        let (id, text, metadata) = split_payload(point.payload)?;
        Some(IndexHit {
            id,
            text,
            metadata,
            distance: (1.0 - point.score).max(0.0),
        })
    }
}

/// Separates reserved keys from metadata. Returns `None` for points not written by us.
pub(crate) fn split_payload(payload: HashMap<String, Value>) -> Option<(String, String, Metadata)> {
    let mut id = None;
    let mut text = String::new();
    let mut metadata = Metadata::new();

    for (key, value) in payload {
        match key.as_str() {
            PAYLOAD_RECORD_ID => id = value.as_str().map(|s| s.to_string()),
            PAYLOAD_DOCUMENT => text = value.as_str().map(|s| s.to_string()).unwrap_or_default(),
            _ => {
                if let Some(v) = MetadataValue::from_qdrant(value) {
                    metadata.insert(key, v);
                }
            }
        }
    }

    Some((id?, text, metadata))
}

/// Equality predicate on a metadata field, evaluated inside the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataFilter {
    pub key: String,
    pub value: String,
}

impl MetadataFilter {
    pub fn equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// `true` if `metadata[key]` is the string `value`.
    pub fn matches(&self, metadata: &Metadata) -> bool {
        metadata
            .get(&self.key)
            .and_then(MetadataValue::as_str)
            .is_some_and(|v| v == self.value)
    }
}
