use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoringError {
    #[error("unknown similarity transform '{name}' (expected one-minus-distance or half-cosine)")]
    UnknownTransform { name: String },
}
