use std::path::PathBuf;
use thiserror::Error;

use crate::scoring::ScoringError;

/// Why `CAREER_*` settings were rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `CAREER_PORT` parsed, but to 0.
    #[error("CAREER_PORT '{value}' is out of range: use a port between 1 and 65535")]
    InvalidPort { value: String },

    #[error("CAREER_PORT '{value}' is not a number: {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("CAREER_BIND_ADDR '{value}' is not an IP address: {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("CAREER_SIMILARITY_TRANSFORM '{value}' is not recognised: {source}")]
    InvalidTransform {
        value: String,
        #[source]
        source: ScoringError,
    },

    #[error("{name} must not be empty")]
    EmptyValue { name: &'static str },

    /// Model directory is missing.
    #[error("model directory {path} does not exist")]
    PathNotFound { path: PathBuf },

    #[error("model path {path} is a file, expected a directory")]
    NotADirectory { path: PathBuf },
}
