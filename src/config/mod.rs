//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `CAREER_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::constants::{JOBS_COLLECTION, RESUMES_COLLECTION};
use crate::embedding::MiniLmConfig;
use crate::matcher::MatcherConfig;
use crate::scoring::{DEFAULT_SIMILARITY_TRANSFORM, SimilarityTransform};

/// Service configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `CAREER_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default: `8080`.
    pub port: u16,

    /// Default: loopback only.
    pub bind_addr: IpAddr,

    /// Qdrant gRPC endpoint. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Sentence-transformer model directory. `None` runs the stub embedder.
    pub model_path: Option<PathBuf>,

    /// Default: `resumes`.
    pub resumes_collection: String,

    /// Default: `job_descriptions`.
    pub jobs_collection: String,

    /// Distance → similarity mapping. Default: `one-minus-distance`.
    pub similarity_transform: SimilarityTransform,
}

/// Default Qdrant URL used when `CAREER_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = crate::vectordb::DEFAULT_QDRANT_URL;

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            model_path: None,
            resumes_collection: RESUMES_COLLECTION.to_string(),
            jobs_collection: JOBS_COLLECTION.to_string(),
            similarity_transform: DEFAULT_SIMILARITY_TRANSFORM,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "CAREER_PORT";
    const ENV_BIND_ADDR: &'static str = "CAREER_BIND_ADDR";
    const ENV_QDRANT_URL: &'static str = "CAREER_QDRANT_URL";
    const ENV_MODEL_PATH: &'static str = "CAREER_MODEL_PATH";
    const ENV_RESUMES_COLLECTION: &'static str = "CAREER_RESUMES_COLLECTION";
    const ENV_JOBS_COLLECTION: &'static str = "CAREER_JOBS_COLLECTION";
    const ENV_SIMILARITY_TRANSFORM: &'static str = "CAREER_SIMILARITY_TRANSFORM";

    /// Reads `CAREER_*` variables; unset or blank ones keep their default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let qdrant_url = Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url);
        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);
        let resumes_collection =
            Self::parse_string_from_env(Self::ENV_RESUMES_COLLECTION, defaults.resumes_collection);
        let jobs_collection =
            Self::parse_string_from_env(Self::ENV_JOBS_COLLECTION, defaults.jobs_collection);
        let similarity_transform = Self::parse_transform_from_env(defaults.similarity_transform)?;

        Ok(Self {
            port,
            bind_addr,
            qdrant_url,
            model_path,
            resumes_collection,
            jobs_collection,
            similarity_transform,
        })
    }

    /// Validates paths and basic invariants (touches nothing on disk).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if self.qdrant_url.trim().is_empty() {
            return Err(ConfigError::EmptyValue {
                name: Self::ENV_QDRANT_URL,
            });
        }
        if self.resumes_collection.trim().is_empty() {
            return Err(ConfigError::EmptyValue {
                name: Self::ENV_RESUMES_COLLECTION,
            });
        }
        if self.jobs_collection.trim().is_empty() {
            return Err(ConfigError::EmptyValue {
                name: Self::ENV_JOBS_COLLECTION,
            });
        }

        Ok(())
    }

    /// Address the HTTP server listens on.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// Embedder settings: the model directory when set, the stub otherwise.
    pub fn embedder_config(&self) -> MiniLmConfig {
        match self.model_path {
            Some(ref path) => MiniLmConfig::new(path),
            None => MiniLmConfig::stub(),
        }
    }

    pub fn matcher_config(&self) -> MatcherConfig {
        MatcherConfig::default()
            .resumes_collection(self.resumes_collection.clone())
            .jobs_collection(self.jobs_collection.clone())
            .transform(self.similarity_transform)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_transform_from_env(
        default: SimilarityTransform,
    ) -> Result<SimilarityTransform, ConfigError> {
        match env::var(Self::ENV_SIMILARITY_TRANSFORM) {
            Ok(value) if value.trim().is_empty() => Ok(default),
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidTransform { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }
}
