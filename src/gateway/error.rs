use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::gateway::CAREER_STATUS_HEADER;
use crate::matcher::MatchError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("embedding failed: {0}")]
    EmbeddingFailed(String),

    #[error("vector index error: {0}")]
    IndexError(String),
}

impl From<MatchError> for GatewayError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::Embedding(e) => GatewayError::EmbeddingFailed(e.to_string()),
            MatchError::Index(e) => GatewayError::IndexError(e.to_string()),
            invalid => GatewayError::InvalidRequest(invalid.to_string()),
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, career_status) = match &self {
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            GatewayError::EmbeddingFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "embedding_error")
            }
            GatewayError::IndexError(_) => (StatusCode::BAD_GATEWAY, "index_error"),
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            CAREER_STATUS_HEADER,
            HeaderValue::from_str(career_status).unwrap_or(HeaderValue::from_static("error")),
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
