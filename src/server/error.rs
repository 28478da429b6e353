//! Error types and handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::cache::CacheError;
use crate::products::ServiceError;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Service(ServiceError::Cache(CacheError::Redis(_))) => "CACHE_UNAVAILABLE",
            ApiError::Service(ServiceError::Cache(_)) => "CACHE_ERROR",
            ApiError::Service(ServiceError::Serialization(_)) => "SERIALIZATION_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");

        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        };

        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
