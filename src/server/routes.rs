//! Request handlers.

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;

use super::error::ApiError;
use super::AppState;
use crate::products::Source;

/// Header reporting whether the listing came from the cache
pub const CACHE_STATUS_HEADER: &str = "x-cache";

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
}

/// GET /CrawlerData/Craw - Product listing, cached for a short time.
pub async fn craw(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let products = state.products.get_products().await?;

    let cache_status = match products.source {
        Source::Cache => "HIT",
        Source::Upstream => "MISS",
    };

    Ok(([(CACHE_STATUS_HEADER, cache_status)], Json(products.items)))
}

/// GET /health - Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "tikicrawl",
    })
}
