//! Tiki product search API client
//!
//! This module issues the product listing request against the Tiki API and
//! decodes the response into our [`ApiResponse`] model. Failures collapse into
//! an empty listing so callers never have to handle upstream errors.

use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use super::ApiResponse;

/// Base URL for the Tiki API
pub const DEFAULT_BASE_URL: &str = "https://tiki.vn";

/// Path of the product search endpoint
const PRODUCTS_PATH: &str = "/api/v2/products";

/// Tracking id the public site sends with every search
const TRACKITY_ID: &str = "b60cd8c8-8bba-18d3-6cca-f7f2b515da8e";

/// Errors that can occur when fetching the product listing
#[derive(Debug, Error)]
pub enum TikiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Upstream returned status {0}")]
    Status(StatusCode),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Search parameters for the product listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    /// Search term
    pub q: String,
    /// Maximum number of products to return
    pub limit: u32,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            q: "ao".to_string(),
            limit: 40,
        }
    }
}

impl ProductQuery {
    /// Query string pairs in the order the public site sends them
    fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("limit", self.limit.to_string()),
            ("include", "advertisement".to_string()),
            ("aggregations", "2".to_string()),
            ("trackity_id", TRACKITY_ID.to_string()),
            ("q", self.q.clone()),
        ]
    }
}

/// Client for fetching the product listing from the Tiki API
#[derive(Debug, Clone)]
pub struct TikiClient {
    client: Client,
    base_url: String,
}

impl Default for TikiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TikiClient {
    /// Create a new TikiClient with default settings
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different base address
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the product listing, surfacing every failure
    ///
    /// # Returns
    /// * `Ok(ApiResponse)` - Decoded listing on a success status
    /// * `Err(TikiError)` - On network failure, non-success status, or bad JSON
    pub async fn try_fetch_products(
        &self,
        query: &ProductQuery,
    ) -> Result<ApiResponse, TikiError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), PRODUCTS_PATH);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(&query.params())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TikiError::Status(status));
        }

        let text = response.text().await?;
        Ok(ApiResponse::from_json(&text)?)
    }

    /// Fetch the product listing
    ///
    /// Never fails: any error is logged and an empty listing is returned.
    pub async fn fetch_products(&self, query: &ProductQuery) -> ApiResponse {
        match self.try_fetch_products(query).await {
            Ok(response) => {
                tracing::debug!(count = response.data.len(), q = %query.q, "Fetched products");
                response
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    q = %query.q,
                    "Product fetch failed, returning empty listing"
                );
                ApiResponse::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ONE_PRODUCT: &str = r#"{"data":[{"id":1,"sku":"A1","name":"Shirt","original_price":100,
        "price":90,"brand_name":"B","seller_name":"S","badges_new":[]}]}"#;

    fn client_for(server: &MockServer) -> TikiClient {
        TikiClient::new().with_base_url(server.uri())
    }

    #[test]
    fn test_default_query_matches_public_search() {
        let query = ProductQuery::default();
        assert_eq!(query.q, "ao");
        assert_eq!(query.limit, 40);

        let params = query.params();
        assert_eq!(params[0], ("limit", "40".to_string()));
        assert_eq!(params[3], ("trackity_id", TRACKITY_ID.to_string()));
        assert_eq!(params[4], ("q", "ao".to_string()));
    }

    #[test]
    fn test_new_targets_tiki() {
        assert_eq!(TikiClient::new().base_url(), "https://tiki.vn");
    }

    #[tokio::test]
    async fn test_fetch_sends_accept_header_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/products"))
            .and(header("accept", "application/json"))
            .and(query_param("limit", "40"))
            .and(query_param("include", "advertisement"))
            .and(query_param("aggregations", "2"))
            .and(query_param("trackity_id", TRACKITY_ID))
            .and(query_param("q", "ao"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ONE_PRODUCT))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .fetch_products(&ProductQuery::default())
            .await;

        assert_eq!(response.data.len(), 1);
        assert_eq!(response.data[0].name, "Shirt");
        assert_eq!(response.data[0].price, 90);
    }

    #[tokio::test]
    async fn test_fetch_encodes_search_term() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/products"))
            .and(query_param("q", "áo thun"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ONE_PRODUCT))
            .expect(1)
            .mount(&server)
            .await;

        let query = ProductQuery {
            q: "áo thun".to_string(),
            limit: 5,
        };
        let response = client_for(&server).fetch_products(&query).await;

        assert_eq!(response.data.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_returns_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string(ONE_PRODUCT))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client.fetch_products(&ProductQuery::default()).await;
        assert!(response.data.is_empty());

        let err = client
            .try_fetch_products(&ProductQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TikiError::Status(s) if s == StatusCode::SERVICE_UNAVAILABLE));
    }

    #[tokio::test]
    async fn test_fetch_malformed_json_returns_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"data\": [{\"id\": "))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client.fetch_products(&ProductQuery::default()).await;
        assert!(response.data.is_empty());

        let err = client
            .try_fetch_products(&ProductQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TikiError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_fetch_network_failure_returns_empty() {
        // Nothing listens on the discard port
        let client = TikiClient::new().with_base_url("http://127.0.0.1:9");

        let response = client.fetch_products(&ProductQuery::default()).await;

        assert!(response.data.is_empty());
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_is_ignored() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/products"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ONE_PRODUCT))
            .expect(1)
            .mount(&server)
            .await;

        let client = TikiClient::new().with_base_url(format!("{}/", server.uri()));
        let response = client.fetch_products(&ProductQuery::default()).await;

        assert_eq!(response.data.len(), 1);
    }
}
