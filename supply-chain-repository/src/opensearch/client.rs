//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchEngineClient`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::IndicesRefreshParts,
    CountParts, IndexParts, OpenSearch,
};
use serde_json::Value;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::config::SearchIndexConfig;
use crate::errors::SearchError;
use crate::interfaces::SearchEngineClient;
use supply_chain_shared::Document;

/// OpenSearch client implementation.
///
/// Every document goes to a single index. Documents are posted without an
/// identifier, so the engine assigns a fresh one per submission.
///
/// # Example
///
/// ```ignore
/// let config = SearchIndexConfig::default();
/// let client = OpenSearchClient::new(&config)?;
/// let id = client.index_document(&document).await?;
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
    index_name: String,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client connected to the configured URL.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchError)` - If the URL is invalid or transport setup fails
    pub fn new(config: &SearchIndexConfig) -> Result<Self, SearchError> {
        let parsed_url =
            Url::parse(&config.url).map_err(|e| SearchError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %config.url,
            index = %config.index_name,
            "Created OpenSearch client"
        );

        Ok(Self {
            client,
            index_name: config.index_name.clone(),
        })
    }

    /// Name of the index documents are written to.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Pull the assigned `_id` out of an index response body.
    fn parse_document_id(body: &Value) -> Option<String> {
        body.get("_id").and_then(Value::as_str).map(str::to_string)
    }

    /// Pull the `count` out of a count response body.
    fn parse_count(body: &Value) -> Option<u64> {
        body.get("count").and_then(Value::as_u64)
    }
}

#[async_trait]
impl SearchEngineClient for OpenSearchClient {
    async fn index_document(&self, document: &Document) -> Result<String, SearchError> {
        let response = self
            .client
            .index(IndexParts::Index(&self.index_name))
            .body(document)
            .send()
            .await
            .map_err(|e| SearchError::index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index request failed");
            return Err(SearchError::index(format!(
                "Index failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let doc_id = Self::parse_document_id(&body)
            .ok_or_else(|| SearchError::parse("index response has no _id"))?;

        debug!(doc_id = %doc_id, "Document indexed");
        Ok(doc_id)
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, SearchError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        Ok(response.status_code().is_success())
    }

    async fn refresh_index(&self) -> Result<(), SearchError> {
        let response = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[self.index_name.as_str()]))
            .send()
            .await
            .map_err(|e| SearchError::query(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(SearchError::query(format!(
                "Refresh failed with status {}: {}",
                status, error_body
            )));
        }

        Ok(())
    }

    async fn count_documents(&self) -> Result<u64, SearchError> {
        let response = self
            .client
            .count(CountParts::Index(&[self.index_name.as_str()]))
            .send()
            .await
            .map_err(|e| SearchError::query(e.to_string()))?;

        let status = response.status_code();

        // The index is created by the first successful submission
        if status.as_u16() == 404 {
            return Ok(0);
        }

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(SearchError::query(format!(
                "Count failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        Self::parse_count(&body).ok_or_else(|| SearchError::parse("count response has no count"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_rejects_invalid_url() {
        let config = SearchIndexConfig {
            url: "not a url".to_string(),
            index_name: "supply_chain".to_string(),
        };

        let result = OpenSearchClient::new(&config);
        assert!(matches!(result, Err(SearchError::ConnectionError(_))));
    }

    #[test]
    fn test_new_keeps_index_name() {
        let client = OpenSearchClient::new(&SearchIndexConfig::default()).unwrap();
        assert_eq!(client.index_name(), "supply_chain");
    }

    #[test]
    fn test_parse_document_id() {
        let body = json!({
            "_index": "supply_chain",
            "_id": "kZ3lS4wB7Yq2",
            "_version": 1,
            "result": "created"
        });

        assert_eq!(
            OpenSearchClient::parse_document_id(&body),
            Some("kZ3lS4wB7Yq2".to_string())
        );
        assert_eq!(OpenSearchClient::parse_document_id(&json!({})), None);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(OpenSearchClient::parse_count(&json!({ "count": 180519 })), Some(180519));
        assert_eq!(OpenSearchClient::parse_count(&json!({ "error": "x" })), None);
    }
}
