//! Search engine client trait definition.
//!
//! This module defines the abstract interface for search engine operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, mocks).

use async_trait::async_trait;

use crate::errors::SearchError;
use supply_chain_shared::Document;

/// Abstract interface for search engine operations.
///
/// The pipeline only ever appends documents: there is no update, delete or
/// upsert, and the engine chooses every document identifier.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait SearchEngineClient: Send + Sync {
    /// Submit one document as a new document in the configured index.
    ///
    /// No identifier is sent, so submitting the same document twice stores
    /// it twice.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The identifier the engine assigned
    /// * `Err(SearchError)` - If the request failed or was rejected
    async fn index_document(&self, document: &Document) -> Result<String, SearchError>;

    /// Check if the search engine is reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the engine answered the ping
    /// * `Ok(false)` - If the engine answered with an error status
    /// * `Err(SearchError)` - If the request could not be sent
    async fn health_check(&self) -> Result<bool, SearchError>;

    /// Make recently indexed documents visible to searches and counts.
    async fn refresh_index(&self) -> Result<(), SearchError>;

    /// Number of documents currently in the index. A missing index counts as empty.
    async fn count_documents(&self) -> Result<u64, SearchError>;
}
