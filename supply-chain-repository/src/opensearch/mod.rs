//! OpenSearch implementation of the search engine client.
//!
//! This module provides a concrete implementation of `SearchEngineClient`
//! using OpenSearch as the backend. The same HTTP API is served by
//! Elasticsearch for the calls used here.

mod client;

pub use client::OpenSearchClient;
