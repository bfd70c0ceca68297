//! # Supply Chain Repository
//!
//! This crate provides traits and implementations for the two external
//! stores the pipeline talks to: the relational database holding the
//! source table and the search engine receiving documents. It includes
//! definitions for errors, interfaces, connection configuration, and
//! concrete implementations for PostgreSQL and OpenSearch.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod postgres;

pub use config::{PostgresConfig, SearchIndexConfig};
pub use errors::{SearchError, SourceError};
pub use interfaces::{SearchEngineClient, TableSource};
pub use opensearch::OpenSearchClient;
pub use postgres::PostgresSource;
