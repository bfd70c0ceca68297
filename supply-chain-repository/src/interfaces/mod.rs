//! Interface definitions for the external stores.
//!
//! This module defines the abstract `TableSource` and `SearchEngineClient`
//! traits that allow for dependency injection and swappable backends.

mod search_engine_client;
mod table_source;

pub use search_engine_client::SearchEngineClient;
pub use table_source::TableSource;
