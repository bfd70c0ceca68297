//! # Supply Chain Indexer
//!
//! Main library for the supply chain indexer.
//!
//! This crate provides the configuration loading and dependency wiring
//! behind the `supply-chain-indexer` command line entry points.

pub mod config;

pub use config::{load_config, Dependencies};

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] supply_chain_pipeline::PipelineError),

    /// Source database error.
    #[error("Source error: {0}")]
    SourceError(#[from] supply_chain_repository::SourceError),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] supply_chain_repository::SearchError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
