//! Source table error types.

use thiserror::Error;

/// Errors that can occur while reading the source table.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Failed to connect to the database.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The select query failed.
    #[error("Query error: {0}")]
    QueryError(String),

    /// A returned value could not be read as text.
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// The connection settings are unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SourceError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::DecodeError(msg.into())
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
