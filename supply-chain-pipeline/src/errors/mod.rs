//! Error types for the supply chain pipeline.

use supply_chain_repository::{SearchError, SourceError};
use thiserror::Error;

/// Errors that can occur in the supply chain pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Error from the extractor stage.
    #[error("Extract error: {0}")]
    ExtractError(String),

    /// Error from the cleaner stage.
    #[error("Clean error: {0}")]
    CleanError(String),

    /// A column the cleaner depends on is not in the snapshot.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A snapshot file could not be read or written.
    #[error("Snapshot error: {0}")]
    SnapshotError(String),

    /// Invalid schedule or task chain.
    #[error("Schedule error: {0}")]
    ScheduleError(String),

    /// A stage kept failing after all retries.
    #[error("Task {task_id} failed after {attempts} attempt(s): {source}")]
    StageFailed {
        task_id: String,
        attempts: u32,
        #[source]
        source: Box<PipelineError>,
    },

    /// Error from the source database.
    #[error("Source error: {0}")]
    SourceError(#[from] SourceError),

    /// Error from the search engine.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PipelineError {
    /// Create an extract error.
    pub fn extract(msg: impl Into<String>) -> Self {
        Self::ExtractError(msg.into())
    }

    /// Create a clean error.
    pub fn clean(msg: impl Into<String>) -> Self {
        Self::CleanError(msg.into())
    }

    /// Create a missing column error.
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn(column.into())
    }

    /// Create a snapshot error.
    pub fn snapshot(msg: impl Into<String>) -> Self {
        Self::SnapshotError(msg.into())
    }

    /// Create a schedule error.
    pub fn schedule(msg: impl Into<String>) -> Self {
        Self::ScheduleError(msg.into())
    }

    /// Wrap the last error of a task that ran out of retries.
    pub fn stage_failed(task_id: impl Into<String>, attempts: u32, source: PipelineError) -> Self {
        Self::StageFailed {
            task_id: task_id.into(),
            attempts,
            source: Box::new(source),
        }
    }
}
