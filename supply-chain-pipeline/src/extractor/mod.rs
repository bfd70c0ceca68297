//! Extractor stage.
//!
//! Copies the full source table, unmodified, into the raw snapshot.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::errors::PipelineError;
use crate::snapshot::{write_snapshot, RowIndex};
use supply_chain_repository::TableSource;

/// Outcome of an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Rows written to the raw snapshot.
    pub rows: usize,
    /// Columns in the raw snapshot header.
    pub columns: usize,
}

/// Extractor that snapshots the source table.
pub struct Extractor {
    source: Arc<dyn TableSource>,
    output: PathBuf,
}

impl Extractor {
    /// Create a new extractor writing to `output`.
    pub fn new(source: Arc<dyn TableSource>, output: impl Into<PathBuf>) -> Self {
        Self {
            source,
            output: output.into(),
        }
    }

    /// Fetch the whole table and write the raw snapshot.
    ///
    /// Source errors propagate unchanged; nothing is written when the fetch
    /// fails.
    #[instrument(skip(self), fields(output = %self.output.display()))]
    pub async fn run(&self) -> Result<ExtractSummary, PipelineError> {
        let table = self.source.fetch_table().await?;

        if table.columns.is_empty() {
            return Err(PipelineError::extract("source table has no columns"));
        }

        write_snapshot(&self.output, &table, RowIndex::Omit)?;

        let summary = ExtractSummary {
            rows: table.len(),
            columns: table.columns.len(),
        };
        info!(
            rows = summary.rows,
            columns = summary.columns,
            "Raw snapshot written"
        );
        Ok(summary)
    }
}
