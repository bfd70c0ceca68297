//! Loader module for the supply chain pipeline.
//!
//! Submits every row of the clean snapshot to the search index as a new
//! document, one at a time and in file order.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::config::LoaderConfig;
use crate::errors::PipelineError;
use crate::snapshot::read_snapshot;
use supply_chain_repository::{SearchEngineClient, SearchError};
use supply_chain_shared::columns::{ORDER_ITEM_ID, ROW_INDEX_COLUMN};
use supply_chain_shared::{ColumnKind, Document, Table};

/// Outcome of submitting one row.
#[derive(Debug, Clone)]
pub struct RowLoadResult {
    /// Row label: the snapshot's index column, or the row position.
    pub label: String,
    /// The row's `order_item_id`, if present.
    pub order_item_id: Option<String>,
    /// Identifier assigned by the engine on success.
    pub document_id: Option<String>,
    /// Submission error on failure.
    pub error: Option<SearchError>,
}

impl RowLoadResult {
    /// Whether the row was stored.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Identifier recorded when the submission failed.
    pub fn failure_id(&self) -> &str {
        self.order_item_id.as_deref().unwrap_or(&self.label)
    }
}

/// Aggregated outcome of a load.
#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    /// Rows read from the snapshot.
    pub total: usize,
    /// Rows stored by the engine.
    pub succeeded: usize,
    /// Rows rejected or lost in transport.
    pub failed: usize,
    /// `order_item_id` of each failed row, in file order.
    pub failed_ids: Vec<String>,
    /// Per-row results, in file order.
    pub results: Vec<RowLoadResult>,
}

impl LoadSummary {
    fn record(&mut self, result: RowLoadResult) {
        self.total += 1;
        if result.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
            self.failed_ids.push(result.failure_id().to_string());
        }
        self.results.push(result);
    }
}

/// Loader that indexes the clean snapshot into the search engine.
///
/// Per-row failures are collected, never raised: the stage only fails when
/// the snapshot itself cannot be read.
pub struct SearchLoader {
    client: Arc<dyn SearchEngineClient>,
    input: PathBuf,
    config: LoaderConfig,
}

impl SearchLoader {
    /// Create a new search loader with the given client.
    pub fn new(client: Arc<dyn SearchEngineClient>, input: impl Into<PathBuf>) -> Self {
        Self::with_config(client, input, LoaderConfig::default())
    }

    /// Create a new search loader with custom configuration.
    pub fn with_config(
        client: Arc<dyn SearchEngineClient>,
        input: impl Into<PathBuf>,
        config: LoaderConfig,
    ) -> Self {
        Self {
            client,
            input: input.into(),
            config,
        }
    }

    /// Read the clean snapshot and load every row.
    #[instrument(skip(self), fields(input = %self.input.display()))]
    pub async fn run(&self) -> Result<LoadSummary, PipelineError> {
        let table = read_snapshot(&self.input)?;

        if self.config.verify_connection {
            self.check_connection().await;
        }

        let summary = self.load_table(&table).await;

        if self.config.verify_connection {
            self.report_index_count().await;
        }

        info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "DONE"
        );
        info!(failed_ids = ?summary.failed_ids, "Failed document ids");

        Ok(summary)
    }

    /// Submit every row of `table`, in order, one at a time.
    pub async fn load_table(&self, table: &Table) -> LoadSummary {
        let label_column = table.column_index(ROW_INDEX_COLUMN);
        let id_column = table.column_index(ORDER_ITEM_ID);
        let skip: Vec<usize> = label_column.into_iter().collect();
        let kinds = ColumnKind::infer_all(table);

        let mut summary = LoadSummary::default();
        for row in 0..table.len() {
            let label = label_column
                .and_then(|c| table.value(row, c))
                .map(str::to_string)
                .unwrap_or_else(|| row.to_string());
            let order_item_id = id_column
                .and_then(|c| table.value(row, c))
                .map(str::to_string);
            let document = Document::from_row(table, row, &kinds, &skip);

            let result = match self.client.index_document(&document).await {
                Ok(document_id) => {
                    debug!(row = %label, document_id = %document_id, "Indexed row");
                    RowLoadResult {
                        label,
                        order_item_id,
                        document_id: Some(document_id),
                        error: None,
                    }
                }
                Err(e) => {
                    error!(
                        row = %label,
                        order_item_id = order_item_id.as_deref().unwrap_or_default(),
                        error = %e,
                        "Failed to index row"
                    );
                    RowLoadResult {
                        label,
                        order_item_id,
                        document_id: None,
                        error: Some(e),
                    }
                }
            };
            summary.record(result);
        }

        summary
    }

    /// Ping the engine and log the answer.
    async fn check_connection(&self) {
        match self.client.health_check().await {
            Ok(true) => info!("Connected to search engine"),
            Ok(false) => warn!("Search engine ping failed"),
            Err(e) => warn!(error = %e, "Could not reach search engine"),
        }
    }

    /// Refresh the index and log how many documents it holds.
    async fn report_index_count(&self) {
        if let Err(e) = self.client.refresh_index().await {
            warn!(error = %e, "Failed to refresh index");
            return;
        }
        match self.client.count_documents().await {
            Ok(count) => info!(count = count, "Documents in index"),
            Err(e) => warn!(error = %e, "Failed to count documents"),
        }
    }
}
