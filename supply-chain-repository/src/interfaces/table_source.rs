//! Source table trait definition.

use async_trait::async_trait;

use crate::errors::SourceError;
use supply_chain_shared::Table;

/// Reads the complete source table.
///
/// Implementations return every row with no filtering or pagination, cells
/// rendered as text and SQL `NULL` as `None`. Each call opens and closes its
/// own connection.
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Fetch the whole table into memory.
    async fn fetch_table(&self) -> Result<Table, SourceError>;
}
