//! CSV snapshot files handed between stages.
//!
//! A snapshot has a header row followed by one line per table row. Nulls are
//! written as empty fields, and every empty field reads back as a null.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::errors::PipelineError;
use supply_chain_shared::columns::ROW_INDEX_COLUMN;
use supply_chain_shared::Table;

/// Whether a snapshot gets a leading row-index column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowIndex {
    /// Data columns only.
    Omit,
    /// A leading column with an empty header and values `0..n`.
    Include,
}

/// Read a snapshot file fully into memory.
pub fn read_snapshot(path: &Path) -> Result<Table, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| PipelineError::snapshot(format!("{}: {}", path.display(), e)))?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| PipelineError::snapshot(format!("{}: {}", path.display(), e)))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut table = Table::new(columns);
    for record in reader.records() {
        let record =
            record.map_err(|e| PipelineError::snapshot(format!("{}: {}", path.display(), e)))?;
        let cells = record
            .iter()
            .map(|field| (!field.is_empty()).then(|| field.to_string()))
            .collect();
        table.push_row(cells);
    }

    debug!(
        path = %path.display(),
        rows = table.len(),
        columns = table.columns.len(),
        "Read snapshot"
    );
    Ok(table)
}

/// Write a table to a snapshot file, replacing any previous content.
pub fn write_snapshot(path: &Path, table: &Table, index: RowIndex) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| PipelineError::snapshot(format!("{}: {}", path.display(), e)))?;
    let map_err = |e: csv::Error| PipelineError::snapshot(format!("{}: {}", path.display(), e));

    let mut header: Vec<&str> = Vec::with_capacity(table.columns.len() + 1);
    if index == RowIndex::Include {
        header.push(ROW_INDEX_COLUMN);
    }
    header.extend(table.columns.iter().map(String::as_str));
    writer.write_record(&header).map_err(map_err)?;

    for (position, row) in table.rows.iter().enumerate() {
        let mut record: Vec<String> = Vec::with_capacity(row.len() + 1);
        if index == RowIndex::Include {
            record.push(position.to_string());
        }
        record.extend(row.iter().map(|cell| cell.clone().unwrap_or_default()));
        writer.write_record(&record).map_err(map_err)?;
    }

    writer.flush()?;

    debug!(
        path = %path.display(),
        rows = table.len(),
        index = ?index,
        "Wrote snapshot"
    );
    Ok(())
}
