//! In-memory tabular data passed between pipeline stages.

/// A fully materialized table: a header and rows of nullable text cells.
///
/// Every row holds exactly one cell per column. `None` represents a null
/// (SQL `NULL` on extraction, an empty field in a snapshot file).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Column names, in source order.
    pub columns: Vec<String>,
    /// Row cells, each row aligned with `columns`.
    pub rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Create an empty table with the given header.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding with nulls or truncating to the header width.
    pub fn push_row(&mut self, mut row: Vec<Option<String>>) {
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    /// Index of the first column with the given name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell value at `row`/`column`, `None` for nulls and out-of-range lookups.
    pub fn value(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|cell| cell.as_deref())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Non-null cells of a column, in row order.
    pub fn column_values(&self, column: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .filter_map(move |r| r.get(column).and_then(|cell| cell.as_deref()))
    }
}
