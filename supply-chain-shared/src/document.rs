//! Search documents built from cleaned table rows.
//!
//! Snapshot cells are untyped text. Before a row becomes a document each
//! column gets a single JSON type inferred over all of its non-null cells,
//! so the same field never changes type from one document to the next.

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::table::Table;

/// JSON type assigned to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every non-null cell parses as a 64-bit integer.
    Integer,
    /// Every non-null cell parses as a float.
    Float,
    /// Every non-null cell is `true` or `false`.
    Boolean,
    /// Anything else, including all-null columns.
    Text,
}

impl ColumnKind {
    /// Infer the kind of a column from its non-null cells.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut integer = true;
        let mut float = true;
        let mut boolean = true;
        let mut seen = false;

        for value in values {
            seen = true;
            let value = value.trim();
            integer = integer && value.parse::<i64>().is_ok();
            float = float && value.parse::<f64>().is_ok();
            boolean = boolean && parse_bool(value).is_some();
            if !integer && !float && !boolean {
                return Self::Text;
            }
        }

        match (seen, integer, float, boolean) {
            (false, ..) => Self::Text,
            (true, true, _, _) => Self::Integer,
            (true, false, true, _) => Self::Float,
            (true, false, false, true) => Self::Boolean,
            _ => Self::Text,
        }
    }

    /// Infer the kind of every column of a table.
    pub fn infer_all(table: &Table) -> Vec<Self> {
        (0..table.columns.len())
            .map(|column| Self::infer(table.column_values(column)))
            .collect()
    }

    /// Convert a cell into a JSON value of this kind.
    ///
    /// Nulls and non-finite floats become `null`. A cell that does not fit
    /// the kind falls back to a string.
    pub fn to_json(self, cell: Option<&str>) -> Value {
        let Some(raw) = cell else {
            return Value::Null;
        };
        let trimmed = raw.trim();
        match self {
            Self::Integer => trimmed
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(raw.to_string())),
            Self::Float => match trimmed.parse::<f64>() {
                Ok(v) => Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null),
                Err(_) => Value::String(raw.to_string()),
            },
            Self::Boolean => parse_bool(trimmed)
                .map(Value::Bool)
                .unwrap_or_else(|| Value::String(raw.to_string())),
            Self::Text => Value::String(raw.to_string()),
        }
    }
}

/// PostgreSQL renders booleans as `t`/`f` in text form.
fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("t") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") || value.eq_ignore_ascii_case("f") {
        Some(false)
    } else {
        None
    }
}

/// A JSON document submitted to the search index.
///
/// Field names are the cleaned column names. The document carries no
/// identifier of its own; the search engine assigns one on submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document {
    fields: Map<String, Value>,
}

impl Document {
    /// Build a document from one table row.
    ///
    /// `kinds` must be aligned with `table.columns`. Columns listed in
    /// `skip` (by index) are left out.
    pub fn from_row(table: &Table, row: usize, kinds: &[ColumnKind], skip: &[usize]) -> Self {
        let mut fields = Map::new();
        for (column, name) in table.columns.iter().enumerate() {
            if skip.contains(&column) {
                continue;
            }
            let kind = kinds.get(column).copied().unwrap_or(ColumnKind::Text);
            fields.insert(name.clone(), kind.to_json(table.value(row, column)));
        }
        Self { fields }
    }

    /// Field value by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The document as a JSON value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

impl From<Map<String, Value>> for Document {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}
