//! # Supply Chain Shared
//!
//! Shared types used across the supply chain indexer crates: the in-memory
//! table every stage passes around, the well-known column names, and the
//! search document built from a cleaned row.

pub mod columns;
pub mod document;
pub mod table;

pub use columns::normalize_column_name;
pub use document::{ColumnKind, Document};
pub use table::Table;
