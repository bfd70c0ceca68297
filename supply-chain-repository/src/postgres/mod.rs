//! PostgreSQL implementation of the table source.

mod source;

pub use source::PostgresSource;
