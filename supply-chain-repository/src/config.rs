//! Connection configuration for the external stores.

use std::fmt;

use crate::errors::SourceError;

/// Default database name.
pub const DEFAULT_DATABASE: &str = "airflow";

/// Default database user.
pub const DEFAULT_USER: &str = "airflow";

/// Default database password.
pub const DEFAULT_PASSWORD: &str = "airflow";

/// Default database host.
pub const DEFAULT_HOST: &str = "postgres";

/// Default database port.
pub const DEFAULT_PORT: u16 = 5432;

/// Default source table.
pub const DEFAULT_TABLE: &str = "supply_chain";

/// Default search engine URL.
pub const DEFAULT_SEARCH_URL: &str = "http://elasticsearch:9200";

/// Default index name.
pub const DEFAULT_INDEX_NAME: &str = "supply_chain";

/// Connection settings for the PostgreSQL source.
#[derive(Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    /// Database name.
    pub database: String,
    /// Login user.
    pub user: String,
    /// Login password.
    pub password: String,
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Table to extract, optionally schema-qualified (`schema.table`).
    pub table: String,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database: DEFAULT_DATABASE.to_string(),
            user: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            table: DEFAULT_TABLE.to_string(),
        }
    }
}

impl fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("table", &self.table)
            .finish()
    }
}

impl PostgresConfig {
    /// Check that the table name is a plain identifier.
    ///
    /// The name is interpolated into the select statement, so only
    /// `[A-Za-z_][A-Za-z0-9_]*`, optionally prefixed by one schema of the same
    /// shape, is accepted.
    pub fn validate(&self) -> Result<(), SourceError> {
        let parts: Vec<&str> = self.table.split('.').collect();
        if parts.len() > 2 || !parts.iter().all(|p| is_identifier(p)) {
            return Err(SourceError::invalid_config(format!(
                "invalid table name: {:?}",
                self.table
            )));
        }
        Ok(())
    }

    /// The full-table select statement.
    pub fn select_query(&self) -> Result<String, SourceError> {
        self.validate()?;
        Ok(format!("SELECT * FROM {};", self.table))
    }

    /// The table name split into an optional schema and the bare name.
    pub fn table_parts(&self) -> (Option<&str>, &str) {
        match self.table.split_once('.') {
            Some((schema, name)) => (Some(schema), name),
            None => (None, self.table.as_str()),
        }
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Connection settings for the search engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchIndexConfig {
    /// Search engine URL.
    pub url: String,
    /// Index receiving the documents.
    pub index_name: String,
}

impl Default for SearchIndexConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SEARCH_URL.to_string(),
            index_name: DEFAULT_INDEX_NAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_select_query() {
        let config = PostgresConfig::default();
        assert_eq!(config.select_query().unwrap(), "SELECT * FROM supply_chain;");
    }

    #[test]
    fn test_schema_qualified_table() {
        let config = PostgresConfig {
            table: "public.supply_chain".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.table_parts(), (Some("public"), "supply_chain"));
    }

    #[test]
    fn test_rejects_injection() {
        for table in ["supply_chain; DROP TABLE x", "a.b.c", "1table", "", "sc\"x"] {
            let config = PostgresConfig {
                table: table.to_string(),
                ..Default::default()
            };
            assert!(
                matches!(config.select_query(), Err(SourceError::InvalidConfig(_))),
                "accepted {table:?}"
            );
        }
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = PostgresConfig {
            password: "hunter2".to_string(),
            ..Default::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
