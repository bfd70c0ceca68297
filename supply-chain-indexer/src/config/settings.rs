//! Pipeline configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::IndexingError;
use supply_chain_pipeline::config::{LoaderConfig, ScheduleConfig, SnapshotPaths};
use supply_chain_pipeline::PipelineConfig;
use supply_chain_repository::{PostgresConfig, SearchIndexConfig};

const POSTGRES_DB: &str = "POSTGRES_DB";
const POSTGRES_USER: &str = "POSTGRES_USER";
const POSTGRES_PASSWORD: &str = "POSTGRES_PASSWORD";
const POSTGRES_HOST: &str = "POSTGRES_HOST";
const POSTGRES_PORT: &str = "POSTGRES_PORT";
const SOURCE_TABLE: &str = "SOURCE_TABLE";
const RAW_SNAPSHOT_PATH: &str = "RAW_SNAPSHOT_PATH";
const CLEAN_SNAPSHOT_PATH: &str = "CLEAN_SNAPSHOT_PATH";
const ELASTICSEARCH_URL: &str = "ELASTICSEARCH_URL";
const SEARCH_INDEX: &str = "SEARCH_INDEX";
const VERIFY_CONNECTION: &str = "VERIFY_CONNECTION";
const DAG_ID: &str = "DAG_ID";
const DAG_OWNER: &str = "DAG_OWNER";
const SCHEDULE_CRON: &str = "SCHEDULE_CRON";
const TASK_RETRIES: &str = "TASK_RETRIES";
const TASK_RETRY_DELAY_SECS: &str = "TASK_RETRY_DELAY_SECS";

/// Load the pipeline configuration from the process environment.
///
/// # Environment Variables
///
/// - `POSTGRES_DB`, `POSTGRES_USER`, `POSTGRES_PASSWORD`: credentials (default: airflow)
/// - `POSTGRES_HOST`: database host (default: postgres)
/// - `POSTGRES_PORT`: database port (default: 5432)
/// - `SOURCE_TABLE`: table to extract (default: supply_chain)
/// - `RAW_SNAPSHOT_PATH`, `CLEAN_SNAPSHOT_PATH`: handoff files
/// - `ELASTICSEARCH_URL`: search engine URL (default: http://elasticsearch:9200)
/// - `SEARCH_INDEX`: target index (default: supply_chain)
/// - `VERIFY_CONNECTION`: ping and count around the load (default: true)
/// - `DAG_ID`, `DAG_OWNER`, `SCHEDULE_CRON`: scheduling metadata
/// - `TASK_RETRIES`, `TASK_RETRY_DELAY_SECS`: retry policy (default: 1, 300)
pub fn load_config() -> Result<PipelineConfig, IndexingError> {
    config_from_lookup(|key| env::var(key).ok())
}

/// Build the pipeline configuration from a variable lookup.
///
/// Unset variables take their defaults. Set but malformed numeric or
/// boolean values are configuration errors.
pub fn config_from_lookup<F>(lookup: F) -> Result<PipelineConfig, IndexingError>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = PipelineConfig::default();
    let string = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

    let source = PostgresConfig {
        database: string(POSTGRES_DB, &defaults.source.database),
        user: string(POSTGRES_USER, &defaults.source.user),
        password: string(POSTGRES_PASSWORD, &defaults.source.password),
        host: string(POSTGRES_HOST, &defaults.source.host),
        port: parse_var(&lookup, POSTGRES_PORT, defaults.source.port)?,
        table: string(SOURCE_TABLE, &defaults.source.table),
    };

    let snapshots = SnapshotPaths {
        raw: lookup(RAW_SNAPSHOT_PATH)
            .map(PathBuf::from)
            .unwrap_or(defaults.snapshots.raw),
        clean: lookup(CLEAN_SNAPSHOT_PATH)
            .map(PathBuf::from)
            .unwrap_or(defaults.snapshots.clean),
    };

    let search = SearchIndexConfig {
        url: string(ELASTICSEARCH_URL, &defaults.search.url),
        index_name: string(SEARCH_INDEX, &defaults.search.index_name),
    };

    let loader = LoaderConfig {
        verify_connection: match lookup(VERIFY_CONNECTION) {
            Some(value) => parse_bool(VERIFY_CONNECTION, &value)?,
            None => defaults.loader.verify_connection,
        },
    };

    let retry_delay_secs = parse_var(
        &lookup,
        TASK_RETRY_DELAY_SECS,
        defaults.schedule.retry_delay.as_secs(),
    )?;
    let schedule = ScheduleConfig {
        dag_id: string(DAG_ID, &defaults.schedule.dag_id),
        owner: string(DAG_OWNER, &defaults.schedule.owner),
        cron: string(SCHEDULE_CRON, &defaults.schedule.cron),
        retries: parse_var(&lookup, TASK_RETRIES, defaults.schedule.retries)?,
        retry_delay: Duration::from_secs(retry_delay_secs),
        ..defaults.schedule
    };

    Ok(PipelineConfig {
        source,
        snapshots,
        search,
        loader,
        schedule,
    })
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, IndexingError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| IndexingError::config(format!("{}={:?}: {}", key, value, e))),
        None => Ok(default),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, IndexingError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(IndexingError::config(format!(
            "{}={:?}: expected true or false",
            key, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = config_from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.source.host, "postgres");
        assert_eq!(config.search.url, "http://elasticsearch:9200");
    }

    #[test]
    fn test_overrides() {
        let config = config_from_lookup(lookup(&[
            (POSTGRES_HOST, "db.internal"),
            (POSTGRES_PORT, "6543"),
            (SOURCE_TABLE, "public.supply_chain"),
            (CLEAN_SNAPSHOT_PATH, "/tmp/clean.csv"),
            (ELASTICSEARCH_URL, "http://localhost:9200"),
            (VERIFY_CONNECTION, "false"),
            (TASK_RETRIES, "3"),
            (TASK_RETRY_DELAY_SECS, "10"),
        ]))
        .unwrap();

        assert_eq!(config.source.host, "db.internal");
        assert_eq!(config.source.port, 6543);
        assert_eq!(config.source.table, "public.supply_chain");
        assert_eq!(config.snapshots.clean, PathBuf::from("/tmp/clean.csv"));
        assert_eq!(config.search.url, "http://localhost:9200");
        assert!(!config.loader.verify_connection);
        assert_eq!(config.schedule.retries, 3);
        assert_eq!(config.schedule.retry_delay, Duration::from_secs(10));
        // Untouched settings keep their defaults
        assert_eq!(config.search.index_name, "supply_chain");
        assert_eq!(config.schedule.cron, "30 6 * * *");
    }

    #[test]
    fn test_malformed_port() {
        let result = config_from_lookup(lookup(&[(POSTGRES_PORT, "not-a-port")]));
        assert!(matches!(result, Err(IndexingError::ConfigError(_))));
    }

    #[test]
    fn test_malformed_bool() {
        let result = config_from_lookup(lookup(&[(VERIFY_CONNECTION, "maybe")]));
        assert!(matches!(result, Err(IndexingError::ConfigError(_))));
    }

    #[test]
    fn test_negative_retries() {
        let result = config_from_lookup(lookup(&[(TASK_RETRIES, "-1")]));
        assert!(matches!(result, Err(IndexingError::ConfigError(_))));
    }
}
