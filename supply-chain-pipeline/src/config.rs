//! Configuration types for the pipeline stages.
//!
//! Everything a run needs is carried in [`PipelineConfig`] and handed to each
//! stage explicitly, so tests can point stages at temporary files and fake
//! stores.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use supply_chain_repository::{PostgresConfig, SearchIndexConfig};

/// Default raw snapshot path.
pub const DEFAULT_RAW_SNAPSHOT: &str = "/opt/airflow/dags/P2M3_agus_susanto_data_raw.csv";

/// Default clean snapshot path.
pub const DEFAULT_CLEAN_SNAPSHOT: &str = "/opt/airflow/dags/P2M3_agus_susanto_data_clean.csv";

/// Default DAG identifier.
pub const DEFAULT_DAG_ID: &str = "SupplyChainDB";

/// Default task owner label.
pub const DEFAULT_OWNER: &str = "agus";

/// Default trigger: every day at 06:30.
pub const DEFAULT_CRON: &str = "30 6 * * *";

/// Default number of retries per task.
pub const DEFAULT_RETRIES: u32 = 1;

/// Default delay between a failed attempt and its retry.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5 * 60);

/// Locations of the two handoff files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPaths {
    /// Written by the extractor, read by the cleaner.
    pub raw: PathBuf,
    /// Written by the cleaner, read by the loader.
    pub clean: PathBuf,
}

impl Default for SnapshotPaths {
    fn default() -> Self {
        Self {
            raw: PathBuf::from(DEFAULT_RAW_SNAPSHOT),
            clean: PathBuf::from(DEFAULT_CLEAN_SNAPSHOT),
        }
    }
}

/// Configuration for the search loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Ping the engine before loading and count documents afterwards.
    /// Neither result can fail the stage.
    pub verify_connection: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            verify_connection: true,
        }
    }
}

/// Scheduling metadata for the task chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// DAG identifier.
    pub dag_id: String,
    /// Task owner label.
    pub owner: String,
    /// Five-field cron expression for the daily trigger.
    pub cron: String,
    /// First instant the DAG may run.
    pub start_date: DateTime<Utc>,
    /// Automatic retries per failed task.
    pub retries: u32,
    /// Delay before each retry.
    pub retry_delay: Duration,
    /// Whether missed intervals are back-filled.
    pub catchup: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            dag_id: DEFAULT_DAG_ID.to_string(),
            owner: DEFAULT_OWNER.to_string(),
            cron: DEFAULT_CRON.to_string(),
            start_date: default_start_date(),
            retries: DEFAULT_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            catchup: false,
        }
    }
}

/// 2024-01-26 03:30 at UTC+8, i.e. 2024-01-25 19:30 UTC.
fn default_start_date() -> DateTime<Utc> {
    let date = NaiveDate::from_ymd_opt(2024, 1, 25).unwrap_or_default();
    let time = NaiveTime::from_hms_opt(19, 30, 0).unwrap_or_default();
    Utc.from_utc_datetime(&date.and_time(time))
}

/// Complete configuration for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Source database and table.
    pub source: PostgresConfig,
    /// Handoff file locations.
    pub snapshots: SnapshotPaths,
    /// Search engine address and index.
    pub search: SearchIndexConfig,
    /// Loader behavior.
    pub loader: LoaderConfig,
    /// Task chain scheduling metadata.
    pub schedule: ScheduleConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_start_date() {
        let config = ScheduleConfig::default();
        assert_eq!(config.start_date.to_rfc3339(), "2024-01-25T19:30:00+00:00");
    }

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.source.table, "supply_chain");
        assert_eq!(config.search.index_name, "supply_chain");
        assert_eq!(config.schedule.retries, 1);
        assert_eq!(config.schedule.retry_delay, Duration::from_secs(300));
        assert!(!config.schedule.catchup);
        assert!(config.loader.verify_connection);
        assert_ne!(config.snapshots.raw, config.snapshots.clean);
        assert_eq!(config.schedule.owner, "agus");
        assert_eq!(
            config.snapshots.raw,
            PathBuf::from("/opt/airflow/dags/P2M3_agus_susanto_data_raw.csv")
        );
        assert_eq!(
            config.snapshots.clean,
            PathBuf::from("/opt/airflow/dags/P2M3_agus_susanto_data_clean.csv")
        );
    }
}
