//! Dependency initialization and wiring for the supply chain indexer.

use std::sync::Arc;
use tracing::info;

use crate::IndexingError;
use supply_chain_pipeline::{
    cleaner::Cleaner,
    extractor::Extractor,
    loader::SearchLoader,
    orchestrator::{Orchestrator, StartStage},
    schedule::DagDefinition,
    PipelineConfig,
};
use supply_chain_repository::{OpenSearchClient, PostgresSource};

/// Builds the pipeline stages from configuration.
///
/// Each stage is built on demand, so a single-stage command never opens a
/// client it does not use. Building a client does not connect; connections
/// are opened when a stage runs.
pub struct Dependencies {
    config: PipelineConfig,
}

impl Dependencies {
    /// Create the wiring for the given configuration.
    pub fn new(config: PipelineConfig) -> Self {
        info!(
            source = ?config.source,
            raw_snapshot = %config.snapshots.raw.display(),
            clean_snapshot = %config.snapshots.clean.display(),
            search_url = %config.search.url,
            index = %config.search.index_name,
            "Initializing dependencies"
        );
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Extractor reading from PostgreSQL into the raw snapshot.
    pub fn extractor(&self) -> Result<Extractor, IndexingError> {
        let source = PostgresSource::new(self.config.source.clone())?;
        Ok(Extractor::new(
            Arc::new(source),
            &self.config.snapshots.raw,
        ))
    }

    /// Cleaner from the raw to the clean snapshot.
    pub fn cleaner(&self) -> Cleaner {
        Cleaner::new(&self.config.snapshots.raw, &self.config.snapshots.clean)
    }

    /// Loader from the clean snapshot into the search index.
    pub fn loader(&self) -> Result<SearchLoader, IndexingError> {
        let client = OpenSearchClient::new(&self.config.search)?;
        Ok(SearchLoader::with_config(
            Arc::new(client),
            &self.config.snapshots.clean,
            self.config.loader.clone(),
        ))
    }

    /// The DAG described by the schedule configuration.
    pub fn dag(&self) -> Result<DagDefinition, IndexingError> {
        Ok(DagDefinition::from_config(&self.config.schedule)?)
    }

    /// Orchestrator running the full chain with the DAG's retry policy.
    pub fn orchestrator(&self) -> Result<Orchestrator, IndexingError> {
        let dag = self.dag()?;
        let orchestrator = Orchestrator::for_dag(
            &dag,
            vec![
                Box::new(StartStage),
                Box::new(self.extractor()?),
                Box::new(self.cleaner()),
                Box::new(self.loader()?),
            ],
        )?;
        Ok(orchestrator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supply_chain_pipeline::schedule::{
        TASK_DATA_CLEANING, TASK_FETCH_DATA, TASK_INSERT_DATA, TASK_STARTING,
    };

    #[test]
    fn test_orchestrator_wiring() {
        let deps = Dependencies::new(PipelineConfig::default());

        let orchestrator = deps.orchestrator().unwrap();

        assert_eq!(
            orchestrator.task_ids(),
            vec![TASK_STARTING, TASK_FETCH_DATA, TASK_DATA_CLEANING, TASK_INSERT_DATA]
        );
    }

    #[test]
    fn test_invalid_table_name_rejected() {
        let mut config = PipelineConfig::default();
        config.source.table = "supply_chain; DROP TABLE x".to_string();

        let result = Dependencies::new(config).extractor();
        assert!(matches!(result, Err(IndexingError::SourceError(_))));
    }

    #[test]
    fn test_invalid_search_url_rejected() {
        let mut config = PipelineConfig::default();
        config.search.url = "not a url".to_string();

        let result = Dependencies::new(config).loader();
        assert!(matches!(result, Err(IndexingError::SearchError(_))));
    }

    #[test]
    fn test_invalid_cron_rejected() {
        let mut config = PipelineConfig::default();
        config.schedule.cron = "*/5 * * * *".to_string();

        let result = Dependencies::new(config).dag();
        assert!(matches!(result, Err(IndexingError::PipelineError(_))));
    }
}
