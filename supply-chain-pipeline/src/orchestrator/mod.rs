//! Orchestrator module for the supply chain pipeline.
//!
//! Runs the stages of the task chain in order, retrying each failed stage
//! with a fixed delay before giving up on the whole run.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info, instrument, warn};

use crate::cleaner::Cleaner;
use crate::config::{DEFAULT_RETRIES, DEFAULT_RETRY_DELAY};
use crate::errors::PipelineError;
use crate::extractor::Extractor;
use crate::loader::SearchLoader;
use crate::schedule::{
    DagDefinition, TASK_DATA_CLEANING, TASK_FETCH_DATA, TASK_INSERT_DATA, TASK_STARTING,
};

/// An independently invocable unit of the task chain.
///
/// Stages share nothing but the snapshot files, so a scheduler may run any
/// one of them on its own, in a separate process.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Task identifier in the DAG.
    fn task_id(&self) -> &str;

    /// Run the stage to completion.
    async fn execute(&self) -> Result<(), PipelineError>;
}

/// No-op root task.
pub struct StartStage;

#[async_trait]
impl Stage for StartStage {
    fn task_id(&self) -> &str {
        TASK_STARTING
    }

    async fn execute(&self) -> Result<(), PipelineError> {
        info!("Starting supply chain pipeline");
        Ok(())
    }
}

#[async_trait]
impl Stage for Extractor {
    fn task_id(&self) -> &str {
        TASK_FETCH_DATA
    }

    async fn execute(&self) -> Result<(), PipelineError> {
        self.run().await.map(|_| ())
    }
}

#[async_trait]
impl Stage for Cleaner {
    fn task_id(&self) -> &str {
        TASK_DATA_CLEANING
    }

    async fn execute(&self) -> Result<(), PipelineError> {
        self.run().map(|_| ())
    }
}

#[async_trait]
impl Stage for SearchLoader {
    fn task_id(&self) -> &str {
        TASK_INSERT_DATA
    }

    async fn execute(&self) -> Result<(), PipelineError> {
        self.run().await.map(|_| ())
    }
}

/// Retry behavior applied to every stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first failure.
    pub retries: u32,
    /// Wait before each extra attempt.
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// Attempts used by one successful stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRun {
    pub task_id: String,
    pub attempts: u32,
}

/// Outcome of a complete run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub tasks: Vec<TaskRun>,
}

/// Local runner for the linear task chain.
pub struct Orchestrator {
    stages: Vec<Box<dyn Stage>>,
    retry: RetryPolicy,
}

impl Orchestrator {
    /// Create an orchestrator running `stages` in the given order.
    pub fn new(stages: Vec<Box<dyn Stage>>, retry: RetryPolicy) -> Self {
        Self { stages, retry }
    }

    /// Create an orchestrator following the DAG's task order and retry policy.
    ///
    /// Every DAG task needs exactly one stage with a matching task id.
    pub fn for_dag(
        dag: &DagDefinition,
        mut stages: Vec<Box<dyn Stage>>,
    ) -> Result<Self, PipelineError> {
        let order = dag.execution_order()?;

        let mut ordered = Vec::with_capacity(order.len());
        for task_id in order {
            let position = stages
                .iter()
                .position(|s| s.task_id() == task_id)
                .ok_or_else(|| {
                    PipelineError::schedule(format!("no stage for task {}", task_id))
                })?;
            ordered.push(stages.remove(position));
        }

        if let Some(extra) = stages.first() {
            return Err(PipelineError::schedule(format!(
                "stage {} is not part of DAG {}",
                extra.task_id(),
                dag.dag_id
            )));
        }

        Ok(Self::new(ordered, dag.retry_policy()))
    }

    /// Task ids in run order.
    pub fn task_ids(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.task_id()).collect()
    }

    /// Run every stage in order.
    ///
    /// A stage that still fails after all retries stops the run; downstream
    /// stages are not started.
    #[instrument(skip(self), fields(stages = self.stages.len()))]
    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        let mut report = RunReport::default();

        for stage in &self.stages {
            let attempts = self.run_stage(stage.as_ref()).await?;
            report.tasks.push(TaskRun {
                task_id: stage.task_id().to_string(),
                attempts,
            });
        }

        info!(tasks = report.tasks.len(), "Pipeline run complete");
        Ok(report)
    }

    /// Run one stage with retries, returning the attempts it took.
    async fn run_stage(&self, stage: &dyn Stage) -> Result<u32, PipelineError> {
        let task_id = stage.task_id();
        let mut attempt = 1;

        loop {
            info!(task_id = task_id, attempt = attempt, "Running task");
            match stage.execute().await {
                Ok(()) => {
                    info!(task_id = task_id, attempt = attempt, "Task succeeded");
                    return Ok(attempt);
                }
                Err(e) if attempt <= self.retry.retries => {
                    warn!(
                        task_id = task_id,
                        attempt = attempt,
                        error = %e,
                        delay_secs = self.retry.retry_delay.as_secs(),
                        "Task failed, retrying"
                    );
                    tokio::time::sleep(self.retry.retry_delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!(task_id = task_id, attempt = attempt, error = %e, "Task failed");
                    return Err(PipelineError::stage_failed(task_id, attempt, e));
                }
            }
        }
    }
}
