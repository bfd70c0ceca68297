//! DAG definition for an external scheduler.
//!
//! Describes the task chain, its daily trigger and its retry policy. The
//! scheduler itself is not part of this crate; the `schedule` command only
//! prints this definition and the next trigger time.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, NaiveTime, TimeZone, Timelike, Utc};

use crate::config::ScheduleConfig;
use crate::errors::PipelineError;
use crate::orchestrator::RetryPolicy;

/// No-op task marking the start of a run.
pub const TASK_STARTING: &str = "starting";

/// Extractor task.
pub const TASK_FETCH_DATA: &str = "fetch_data";

/// Cleaner task.
pub const TASK_DATA_CLEANING: &str = "data_cleaning";

/// Loader task.
pub const TASK_INSERT_DATA: &str = "insert_data_to_elastic";

/// A trigger firing once a day at a fixed UTC time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    time: NaiveTime,
}

impl DailySchedule {
    /// Parse a five-field cron expression of the form `M H * * *`.
    pub fn parse(expression: &str) -> Result<Self, PipelineError> {
        let fields: Vec<&str> = expression.split_whitespace().collect();
        let [minute, hour, day, month, weekday] = fields.as_slice() else {
            return Err(PipelineError::schedule(format!(
                "expected 5 cron fields, got {}: {:?}",
                fields.len(),
                expression
            )));
        };

        if [day, month, weekday].iter().any(|f| **f != "*") {
            return Err(PipelineError::schedule(format!(
                "only daily schedules are supported: {:?}",
                expression
            )));
        }

        let minute: u32 = minute
            .parse()
            .map_err(|_| PipelineError::schedule(format!("invalid minute: {:?}", minute)))?;
        let hour: u32 = hour
            .parse()
            .map_err(|_| PipelineError::schedule(format!("invalid hour: {:?}", hour)))?;
        let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
            PipelineError::schedule(format!("time out of range: {:?}", expression))
        })?;

        Ok(Self { time })
    }

    /// Time of day the trigger fires.
    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// The cron expression for this schedule.
    pub fn expression(&self) -> String {
        format!("{} {} * * *", self.time.minute(), self.time.hour())
    }

    /// First trigger strictly after `after`.
    pub fn next_after(&self, after: DateTime<Utc>) -> DateTime<Utc> {
        let candidate = Utc.from_utc_datetime(&after.date_naive().and_time(self.time));
        if candidate > after {
            candidate
        } else {
            candidate + chrono::Duration::days(1)
        }
    }
}

/// A task and the task it runs after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    pub task_id: String,
    pub upstream: Option<String>,
}

impl TaskSpec {
    fn new(task_id: &str, upstream: Option<&str>) -> Self {
        Self {
            task_id: task_id.to_string(),
            upstream: upstream.map(str::to_string),
        }
    }
}

/// The supply chain DAG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DagDefinition {
    pub dag_id: String,
    pub owner: String,
    pub start_date: DateTime<Utc>,
    pub schedule: DailySchedule,
    pub retries: u32,
    pub retry_delay: Duration,
    pub catchup: bool,
    pub tasks: Vec<TaskSpec>,
}

impl DagDefinition {
    /// Build the DAG from configuration.
    pub fn from_config(config: &ScheduleConfig) -> Result<Self, PipelineError> {
        Ok(Self {
            dag_id: config.dag_id.clone(),
            owner: config.owner.clone(),
            start_date: config.start_date,
            schedule: DailySchedule::parse(&config.cron)?,
            retries: config.retries,
            retry_delay: config.retry_delay,
            catchup: config.catchup,
            tasks: vec![
                TaskSpec::new(TASK_STARTING, None),
                TaskSpec::new(TASK_FETCH_DATA, Some(TASK_STARTING)),
                TaskSpec::new(TASK_DATA_CLEANING, Some(TASK_FETCH_DATA)),
                TaskSpec::new(TASK_INSERT_DATA, Some(TASK_DATA_CLEANING)),
            ],
        })
    }

    /// Task ids in execution order.
    ///
    /// Fails unless the tasks form a single chain: one root, and every other
    /// task directly downstream of exactly one predecessor with no branching.
    pub fn execution_order(&self) -> Result<Vec<&str>, PipelineError> {
        let mut roots = self.tasks.iter().filter(|t| t.upstream.is_none());
        let root = roots
            .next()
            .ok_or_else(|| PipelineError::schedule("task chain has no root"))?;
        if let Some(extra) = roots.next() {
            return Err(PipelineError::schedule(format!(
                "task chain has more than one root: {} and {}",
                root.task_id, extra.task_id
            )));
        }

        let mut order = vec![root.task_id.as_str()];
        let mut current = root.task_id.as_str();
        loop {
            let mut downstream = self
                .tasks
                .iter()
                .filter(|t| t.upstream.as_deref() == Some(current));
            let Some(next) = downstream.next() else {
                break;
            };
            if downstream.next().is_some() {
                return Err(PipelineError::schedule(format!(
                    "task {} has more than one downstream task",
                    current
                )));
            }
            if order.contains(&next.task_id.as_str()) {
                return Err(PipelineError::schedule(format!(
                    "task chain loops back to {}",
                    next.task_id
                )));
            }
            order.push(next.task_id.as_str());
            current = next.task_id.as_str();
        }

        if order.len() != self.tasks.len() {
            return Err(PipelineError::schedule(format!(
                "{} task(s) are not reachable from {}",
                self.tasks.len() - order.len(),
                root.task_id
            )));
        }

        Ok(order)
    }

    /// Next trigger after `now`, never before the start date.
    pub fn next_run_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        if now < self.start_date {
            self.schedule
                .next_after(self.start_date - chrono::Duration::nanoseconds(1))
        } else {
            self.schedule.next_after(now)
        }
    }

    /// Retry policy applied to every task.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            retries: self.retries,
            retry_delay: self.retry_delay,
        }
    }
}

impl fmt::Display for DagDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "dag: {}", self.dag_id)?;
        writeln!(f, "owner: {}", self.owner)?;
        writeln!(f, "schedule: {}", self.schedule.expression())?;
        writeln!(f, "start_date: {}", self.start_date.to_rfc3339())?;
        writeln!(
            f,
            "retries: {} (delay {}s)",
            self.retries,
            self.retry_delay.as_secs()
        )?;
        writeln!(f, "catchup: {}", self.catchup)?;
        let chain = match self.execution_order() {
            Ok(order) => order.join(" >> "),
            Err(_) => self
                .tasks
                .iter()
                .map(|t| t.task_id.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        };
        write!(f, "tasks: {}", chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn dag() -> DagDefinition {
        DagDefinition::from_config(&ScheduleConfig::default()).unwrap()
    }

    #[test]
    fn test_parse_daily() {
        let schedule = DailySchedule::parse("30 6 * * *").unwrap();
        assert_eq!(schedule.time(), NaiveTime::from_hms_opt(6, 30, 0).unwrap());
        assert_eq!(schedule.expression(), "30 6 * * *");
    }

    #[test]
    fn test_parse_rejects_other_forms() {
        for expr in ["", "30 6 * *", "30 6 * * 1", "*/5 * * * *", "60 6 * * *", "0 24 * * *"] {
            assert!(
                matches!(DailySchedule::parse(expr), Err(PipelineError::ScheduleError(_))),
                "{expr:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_next_after() {
        let schedule = DailySchedule::parse("30 6 * * *").unwrap();

        assert_eq!(
            schedule.next_after(at("2024-03-01T05:00:00Z")),
            at("2024-03-01T06:30:00Z")
        );
        // Strictly after
        assert_eq!(
            schedule.next_after(at("2024-03-01T06:30:00Z")),
            at("2024-03-02T06:30:00Z")
        );
        assert_eq!(
            schedule.next_after(at("2024-12-31T23:00:00Z")),
            at("2025-01-01T06:30:00Z")
        );
    }

    #[test]
    fn test_next_run_not_before_start_date() {
        let dag = dag();

        assert_eq!(
            dag.next_run_after(at("2020-01-01T00:00:00Z")),
            at("2024-01-26T06:30:00Z")
        );
        assert_eq!(
            dag.next_run_after(at("2024-06-01T07:00:00Z")),
            at("2024-06-02T06:30:00Z")
        );
    }

    #[test]
    fn test_default_chain() {
        let dag = dag();

        assert_eq!(
            dag.execution_order().unwrap(),
            vec![TASK_STARTING, TASK_FETCH_DATA, TASK_DATA_CLEANING, TASK_INSERT_DATA]
        );
        assert_eq!(dag.retry_policy().retries, 1);
        assert_eq!(dag.retry_policy().retry_delay, Duration::from_secs(300));
        assert!(!dag.catchup);
    }

    #[test]
    fn test_branching_chain_rejected() {
        let mut dag = dag();
        dag.tasks.push(TaskSpec::new("side", Some(TASK_FETCH_DATA)));

        assert!(dag.execution_order().is_err());
    }

    #[test]
    fn test_second_root_rejected() {
        let mut dag = dag();
        dag.tasks.push(TaskSpec::new("orphan", None));

        assert!(dag.execution_order().is_err());
    }

    #[test]
    fn test_unreachable_task_rejected() {
        let mut dag = dag();
        dag.tasks.push(TaskSpec::new("dangling", Some("missing")));

        assert!(dag.execution_order().is_err());
    }

    #[test]
    fn test_display() {
        let text = dag().to_string();

        assert!(text.contains("dag: SupplyChainDB"));
        assert!(text.contains("schedule: 30 6 * * *"));
        assert!(text.contains("starting >> fetch_data >> data_cleaning >> insert_data_to_elastic"));
    }
}
