use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::TaskRunnerConfig;
use crate::context::Services;
use crate::error::ExecutorError;
use crate::input::InputParser;
use crate::report::TaskReport;
use crate::task::{SubTask, Task, TaskStatus};

use super::graph::TaskGraph;
use super::output::RunOutput;
use super::runner::SubTaskRunner;
use super::scheduler::execute_batch;
use super::types::{RunOptions, RunOutcome};

/// Where the orchestrator currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Extracting,
    Batching,
    Executing(usize),
    Reporting,
    Done,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunPhase::Extracting => f.write_str("extracting"),
            RunPhase::Batching => f.write_str("batching"),
            RunPhase::Executing(batch) => write!(f, "executing batch {}", batch + 1),
            RunPhase::Reporting => f.write_str("reporting"),
            RunPhase::Done => f.write_str("done"),
        }
    }
}

/// Run orchestrator: extract, batch, execute batch by batch, report.
pub struct TaskRunner {
    config: Arc<TaskRunnerConfig>,
    services: Services,
    options: RunOptions,
}

pub struct TaskRunnerBuilder {
    config: TaskRunnerConfig,
    services: Services,
    options: RunOptions,
}

impl TaskRunner {
    pub fn new(config: TaskRunnerConfig, services: Services) -> Self {
        Self::builder(config, services).build()
    }

    pub fn builder(config: TaskRunnerConfig, services: Services) -> TaskRunnerBuilder {
        TaskRunnerBuilder::new(config, services)
    }

    pub fn config(&self) -> &TaskRunnerConfig {
        &self.config
    }

    /// Run `description` to completion.
    ///
    /// Only pre-execution problems come back as `Err`; everything that goes
    /// wrong inside a sub-task is recorded on it and shows up in the report.
    pub async fn run(&self, description: &str) -> Result<RunOutcome, ExecutorError> {
        if description.trim().is_empty() {
            return Err(ExecutorError::EmptyTask);
        }
        let start_time = Utc::now();

        self.enter(RunPhase::Extracting);
        let sub_tasks = InputParser::decompose(description);
        self.execute(description, sub_tasks, start_time).await
    }

    /// Run sub-tasks that were decomposed elsewhere. Dependency ids may be
    /// arbitrary; unresolvable ones leave their sub-tasks BLOCKED.
    pub async fn run_sub_tasks(
        &self,
        description: &str,
        sub_tasks: Vec<SubTask>,
    ) -> Result<RunOutcome, ExecutorError> {
        if sub_tasks.is_empty() {
            return Err(ExecutorError::EmptyTask);
        }
        self.execute(description, sub_tasks, Utc::now()).await
    }

    async fn execute(
        &self,
        description: &str,
        sub_tasks: Vec<SubTask>,
        start_time: DateTime<Utc>,
    ) -> Result<RunOutcome, ExecutorError> {
        let mut task = Task {
            id: Uuid::new_v4().to_string(),
            description: description.to_string(),
            sub_tasks,
            config: (*self.config).clone(),
        };

        self.enter(RunPhase::Batching);
        let graph = TaskGraph::from_tasks(&task.sub_tasks)?;
        let layering = graph.layers();
        if !layering.is_complete() {
            tracing::warn!(
                blocked = layering.blocked.len(),
                "some sub-tasks can never be scheduled"
            );
            if let Some(cycle) = graph.detect_cycle() {
                tracing::warn!("circular dependency: {cycle}");
            }
        }

        let output = RunOutput::new(
            self.config.reporting.verbose,
            self.options.progress_bar,
            task.sub_tasks.len(),
        );
        let plan: Vec<Vec<String>> = layering
            .batches
            .iter()
            .map(|batch| batch.iter().map(|&i| task.sub_tasks[i].id.clone()).collect())
            .collect();
        output.emit_run_start(&task.id, task.sub_tasks.len(), &plan);

        for blocked in &layering.blocked {
            let sub_task = &mut task.sub_tasks[blocked.index];
            if let Err(e) = sub_task.block(blocked.reason()) {
                tracing::warn!("{e}");
            }
            output.emit_blocked(sub_task);
        }

        let runner = SubTaskRunner::new(self.config.clone(), self.services.clone())
            .with_timeout(self.options.task_timeout);

        if let Some(name) = &self.options.branch {
            let vcs = runner.vcs().ok_or_else(|| {
                ExecutorError::Setup(format!(
                    "cannot create branch '{name}': version control is disabled"
                ))
            })?;
            let branch = self.config.git_integration.branch_name(name);
            vcs.create_branch(&branch)
                .await
                .map_err(|e| ExecutorError::Setup(format!("{e:#}")))?;
            output.emit_branch(&branch);
        }

        let total_batches = layering.batches.len();
        let mut halted_after_batch = None;
        for (index, batch) in layering.batches.iter().enumerate() {
            self.enter(RunPhase::Executing(index));
            output.emit_batch_start(index, total_batches, batch.len());

            let members: Vec<&mut SubTask> = task
                .sub_tasks
                .iter_mut()
                .enumerate()
                .filter(|(i, _)| batch.binary_search(i).is_ok())
                .map(|(_, sub_task)| sub_task)
                .collect();

            let summary = execute_batch(
                &runner,
                members,
                self.config.max_parallel_tasks,
                &output,
            )
            .await;
            tracing::debug!(
                batch = index + 1,
                waves = ?summary.wave_sizes,
                completed = summary.completed,
                failed = summary.failed,
                "batch finished"
            );

            if summary.has_failures() && self.options.stops_on_failure() {
                halted_after_batch = Some(index);
                let skipped = skip_pending(&mut task, index);
                output.emit_halt(index, skipped);
                break;
            }
        }

        self.enter(RunPhase::Reporting);
        let report = TaskReport::from_task(&task, start_time, Utc::now());
        output.emit_run_end(&report);

        self.enter(RunPhase::Done);
        Ok(RunOutcome {
            task,
            report,
            batches: total_batches,
            halted_after_batch,
        })
    }

    fn enter(&self, phase: RunPhase) {
        tracing::info!(%phase, "phase");
    }
}

/// Mark every sub-task that has not started as SKIPPED.
fn skip_pending(task: &mut Task, failed_batch: usize) -> usize {
    let reason = format!("skipped: run halted after batch {} failed", failed_batch + 1);
    let mut skipped = 0;
    for sub_task in task
        .sub_tasks
        .iter_mut()
        .filter(|st| st.status == TaskStatus::Pending)
    {
        match sub_task.skip(reason.clone()) {
            Ok(()) => skipped += 1,
            Err(e) => tracing::warn!("{e}"),
        }
    }
    skipped
}

impl TaskRunnerBuilder {
    pub fn new(config: TaskRunnerConfig, services: Services) -> Self {
        Self {
            config,
            services,
            options: RunOptions::default(),
        }
    }

    pub fn options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> TaskRunner {
        TaskRunner {
            config: Arc::new(self.config),
            services: self.services,
            options: self.options,
        }
    }
}
