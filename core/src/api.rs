//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `taskrunner_core::api` instead of reaching into internal modules.

pub use crate::config::{
    load_from_path, to_pretty_string, write_default, GitIntegrationConfig, OutputFormat,
    ReportingConfig, TaskRunnerConfig, DEFAULT_CONFIG_FILE,
};
pub use crate::context::{Services, ServicesFactory};
pub use crate::error::{CliError, ExecutorError};
pub use crate::executor::traits::{VerifierPlugin, VersionControlPlugin, WorkOutcome, WorkPerformer};
pub use crate::executor::{
    FailurePolicy, RunOptions, RunOutcome, RunPhase, TaskRunner, TaskRunnerBuilder,
};
pub use crate::input::{step_id, InputParser};
pub use crate::report::{format_duration, persist, render, SubTaskReport, TaskReport};
pub use crate::task::{
    BuildResult, GitChanges, LintingResult, SubTask, Task, TaskResult, TaskStatus, TestResult,
    VerificationResult,
};
