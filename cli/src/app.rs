//! `run`: assemble configuration, execute the task, print and persist the report.
use std::path::Path;
use std::time::Duration;

use taskrunner_core::api as core_api;
use taskrunner_core::api::{
    CliError, FailurePolicy, OutputFormat, RunOptions, ServicesFactory, TaskRunner,
    TaskRunnerConfig,
};
use taskrunner_plugins::services::PluginServicesFactory;

use crate::commands::cli::RunArgs;

/// Configuration for a run. A `--config` file replaces every other flag.
pub fn config_from_args(args: &RunArgs) -> Result<TaskRunnerConfig, CliError> {
    if let Some(path) = args.config.as_deref() {
        return core_api::load_from_path(Path::new(path))
            .map_err(|e| CliError::Config(format!("{e:#}")));
    }

    let mut cfg = TaskRunnerConfig {
        max_parallel_tasks: usize::try_from(args.parallel)
            .map_err(|_| CliError::Config(format!("--parallel {} is too large", args.parallel)))?,
        verification_enabled: !args.no_verify,
        ..Default::default()
    };
    cfg.git_integration.enabled = !args.no_git;
    cfg.git_integration.auto_commit = args.auto_commit;
    cfg.git_integration.auto_stage = args.auto_stage;
    cfg.reporting.output_format = OutputFormat::from(args.format);
    cfg.reporting.log_file = args.log_file.clone();

    cfg.validate()
        .map_err(|e| CliError::Config(format!("{e:#}")))?;
    Ok(cfg)
}

/// Per-run options that never come from the configuration file.
pub fn options_from_args(args: &RunArgs) -> RunOptions {
    RunOptions {
        failure_policy: if args.fail_fast {
            FailurePolicy::StopAfterFailedBatch
        } else {
            FailurePolicy::Continue
        },
        task_timeout: args.timeout.map(Duration::from_secs),
        branch: args.branch.clone(),
        progress_bar: args.progress,
    }
}

/// An argument naming an existing file is read as the description.
pub fn read_description(task: &str) -> Result<String, CliError> {
    let path = Path::new(task);
    let description = if path.is_file() {
        tracing::debug!(path = %path.display(), "reading task description from file");
        std::fs::read_to_string(path)?
    } else {
        task.to_string()
    };

    if description.trim().is_empty() {
        return Err(CliError::Input("task description is empty".into()));
    }
    Ok(description)
}

pub async fn run_app(args: RunArgs) -> Result<i32, CliError> {
    let cfg = config_from_args(&args)?;
    let options = options_from_args(&args);
    let description = read_description(&args.task)?;

    let workdir = std::env::current_dir()?;
    let services = PluginServicesFactory::new(workdir)
        .build_services(&cfg)
        .await?;
    tracing::debug!(?services, ?options, "starting run");

    let format = cfg.reporting.output_format;
    let log_file = cfg.reporting.log_file.clone();
    let verbose = cfg.reporting.verbose;

    let runner = TaskRunner::builder(cfg, services).options(options).build();
    let outcome = runner.run(&description).await?;

    let rendered = core_api::render(&outcome.report, format)?;
    println!("{rendered}");

    if let Some(path) = log_file.as_deref() {
        match core_api::persist(&rendered, Path::new(path)) {
            Ok(()) if verbose => eprintln!("\nReport saved to: {path}"),
            Ok(()) => {}
            Err(e) => tracing::warn!("failed to save report: {e:#}"),
        }
    }

    Ok(outcome.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cli::{Args, Commands};
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn run_args(argv: &[&str]) -> RunArgs {
        match Args::try_parse_from(argv).unwrap().command {
            Commands::Run(run) => run,
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn flags_map_onto_configuration() {
        let args = run_args(&[
            "task-runner",
            "run",
            "x",
            "-p",
            "4",
            "--no-git",
            "--auto-stage",
            "--format",
            "json",
            "--log-file",
            "report.json",
        ]);

        let cfg = config_from_args(&args).unwrap();

        assert_eq!(cfg.max_parallel_tasks, 4);
        assert!(cfg.verification_enabled);
        assert!(!cfg.git_integration.enabled);
        assert!(cfg.git_integration.auto_stage);
        assert!(!cfg.git_integration.auto_commit);
        assert_eq!(cfg.reporting.output_format, OutputFormat::Json);
        assert_eq!(cfg.reporting.log_file.as_deref(), Some("report.json"));
        assert_eq!(cfg.git_integration.branch_prefix, "task");
    }

    #[test]
    fn config_file_replaces_flags_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, r#"{"maxParallelTasks": 7}"#).unwrap();
        let path = path.to_string_lossy().into_owned();
        let args = run_args(&["task-runner", "run", "x", "-p", "2", "--no-git", "--config", &path]);

        let cfg = config_from_args(&args).unwrap();

        assert_eq!(cfg.max_parallel_tasks, 7);
        assert!(cfg.git_integration.enabled);
        assert!(!cfg.verification_enabled);
    }

    #[test]
    fn invalid_config_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, r#"{"maxParallelTasks": 0}"#).unwrap();
        let path = path.to_string_lossy().into_owned();
        let args = run_args(&["task-runner", "run", "x", "--config", &path]);

        assert!(matches!(config_from_args(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn run_options_follow_flags() {
        let args = run_args(&[
            "task-runner",
            "run",
            "x",
            "--fail-fast",
            "--timeout",
            "9",
            "--branch",
            "login",
            "--progress",
        ]);

        let options = options_from_args(&args);

        assert!(options.stops_on_failure());
        assert_eq!(options.task_timeout, Some(Duration::from_secs(9)));
        assert_eq!(options.branch.as_deref(), Some("login"));
        assert!(options.progress_bar);
    }

    #[test]
    fn existing_file_is_read_as_description() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("task.md");
        std::fs::write(&path, "- one\n- two\n").unwrap();

        let text = read_description(&path.to_string_lossy()).unwrap();

        assert_eq!(text, "- one\n- two\n");
        assert_eq!(read_description("just do it").unwrap(), "just do it");
    }

    #[test]
    fn blank_description_is_an_input_error() {
        assert!(matches!(read_description("   "), Err(CliError::Input(_))));
    }

    #[tokio::test]
    async fn run_persists_report_and_reports_success() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("report.md");
        let report_arg = report.to_string_lossy().into_owned();
        let args = run_args(&[
            "task-runner",
            "run",
            "- Write code\n- Write tests",
            "--no-git",
            "--no-verify",
            "--format",
            "markdown",
            "--log-file",
            &report_arg,
        ]);

        let code = run_app(args).await.unwrap();

        assert_eq!(code, 0);
        let saved = std::fs::read_to_string(&report).unwrap();
        assert!(saved.starts_with("# Task Execution Report"));
        assert!(saved.contains("| Completed | 2 |"));
    }
}
