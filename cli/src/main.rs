use clap::Parser;
use taskrunner_cli::{app, commands};
use taskrunner_core::error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use commands::cli;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

/// Directory for an additional plain-text log file.
const LOG_DIR_ENV: &str = "TASK_RUNNER_LOG_DIR";

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, error::CliError> {
    let args = cli::Args::parse();
    init_tracing(&args.log_level).map_err(error::CliError::Config)?;

    dispatch(args.command).await
}

/// Every error stops the run before or outside execution.
fn exit_code_for_error(e: &error::CliError) -> i32 {
    match e {
        error::CliError::Config(_) => 1,
        error::CliError::Input(_) => 1,
        error::CliError::Executor(_) => 1,
        error::CliError::Io(_) => 1,
        error::CliError::Anyhow(_) => 1,
    }
}

async fn dispatch(cmd: cli::Commands) -> Result<i32, error::CliError> {
    match cmd {
        cli::Commands::Run(run_args) => app::run_app(run_args).await,
        cli::Commands::Init(init_args) => {
            commands::init::handle_init(init_args)?;
            Ok(0)
        }
    }
}

fn init_tracing(level: &str) -> Result<(), String> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(level).map_err(|e| format!("invalid --log-level: {e}"))?,
    };

    let file_writer = match std::env::var(LOG_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => {
            let dir = std::path::PathBuf::from(dir.trim());
            std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
            let file_name = format!("task-runner.{}.log", std::process::id());
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let _ = LOG_GUARD.set(guard);
            Some(non_blocking)
        }
        _ => None,
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr));

    let file_layer = file_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
