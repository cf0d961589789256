use clap::{Args as ClapArgs, Parser, Subcommand};
use taskrunner_core::api::{OutputFormat, DEFAULT_CONFIG_FILE};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Text,
    Json,
    Markdown,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Markdown => OutputFormat::Markdown,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "task-runner",
    version,
    about = "Break a task into sub-tasks and run them in dependency order"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Tracing filter used when RUST_LOG is not set (e.g. "info", "taskrunner_core=debug").
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RunArgs {
    /// Task description, or the path of a file holding it
    pub task: String,

    /// Maximum number of sub-tasks running at once
    #[arg(short = 'p', long, default_value_t = 3, value_parser = clap::value_parser!(u64).range(1..))]
    pub parallel: u64,

    /// Skip the test/lint/build probes
    #[arg(long)]
    pub no_verify: bool,

    /// Do not touch version control
    #[arg(long)]
    pub no_git: bool,

    /// Commit after every successful sub-task
    #[arg(long)]
    pub auto_commit: bool,

    /// Stage changes after every sub-task
    #[arg(long)]
    pub auto_stage: bool,

    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    pub format: FormatArg,

    /// Also write the rendered report to this file
    #[arg(long)]
    pub log_file: Option<String>,

    /// Load configuration from a file; it replaces every flag above.
    #[arg(long)]
    pub config: Option<String>,

    /// Stop after the first batch with a failed sub-task and skip the rest
    #[arg(long)]
    pub fail_fast: bool,

    /// Per-sub-task time limit in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Create `<branchPrefix>/<name>` before running
    #[arg(long)]
    pub branch: Option<String>,

    /// Show a progress bar instead of progress lines
    #[arg(long)]
    pub progress: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct InitArgs {
    /// Output file path
    #[arg(short = 'o', long, default_value = DEFAULT_CONFIG_FILE)]
    pub output: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decompose and run a task
    Run(RunArgs),
    /// Write a default configuration file
    Init(InitArgs),
}
