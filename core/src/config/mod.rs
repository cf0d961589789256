mod load;
mod types;

pub use load::{load_from_path, to_pretty_string, write_default, DEFAULT_CONFIG_FILE};
pub use types::{GitIntegrationConfig, OutputFormat, ReportingConfig, TaskRunnerConfig};
