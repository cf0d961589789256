//! `init`: write the default configuration file
use std::path::{Path, PathBuf};

use taskrunner_core::api as core_api;

use crate::commands::cli::InitArgs;

pub fn handle_init(args: InitArgs) -> Result<PathBuf, core_api::CliError> {
    let path = Path::new(&args.output);
    core_api::write_default(path).map_err(|e| core_api::CliError::Config(format!("{e:#}")))?;

    let shown = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    println!("✅ Configuration file created: {}", shown.display());
    Ok(shown)
}
