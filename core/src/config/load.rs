use std::path::Path;

use anyhow::Context;

use super::types::TaskRunnerConfig;

/// Default file name written by `init`.
pub const DEFAULT_CONFIG_FILE: &str = "task-runner.config.json";

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

/// Load and validate a configuration file. JSON unless the extension is `.toml`.
pub fn load_from_path(path: &Path) -> anyhow::Result<TaskRunnerConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;

    let cfg: TaskRunnerConfig = if is_toml(path) {
        toml::from_str(&raw)
            .with_context(|| format!("invalid TOML in config file {}", path.display()))?
    } else {
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid JSON in config file {}", path.display()))?
    };

    cfg.validate()
        .with_context(|| format!("invalid config file {}", path.display()))?;

    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(cfg)
}

/// Render a configuration the way it is written to disk.
pub fn to_pretty_string(cfg: &TaskRunnerConfig, path: &Path) -> anyhow::Result<String> {
    if is_toml(path) {
        Ok(toml::to_string_pretty(cfg)?)
    } else {
        Ok(serde_json::to_string_pretty(cfg)?)
    }
}

/// Write the default configuration to `path`.
pub fn write_default(path: &Path) -> anyhow::Result<()> {
    let content = to_pretty_string(&TaskRunnerConfig::default(), path)?;
    std::fs::write(path, content)
        .with_context(|| format!("failed to write config file {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn written_default_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        write_default(&path).unwrap();

        let loaded = load_from_path(&path).unwrap();
        assert_eq!(loaded, TaskRunnerConfig::default());

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"maxParallelTasks\": 3"));
        assert!(raw.contains("\"gitIntegration\""));
    }

    #[test]
    fn toml_extension_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runner.toml");
        write_default(&path).unwrap();
        assert_eq!(load_from_path(&path).unwrap(), TaskRunnerConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from_path(&dir.path().join("nope.json")).is_err());
    }

    #[test]
    fn zero_parallelism_in_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, r#"{"maxParallelTasks": 0}"#).unwrap();
        assert!(load_from_path(&path).is_err());
    }
}
