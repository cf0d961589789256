use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Run configuration. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRunnerConfig {
    #[serde(default = "default_max_parallel_tasks")]
    pub max_parallel_tasks: usize,

    #[serde(default)]
    pub verification_enabled: bool,

    #[serde(default)]
    pub git_integration: GitIntegrationConfig,

    #[serde(default)]
    pub reporting: ReportingConfig,
}

fn default_max_parallel_tasks() -> usize {
    3
}

impl Default for TaskRunnerConfig {
    fn default() -> Self {
        Self {
            max_parallel_tasks: default_max_parallel_tasks(),
            verification_enabled: false,
            git_integration: GitIntegrationConfig::default(),
            reporting: ReportingConfig::default(),
        }
    }
}

impl TaskRunnerConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_parallel_tasks == 0 {
            anyhow::bail!("maxParallelTasks must be a positive integer");
        }
        Ok(())
    }

    /// Whether sub-tasks should stage their changes after the work step.
    pub fn stages_changes(&self) -> bool {
        self.git_integration.enabled && self.git_integration.auto_stage
    }

    /// Whether successful sub-tasks should be committed.
    pub fn commits_changes(&self) -> bool {
        self.git_integration.enabled && self.git_integration.auto_commit
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitIntegrationConfig {
    #[serde(default = "default_git_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub auto_commit: bool,

    #[serde(default)]
    pub auto_stage: bool,

    #[serde(default = "default_branch_prefix")]
    pub branch_prefix: String,

    /// `{description}` is replaced with the sub-task description.
    #[serde(default = "default_commit_message_template")]
    pub commit_message_template: String,
}

fn default_git_enabled() -> bool {
    true
}

fn default_branch_prefix() -> String {
    "task".to_string()
}

fn default_commit_message_template() -> String {
    "Complete task: {description}".to_string()
}

impl Default for GitIntegrationConfig {
    fn default() -> Self {
        Self {
            enabled: default_git_enabled(),
            auto_commit: false,
            auto_stage: false,
            branch_prefix: default_branch_prefix(),
            commit_message_template: default_commit_message_template(),
        }
    }
}

impl GitIntegrationConfig {
    pub fn commit_message(&self, description: &str) -> String {
        let template = if self.commit_message_template.trim().is_empty() {
            default_commit_message_template()
        } else {
            self.commit_message_template.clone()
        };
        template.replacen("{description}", description, 1)
    }

    pub fn branch_name(&self, name: &str) -> String {
        let prefix = self.branch_prefix.trim().trim_end_matches('/');
        if prefix.is_empty() {
            format!("{}/{}", default_branch_prefix(), name)
        } else {
            format!("{prefix}/{name}")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingConfig {
    #[serde(default = "default_verbose")]
    pub verbose: bool,

    #[serde(default)]
    pub output_format: OutputFormat,

    /// Where to persist the rendered report, if anywhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
}

fn default_verbose() -> bool {
    true
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            verbose: default_verbose(),
            output_format: OutputFormat::default(),
            log_file: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "markdown",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!(
                "unknown output format '{other}' (expected text, json or markdown)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_init_template() {
        let cfg = TaskRunnerConfig::default();
        assert_eq!(cfg.max_parallel_tasks, 3);
        assert!(!cfg.verification_enabled);
        assert!(cfg.git_integration.enabled);
        assert!(!cfg.git_integration.auto_commit);
        assert_eq!(cfg.git_integration.branch_prefix, "task");
        assert!(cfg.reporting.verbose);
        assert_eq!(cfg.reporting.output_format, OutputFormat::Text);
        assert!(cfg.reporting.log_file.is_none());
    }

    #[test]
    fn partial_document_fills_defaults() {
        let cfg: TaskRunnerConfig = serde_json::from_str(
            r#"{"maxParallelTasks": 5, "gitIntegration": {"autoCommit": true}}"#,
        )
        .unwrap();
        assert_eq!(cfg.max_parallel_tasks, 5);
        assert!(cfg.git_integration.enabled);
        assert!(cfg.git_integration.auto_commit);
        assert_eq!(
            cfg.git_integration.commit_message_template,
            "Complete task: {description}"
        );
        assert_eq!(cfg.reporting.output_format, OutputFormat::Text);
    }

    #[test]
    fn zero_parallelism_is_rejected() {
        let cfg = TaskRunnerConfig {
            max_parallel_tasks: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn commit_message_substitutes_description() {
        let git = GitIntegrationConfig {
            commit_message_template: "feat: {description} (auto)".into(),
            ..Default::default()
        };
        assert_eq!(git.commit_message("add login"), "feat: add login (auto)");
    }

    #[test]
    fn branch_name_uses_prefix() {
        let git = GitIntegrationConfig {
            branch_prefix: "work/".into(),
            ..Default::default()
        };
        assert_eq!(git.branch_name("run-1"), "work/run-1");
    }

    #[test]
    fn output_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("md".parse::<OutputFormat>(), Ok(OutputFormat::Markdown));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
