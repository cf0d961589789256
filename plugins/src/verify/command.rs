use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;

use anyhow::Result;
use async_trait::async_trait;
use taskrunner_core::api::{
    BuildResult, LintingResult, SubTask, TestResult, VerificationResult, VerifierPlugin,
};
use tokio::process::Command;

/// A command line run as one verification probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub program: String,
    pub args: Vec<String>,
}

impl Probe {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn label(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The program can be found on `PATH` (or is a path that exists).
    pub fn is_available(&self) -> bool {
        which::which(&self.program).is_ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub passed: bool,
    pub duration_ms: u64,
    /// Trimmed stderr (or stdout when stderr is empty) of a failing probe
    pub detail: Option<String>,
}

/// Runs test, lint and build commands in a working directory.
///
/// A probe whose program is not installed counts as absent, and an absent
/// probe passes.
pub struct CommandVerifierPlugin {
    workdir: PathBuf,
    tests: Option<Probe>,
    lint: Option<Probe>,
    build: Option<Probe>,
}

impl CommandVerifierPlugin {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            tests: None,
            lint: None,
            build: None,
        }
    }

    /// `npm test`, `npm run lint`, `npm run build`, when `workdir` holds a
    /// `package.json`. Without one there is nothing to probe.
    pub fn npm(workdir: impl Into<PathBuf>) -> Self {
        let workdir = workdir.into();
        if !workdir.join("package.json").is_file() {
            tracing::debug!(dir = %workdir.display(), "no package.json; verification probes disabled");
            return Self::new(workdir);
        }
        Self::new(workdir)
            .with_tests(Probe::new("npm", ["test"]))
            .with_lint(Probe::new("npm", ["run", "lint"]))
            .with_build(Probe::new("npm", ["run", "build"]))
    }

    pub fn with_tests(mut self, probe: Probe) -> Self {
        self.tests = Some(probe);
        self
    }

    pub fn with_lint(mut self, probe: Probe) -> Self {
        self.lint = Some(probe);
        self
    }

    pub fn with_build(mut self, probe: Probe) -> Self {
        self.build = Some(probe);
        self
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    async fn run_probe(&self, probe: &Probe) -> Option<ProbeOutcome> {
        if !probe.is_available() {
            tracing::debug!(probe = %probe.label(), "probe not installed; skipping");
            return None;
        }

        let started = Instant::now();
        let output = Command::new(&probe.program)
            .args(&probe.args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await;
        let duration_ms = started.elapsed().as_millis() as u64;

        let outcome = match output {
            Ok(out) if out.status.success() => ProbeOutcome {
                passed: true,
                duration_ms,
                detail: None,
            },
            Ok(out) => {
                let stderr = String::from_utf8_lossy(&out.stderr);
                let stdout = String::from_utf8_lossy(&out.stdout);
                let text = if stderr.trim().is_empty() { stdout } else { stderr };
                ProbeOutcome {
                    passed: false,
                    duration_ms,
                    detail: Some(format!("{} exited with {}: {}", probe.label(), out.status, text.trim())),
                }
            }
            Err(e) => ProbeOutcome {
                passed: false,
                duration_ms,
                detail: Some(format!("failed to run {}: {e}", probe.label())),
            },
        };
        tracing::debug!(probe = %probe.label(), passed = outcome.passed, duration_ms, "probe finished");
        Some(outcome)
    }

    async fn run_tests(&self) -> Option<Vec<TestResult>> {
        let probe = self.tests.as_ref()?;
        let outcome = self.run_probe(probe).await?;
        Some(vec![TestResult {
            name: probe.label(),
            passed: outcome.passed,
            duration: Some(outcome.duration_ms),
            error: outcome.detail.map(|d| format!("Tests failed: {d}")),
        }])
    }

    async fn run_lint(&self) -> Option<LintingResult> {
        let outcome = self.run_probe(self.lint.as_ref()?).await?;
        Some(LintingResult {
            passed: outcome.passed,
            errors: u32::from(!outcome.passed),
            warnings: 0,
            details: outcome.detail.map(|d| format!("Linting failed: {d}")),
        })
    }

    async fn run_build(&self) -> Option<BuildResult> {
        let outcome = self.run_probe(self.build.as_ref()?).await?;
        Some(BuildResult {
            passed: outcome.passed,
            duration: Some(outcome.duration_ms),
            error: outcome.detail.map(|d| format!("Build failed: {d}")),
        })
    }
}

#[async_trait]
impl VerifierPlugin for CommandVerifierPlugin {
    fn name(&self) -> &str {
        "command"
    }

    async fn verify(&self, sub_task: &SubTask) -> Result<VerificationResult> {
        tracing::debug!(sub_task = %sub_task.id, "verifying");
        let tests = self.run_tests().await;
        let linting = self.run_lint().await;
        let build = self.run_build().await;
        Ok(VerificationResult::from_checks(tests, linting, build))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sub_task() -> SubTask {
        SubTask::new("task-1", "check")
    }

    #[tokio::test]
    async fn no_probes_means_pass() {
        let dir = tempfile::tempdir().unwrap();
        let verifier = CommandVerifierPlugin::new(dir.path());
        let result = verifier.verify(&sub_task()).await.unwrap();
        assert!(result.passed);
        assert!(result.tests.is_none() && result.linting.is_none() && result.build.is_none());
    }

    #[tokio::test]
    async fn npm_without_package_json_probes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let verifier = CommandVerifierPlugin::npm(dir.path());
        assert!(verifier.tests.is_none());
        assert!(verifier.verify(&sub_task()).await.unwrap().passed);
    }

    #[tokio::test]
    async fn missing_program_is_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let verifier = CommandVerifierPlugin::new(dir.path())
            .with_build(Probe::new("definitely-not-installed-xyz", ["build"]));
        let result = verifier.verify(&sub_task()).await.unwrap();
        assert!(result.passed);
        assert!(result.build.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_lint_fails_verification() {
        let dir = tempfile::tempdir().unwrap();
        let verifier = CommandVerifierPlugin::new(dir.path())
            .with_tests(Probe::new("true", Vec::<String>::new()))
            .with_lint(Probe::new("false", Vec::<String>::new()))
            .with_build(Probe::new("true", Vec::<String>::new()));

        let result = verifier.verify(&sub_task()).await.unwrap();

        assert!(!result.passed);
        assert_eq!(result.message.as_deref(), Some("Linting failed"));
        let lint = result.linting.unwrap();
        assert_eq!(lint.errors, 1);
        assert!(lint.details.unwrap().starts_with("Linting failed: false exited with"));
        assert!(result.tests.unwrap()[0].passed);
        assert!(result.build.unwrap().passed);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn probes_run_in_the_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker"), "").unwrap();
        let verifier = CommandVerifierPlugin::new(dir.path())
            .with_tests(Probe::new("test", ["-f", "marker"]));

        let result = verifier.verify(&sub_task()).await.unwrap();

        assert!(result.passed);
        assert_eq!(result.tests.unwrap()[0].name, "test -f marker");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn abandoned_probe_is_killed() {
        let dir = tempfile::tempdir().unwrap();
        let verifier = CommandVerifierPlugin::new(dir.path())
            .with_build(Probe::new("sh", ["-c", "sleep 1 && touch finished"]));

        let res =
            tokio::time::timeout(Duration::from_millis(100), verifier.verify(&sub_task())).await;
        assert!(res.is_err());

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!dir.path().join("finished").exists());
    }
}
