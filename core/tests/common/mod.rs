#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use taskrunner_core::api::{
    GitChanges, LintingResult, Services, SubTask, TaskRunnerConfig, TestResult,
    VerificationResult, VerifierPlugin, VersionControlPlugin, WorkOutcome, WorkPerformer,
};

/// Succeeds unless the sub-task description contains one of `fail_on`.
#[derive(Default)]
pub struct ScriptedPerformer {
    pub fail_on: Vec<&'static str>,
    pub delay: Duration,
    pub in_flight: AtomicUsize,
    pub peak: AtomicUsize,
    pub performed: Mutex<Vec<String>>,
}

impl ScriptedPerformer {
    pub fn failing_on(fail_on: &[&'static str]) -> Self {
        Self {
            fail_on: fail_on.to_vec(),
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn performed(&self) -> Vec<String> {
        self.performed.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkPerformer for ScriptedPerformer {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn perform(&self, sub_task: &SubTask) -> anyhow::Result<WorkOutcome> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.performed.lock().unwrap().push(sub_task.id.clone());

        if self.fail_on.iter().any(|s| sub_task.description.contains(s)) {
            anyhow::bail!("could not {}", sub_task.description);
        }
        Ok(WorkOutcome::succeeded(format!("Executed: {}", sub_task.description)))
    }
}

/// Records every call; optionally fails branch creation. Stage and commit
/// calls can be slowed down to expose overlapping access.
#[derive(Default)]
pub struct RecordingVcs {
    pub calls: Mutex<Vec<String>>,
    pub commits: AtomicUsize,
    pub reject_branch: bool,
    pub delay: Duration,
    pub in_flight: AtomicUsize,
    pub peak: AtomicUsize,
}

impl RecordingVcs {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    async fn hold(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl VersionControlPlugin for RecordingVcs {
    fn name(&self) -> &str {
        "recording"
    }

    async fn stage_changes(&self) -> anyhow::Result<GitChanges> {
        self.hold().await;
        self.record("stage".into());
        Ok(GitChanges {
            branch: Some("task/feature".into()),
            files_changed: vec!["src/main.rs".into()],
            commit: None,
            diff: Some("+fn main() {}".into()),
        })
    }

    async fn commit(&self, message: &str) -> anyhow::Result<String> {
        self.hold().await;
        self.record(format!("commit:{message}"));
        let n = self.commits.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("c0ffee{n}"))
    }

    async fn create_branch(&self, branch: &str) -> anyhow::Result<()> {
        if self.reject_branch {
            anyhow::bail!("branch {branch} already exists");
        }
        self.record(format!("branch:{branch}"));
        Ok(())
    }

    async fn current_branch(&self) -> anyhow::Result<String> {
        Ok("main".into())
    }

    async fn changed_files(&self) -> anyhow::Result<Vec<String>> {
        Ok(vec!["src/main.rs".into()])
    }

    async fn diff(&self, _staged: bool) -> anyhow::Result<String> {
        Ok(String::new())
    }
}

/// Fails lint for the listed sub-task ids, passes everything else.
#[derive(Default)]
pub struct ScriptedVerifier {
    pub lint_failures: HashSet<String>,
}

impl ScriptedVerifier {
    pub fn failing_lint_for(ids: &[&str]) -> Self {
        Self {
            lint_failures: ids.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[async_trait]
impl VerifierPlugin for ScriptedVerifier {
    fn name(&self) -> &str {
        "scripted-verifier"
    }

    async fn verify(&self, sub_task: &SubTask) -> anyhow::Result<VerificationResult> {
        let tests = vec![TestResult {
            name: "unit".into(),
            passed: true,
            duration: Some(5),
            error: None,
        }];
        let linting = LintingResult {
            passed: !self.lint_failures.contains(&sub_task.id),
            errors: u32::from(self.lint_failures.contains(&sub_task.id)),
            warnings: 0,
            details: None,
        };
        Ok(VerificationResult::from_checks(Some(tests), Some(linting), None))
    }
}

pub fn quiet_config() -> TaskRunnerConfig {
    let mut cfg = TaskRunnerConfig::default();
    cfg.reporting.verbose = false;
    cfg
}

pub fn services(performer: Arc<ScriptedPerformer>) -> Services {
    Services::new(performer)
}
