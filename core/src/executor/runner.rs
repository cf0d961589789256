use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use tokio::sync::{Mutex, MutexGuard};

use crate::config::TaskRunnerConfig;
use crate::context::Services;
use crate::task::{GitChanges, SubTask, TaskResult};

use super::traits::VersionControlPlugin;

/// Serializes every call into the version-control adapter. The working
/// tree is shared by all sub-tasks of a batch.
pub struct VcsGate {
    vcs: Arc<dyn VersionControlPlugin>,
    lock: Mutex<()>,
}

/// Exclusive access to the working tree until dropped.
pub struct VcsSession<'a> {
    vcs: &'a dyn VersionControlPlugin,
    _guard: MutexGuard<'a, ()>,
}

impl VcsGate {
    pub fn new(vcs: Arc<dyn VersionControlPlugin>) -> Self {
        Self {
            vcs,
            lock: Mutex::new(()),
        }
    }

    /// Wait for the working tree and hold it for several calls.
    pub async fn session(&self) -> VcsSession<'_> {
        VcsSession {
            vcs: self.vcs.as_ref(),
            _guard: self.lock.lock().await,
        }
    }

    pub async fn stage_changes(&self) -> anyhow::Result<GitChanges> {
        self.session().await.stage_changes().await
    }

    pub async fn commit(&self, message: &str) -> anyhow::Result<String> {
        self.session().await.commit(message).await
    }

    pub async fn create_branch(&self, branch: &str) -> anyhow::Result<()> {
        self.session().await.create_branch(branch).await
    }
}

impl VcsSession<'_> {
    pub async fn stage_changes(&self) -> anyhow::Result<GitChanges> {
        self.vcs.stage_changes().await
    }

    pub async fn commit(&self, message: &str) -> anyhow::Result<String> {
        self.vcs.commit(message).await
    }

    pub async fn create_branch(&self, branch: &str) -> anyhow::Result<()> {
        self.vcs.create_branch(branch).await
    }
}

/// Executes one sub-task end to end: work, stage, verify, commit.
pub struct SubTaskRunner {
    config: Arc<TaskRunnerConfig>,
    services: Services,
    vcs: Option<VcsGate>,
    timeout: Option<Duration>,
}

impl SubTaskRunner {
    pub fn new(config: Arc<TaskRunnerConfig>, services: Services) -> Self {
        let vcs = services
            .version_control
            .clone()
            .filter(|_| config.git_integration.enabled)
            .map(VcsGate::new);
        Self {
            config,
            services,
            vcs,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn vcs(&self) -> Option<&VcsGate> {
        self.vcs.as_ref()
    }

    /// Run `sub_task` to a terminal status. Never fails: any collaborator
    /// error leaves the sub-task FAILED and comes back as a failure result.
    pub async fn run(&self, sub_task: &mut SubTask) -> TaskResult {
        if let Err(e) = sub_task.begin() {
            tracing::warn!("{e}");
            return TaskResult::failure(e.to_string());
        }

        let attempt = self.attempt(sub_task);
        let outcome = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, attempt).await {
                Ok(res) => res,
                Err(_) => Err(anyhow!("timed out after {}s", limit.as_secs_f64())),
            },
            None => attempt.await,
        };

        let (result, error) = match outcome {
            Ok(result) if result.success => (result, None),
            Ok(result) => {
                let reason = failure_reason(&result);
                (result, Some(reason))
            }
            Err(e) => {
                let msg = format!("{e:#}");
                (TaskResult::failure(msg.clone()), Some(msg))
            }
        };

        let transition = match error {
            None => sub_task.complete(result.clone()),
            Some(err) => sub_task.fail(result.clone(), err),
        };
        if let Err(e) = transition {
            tracing::warn!("{e}");
        }

        result
    }

    async fn attempt(&self, sub_task: &SubTask) -> anyhow::Result<TaskResult> {
        let work = self.services.performer.perform(sub_task).await?;
        let mut result = TaskResult {
            success: work.success,
            output: work.output,
            verification: None,
            git_changes: None,
        };

        // Stage through commit must not interleave with a sibling's.
        let session = match &self.vcs {
            Some(vcs) if self.config.stages_changes() => Some(vcs.session().await),
            _ => None,
        };

        if let Some(session) = &session {
            result.git_changes = Some(session.stage_changes().await?);
        }

        if self.config.verification_enabled {
            if let Some(verifier) = &self.services.verifier {
                let verification = verifier.verify(sub_task).await?;
                if !verification.passed {
                    result.success = false;
                }
                result.verification = Some(verification);
            }
        }

        if result.success && self.config.commits_changes() {
            if let Some(vcs) = &self.vcs {
                let message = self
                    .config
                    .git_integration
                    .commit_message(&sub_task.description);
                let commit = match &session {
                    Some(session) => session.commit(&message).await?,
                    None => vcs.commit(&message).await?,
                };
                let commit = commit.trim();
                result
                    .git_changes
                    .get_or_insert_with(GitChanges::default)
                    .commit = (!commit.is_empty()).then(|| commit.to_string());
            }
        }

        Ok(result)
    }
}

fn failure_reason(result: &TaskResult) -> String {
    if let Some(v) = result.verification.as_ref().filter(|v| !v.passed) {
        return format!(
            "verification failed: {}",
            v.message.as_deref().unwrap_or("one or more checks failed")
        );
    }
    match result.output.as_deref().map(str::trim) {
        Some(out) if !out.is_empty() => format!("work failed: {out}"),
        _ => "work performer reported failure".to_string(),
    }
}
