use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use taskrunner_core::api::{GitChanges, VersionControlPlugin};
use tokio::process::Command;

use super::status::parse_porcelain;

/// Version control through the `git` executable in a working tree.
pub struct GitCliPlugin {
    repo: PathBuf,
}

impl GitCliPlugin {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self { repo: repo.into() }
    }

    /// Use the process's current directory.
    pub fn current_dir() -> Result<Self> {
        let cwd = std::env::current_dir().context("cannot determine current directory")?;
        Ok(Self::new(cwd))
    }

    pub fn repo(&self) -> &Path {
        &self.repo
    }

    async fn output(&self, args: &[&str]) -> Result<std::process::Output> {
        tracing::debug!(repo = %self.repo.display(), "git {}", args.join(" "));
        Command::new("git")
            .args(args)
            .current_dir(&self.repo)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| anyhow!("failed to run git: {e}"))
    }

    async fn git(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args).await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            if stderr.trim().is_empty() {
                return Err(anyhow!("git {} failed: {}", args[0], stdout.trim()));
            }
            return Err(anyhow!("git {} failed: {}", args[0], stderr.trim()));
        }

        Ok(stdout.into_owned())
    }

    /// Whether the index differs from HEAD.
    pub async fn has_staged_changes(&self) -> Result<bool> {
        let output = self.output(&["diff", "--cached", "--quiet"]).await?;
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(anyhow!(
                "git diff failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )),
        }
    }
}

#[async_trait]
impl VersionControlPlugin for GitCliPlugin {
    fn name(&self) -> &str {
        "git-cli"
    }

    async fn stage_changes(&self) -> Result<GitChanges> {
        let files_changed = self
            .changed_files()
            .await
            .context("failed to stage changes")?;
        if !files_changed.is_empty() {
            self.git(&["add", "."])
                .await
                .context("failed to stage changes")?;
        }
        let diff = self.diff(true).await.context("failed to stage changes")?;
        let branch = match self.current_branch().await {
            Ok(branch) => Some(branch),
            Err(e) => {
                tracing::debug!("no current branch: {e:#}");
                None
            }
        };

        Ok(GitChanges {
            branch,
            files_changed,
            commit: None,
            diff: (!diff.trim().is_empty()).then_some(diff),
        })
    }

    /// Returns an empty id when nothing is staged.
    async fn commit(&self, message: &str) -> Result<String> {
        if !self
            .has_staged_changes()
            .await
            .context("failed to commit")?
        {
            tracing::debug!("nothing staged; skipping commit");
            return Ok(String::new());
        }
        self.git(&["commit", "-m", message])
            .await
            .context("failed to commit")?;
        let head = self.git(&["rev-parse", "HEAD"]).await?;
        Ok(head.trim().to_string())
    }

    async fn create_branch(&self, branch: &str) -> Result<()> {
        self.git(&["checkout", "-b", branch])
            .await
            .with_context(|| format!("failed to create branch {branch}"))?;
        Ok(())
    }

    async fn current_branch(&self) -> Result<String> {
        let name = self.git(&["rev-parse", "--abbrev-ref", "HEAD"]).await?;
        let name = name.trim();
        Ok(if name.is_empty() { "unknown" } else { name }.to_string())
    }

    async fn changed_files(&self) -> Result<Vec<String>> {
        let out = self.git(&["status", "--porcelain"]).await?;
        Ok(parse_porcelain(&out).into_iter().map(|e| e.path).collect())
    }

    async fn diff(&self, staged: bool) -> Result<String> {
        if staged {
            self.git(&["diff", "--cached"]).await
        } else {
            self.git(&["diff"]).await
        }
    }

    async fn has_uncommitted_changes(&self) -> Result<bool> {
        let out = self.git(&["status", "--porcelain"]).await?;
        Ok(!parse_porcelain(&out).is_empty())
    }
}
