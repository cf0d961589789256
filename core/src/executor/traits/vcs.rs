use async_trait::async_trait;

use crate::task::GitChanges;

/// Version-control operations on one shared working tree.
///
/// Implementations need not be reentrant; the runner serializes every call.
#[async_trait]
pub trait VersionControlPlugin: Send + Sync {
    fn name(&self) -> &str;

    /// Stage everything that changed and describe what was staged.
    async fn stage_changes(&self) -> anyhow::Result<GitChanges>;

    /// Commit staged changes, returning the new commit id.
    async fn commit(&self, message: &str) -> anyhow::Result<String>;

    /// Create and check out `branch`.
    async fn create_branch(&self, branch: &str) -> anyhow::Result<()>;

    async fn current_branch(&self) -> anyhow::Result<String>;

    /// Modified, created and deleted paths in the working tree.
    async fn changed_files(&self) -> anyhow::Result<Vec<String>>;

    async fn diff(&self, staged: bool) -> anyhow::Result<String>;

    async fn has_uncommitted_changes(&self) -> anyhow::Result<bool> {
        Ok(!self.changed_files().await?.is_empty())
    }
}
