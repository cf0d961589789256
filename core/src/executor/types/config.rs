use std::time::Duration;

/// What the orchestrator does after a batch in which a sub-task failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Keep going with the next batch.
    #[default]
    Continue,
    /// Stop after the failing batch; everything not yet run is SKIPPED.
    StopAfterFailedBatch,
}

/// Per-run execution options. These sit beside the configuration file
/// rather than inside it.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub failure_policy: FailurePolicy,

    /// Upper bound for one sub-task's collaborator calls. `None` waits forever.
    pub task_timeout: Option<Duration>,

    /// Create `<branchPrefix>/<name>` before executing anything.
    pub branch: Option<String>,

    /// Draw an indicatif progress bar instead of plain progress lines.
    pub progress_bar: bool,
}

impl RunOptions {
    pub fn stops_on_failure(&self) -> bool {
        self.failure_policy == FailurePolicy::StopAfterFailedBatch
    }
}
