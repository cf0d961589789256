use async_trait::async_trait;

use crate::task::SubTask;

/// What a work performer reports back for one sub-task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkOutcome {
    pub success: bool,
    pub output: Option<String>,
}

impl WorkOutcome {
    pub fn succeeded(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: Some(output.into()),
        }
    }

    pub fn failed(output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: Some(output.into()),
        }
    }
}

/// Performs the actual unit of work behind a sub-task.
///
/// The runner only records what comes back. An `Err` is treated the same
/// as an unsuccessful outcome, with the error chain kept as the sub-task's
/// error text.
#[async_trait]
pub trait WorkPerformer: Send + Sync {
    /// Performer name (unique identifier)
    fn name(&self) -> &str;

    async fn perform(&self, sub_task: &SubTask) -> anyhow::Result<WorkOutcome>;
}
