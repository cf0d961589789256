use anyhow::Result;
use async_trait::async_trait;
use taskrunner_core::api::{SubTask, WorkOutcome, WorkPerformer};

/// Records every sub-task as done without touching anything.
///
/// This is the default performer: the runner tracks success and failure of
/// work, it does not interpret task text.
#[derive(Debug, Default, Clone)]
pub struct SimulatedPerformer;

impl SimulatedPerformer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WorkPerformer for SimulatedPerformer {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn perform(&self, sub_task: &SubTask) -> Result<WorkOutcome> {
        tracing::debug!(sub_task = %sub_task.id, "simulating work");
        Ok(WorkOutcome::succeeded(format!(
            "Executed: {}",
            sub_task.description
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echoes_description() {
        let outcome = SimulatedPerformer::new()
            .perform(&SubTask::new("task-1", "Write docs"))
            .await
            .unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.output.as_deref(), Some("Executed: Write docs"));
    }
}
