use async_trait::async_trait;

use crate::task::{SubTask, VerificationResult};

/// Runs test, lint and build probes after a sub-task's work step.
#[async_trait]
pub trait VerifierPlugin: Send + Sync {
    fn name(&self) -> &str;

    async fn verify(&self, sub_task: &SubTask) -> anyhow::Result<VerificationResult>;
}
