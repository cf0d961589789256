use std::sync::Arc;

use crate::config::TaskRunnerConfig;
use crate::executor::traits::{VerifierPlugin, VersionControlPlugin, WorkPerformer};

/// Collaborators a run talks to. The work performer is required; version
/// control and verification are present only when configured.
#[derive(Clone)]
pub struct Services {
    pub performer: Arc<dyn WorkPerformer>,
    pub version_control: Option<Arc<dyn VersionControlPlugin>>,
    pub verifier: Option<Arc<dyn VerifierPlugin>>,
}

impl Services {
    pub fn new(performer: Arc<dyn WorkPerformer>) -> Self {
        Self {
            performer,
            version_control: None,
            verifier: None,
        }
    }

    pub fn with_version_control(mut self, vcs: Arc<dyn VersionControlPlugin>) -> Self {
        self.version_control = Some(vcs);
        self
    }

    pub fn with_verifier(mut self, verifier: Arc<dyn VerifierPlugin>) -> Self {
        self.verifier = Some(verifier);
        self
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("performer", &self.performer.name())
            .field(
                "version_control",
                &self.version_control.as_ref().map(|v| v.name().to_string()),
            )
            .field(
                "verifier",
                &self.verifier.as_ref().map(|v| v.name().to_string()),
            )
            .finish()
    }
}

#[async_trait::async_trait]
pub trait ServicesFactory: Send + Sync {
    async fn build_services(&self, cfg: &TaskRunnerConfig) -> anyhow::Result<Services>;
}
