use std::path::Path;
use std::sync::Arc;

use taskrunner_core::api::{
    Services, TaskRunnerConfig, VerifierPlugin, VersionControlPlugin, WorkPerformer,
};

use crate::git::GitCliPlugin;
use crate::performer::SimulatedPerformer;
use crate::verify::CommandVerifierPlugin;

pub fn build_performer(_cfg: &TaskRunnerConfig) -> Arc<dyn WorkPerformer> {
    Arc::new(SimulatedPerformer::new())
}

pub fn build_version_control(
    cfg: &TaskRunnerConfig,
    workdir: &Path,
) -> Option<Arc<dyn VersionControlPlugin>> {
    if !cfg.git_integration.enabled {
        return None;
    }
    Some(Arc::new(GitCliPlugin::new(workdir)))
}

pub fn build_verifier(cfg: &TaskRunnerConfig, workdir: &Path) -> Option<Arc<dyn VerifierPlugin>> {
    if !cfg.verification_enabled {
        return None;
    }
    Some(Arc::new(CommandVerifierPlugin::npm(workdir)))
}

pub fn build_services(cfg: &TaskRunnerConfig, workdir: &Path) -> Services {
    Services {
        performer: build_performer(cfg),
        version_control: build_version_control(cfg, workdir),
        verifier: build_verifier(cfg, workdir),
    }
}
