//! `ServicesFactory` backed by the plugins in this crate, rooted at one working directory.
use std::path::PathBuf;

use async_trait::async_trait;
use taskrunner_core::api::{Services, ServicesFactory, TaskRunnerConfig};

use crate::factory;

pub struct PluginServicesFactory {
    workdir: PathBuf,
}

impl PluginServicesFactory {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }
}

impl Default for PluginServicesFactory {
    fn default() -> Self {
        Self::new(".")
    }
}

#[async_trait]
impl ServicesFactory for PluginServicesFactory {
    async fn build_services(&self, cfg: &TaskRunnerConfig) -> anyhow::Result<Services> {
        cfg.validate()?;
        Ok(factory::build_services(cfg, &self.workdir))
    }
}
