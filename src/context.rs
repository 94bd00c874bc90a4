// src/context.rs

//! Shared build context threaded through every pipeline component.
//!
//! One context is created per pipeline construction and never mutated:
//! there is no memoized global config — components receive the context by
//! reference and read from it.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{FeaturesSection, PathsSection, ProjectSection, SiteConfig, SiteSection};
use crate::types::Stage;

/// Stage identity plus resolved, validated configuration.
#[derive(Debug, Clone)]
pub struct BuildContext {
    stage: Stage,
    config: Arc<SiteConfig>,
}

impl BuildContext {
    pub fn new(stage: Stage, config: SiteConfig) -> Self {
        Self {
            stage,
            config: Arc::new(config),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn features(&self) -> &FeaturesSection {
        &self.config.features
    }

    pub fn paths(&self) -> &PathsSection {
        &self.config.paths
    }

    pub fn project(&self) -> &ProjectSection {
        &self.config.project
    }

    pub fn site(&self) -> &SiteSection {
        &self.config.site
    }

    /// Output tree for this stage: `dist` in dev, `public` otherwise.
    pub fn out_dir(&self) -> PathBuf {
        if self.stage.is_dev() {
            self.config.paths.dist.clone()
        } else {
            self.config.paths.public.clone()
        }
    }
}
