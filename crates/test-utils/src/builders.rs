#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use siteforge::config::{RawSiteConfig, SiteConfig};
use siteforge::context::BuildContext;
use siteforge::registry::{ModuleDescriptor, Registry};
use siteforge::tasks::{TaskFn, TaskReturn};
use siteforge::types::{ModuleKind, Stage};

/// Builder for `SiteConfig` to simplify test setup.
pub struct SiteConfigBuilder {
    config: RawSiteConfig,
}

impl SiteConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawSiteConfig::default(),
        }
    }

    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.config.project.watch.debounce_ms = ms;
        self
    }

    pub fn with_content_hash(mut self, val: bool) -> Self {
        self.config.project.watch.content_hash = val;
        self
    }

    pub fn with_feature(mut self, name: &str, enabled: bool) -> Self {
        let f = &mut self.config.features;
        match name {
            "svg_sprite" => f.svg_sprite.enabled = enabled,
            "favicons" => f.favicons.enabled = enabled,
            "static_files" => f.static_files.enabled = enabled,
            "media.video" => f.media.video.enabled = enabled,
            "media.audio" => f.media.audio.enabled = enabled,
            "i18n" => f.i18n.enabled = enabled,
            "seo" => f.seo.enabled = enabled,
            "versioning" => f.versioning.enabled = enabled,
            other => panic!("unknown feature in test builder: {other}"),
        }
        self
    }

    pub fn with_site(mut self, url: &str, base_path: &str) -> Self {
        self.config.site.url = url.to_string();
        self.config.site.base_path = base_path.to_string();
        self
    }

    pub fn build(self) -> SiteConfig {
        SiteConfig::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for SiteConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Context with default config for the given stage.
pub fn ctx_for(stage: Stage) -> BuildContext {
    BuildContext::new(stage, SiteConfigBuilder::new().build())
}

/// Context with a custom config for the given stage.
pub fn ctx_with(stage: Stage, config: SiteConfig) -> BuildContext {
    BuildContext::new(stage, config)
}

/// Shared run log filled in by [`recording_task`] closures.
pub type RunLog = Arc<Mutex<Vec<String>>>;

pub fn run_log() -> RunLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn log_entries(log: &RunLog) -> Vec<String> {
    log.lock().expect("run log poisoned").clone()
}

/// A task that appends its name to the log when awaited.
pub fn recording_task(log: &RunLog, name: &str) -> TaskFn {
    let log = Arc::clone(log);
    let name = name.to_string();
    Arc::new(move || {
        let log = Arc::clone(&log);
        let name = name.clone();
        TaskReturn::Pending(Box::pin(async move {
            log.lock().expect("run log poisoned").push(name);
            Ok(())
        }))
    })
}

/// A recording task that sleeps before logging, for ordering/overlap
/// assertions under `start_paused` tokio tests.
pub fn slow_recording_task(log: &RunLog, name: &str, delay: Duration) -> TaskFn {
    let log = Arc::clone(log);
    let name = name.to_string();
    Arc::new(move || {
        let log = Arc::clone(&log);
        let name = name.clone();
        TaskReturn::Pending(Box::pin(async move {
            tokio::time::sleep(delay).await;
            log.lock().expect("run log poisoned").push(name);
            Ok(())
        }))
    })
}

/// A task that always fails with the given message.
pub fn failing_task(message: &str) -> TaskFn {
    let message = message.to_string();
    Arc::new(move || {
        let message = message.clone();
        TaskReturn::Pending(Box::pin(async move { Err(anyhow::anyhow!(message)) }))
    })
}

/// Compile module with a recording task bound to all stages.
pub fn module(log: &RunLog, id: &str, order: i64) -> ModuleDescriptor {
    ModuleDescriptor::new(id)
        .order(order)
        .task(recording_task(log, id))
}

/// Like [`module`], with dependencies.
pub fn module_after(log: &RunLog, id: &str, order: i64, deps: &[&str]) -> ModuleDescriptor {
    module(log, id, order).depends_on(deps.iter().copied())
}

/// Watch-kind module (no run task required by the contract).
pub fn watch_module(id: &str, order: i64) -> ModuleDescriptor {
    ModuleDescriptor::new(id).order(order).kind(ModuleKind::Watch)
}

/// Validate-and-wrap shortcut; panics on contract violations.
pub fn registry(modules: Vec<ModuleDescriptor>) -> Registry {
    Registry::new(modules).expect("test registry should satisfy the module contract")
}
