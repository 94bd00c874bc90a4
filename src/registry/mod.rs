// src/registry/mod.rs

//! Module registry: the catalogue of build modules and the stage-aware
//! views over it.
//!
//! - [`module`] defines the descriptor types.
//! - [`contract`] validates descriptor and watch-rule shape.
//! - [`catalogue`] builds the built-in static-site module set.
//!
//! A [`Registry`] is rebuilt fresh per pipeline construction; there is no
//! persistent mutable registry.

pub mod catalogue;
pub mod contract;
pub mod module;

pub use catalogue::built_in_registry;
pub use contract::{validate_module_registry, validate_watch_rules, ContractError};
pub use module::{EnabledFn, ModuleDescriptor, NamedTask, StageTasks, WatchFn, WatchRule};

use crate::context::BuildContext;
use crate::errors::Result;
use crate::tasks::TaskFn;
use crate::types::ModuleKind;

/// A validated snapshot of module descriptors.
#[derive(Debug)]
pub struct Registry {
    modules: Vec<ModuleDescriptor>,
}

impl Registry {
    /// Validate and wrap a set of descriptors. Contract violations are
    /// fatal here, before any task can run.
    pub fn new(modules: Vec<ModuleDescriptor>) -> Result<Self> {
        validate_module_registry(&modules)?;
        Ok(Self { modules })
    }

    pub fn modules(&self) -> &[ModuleDescriptor] {
        &self.modules
    }

    /// Enabled modules for this context, sorted by `(order, id)` so every
    /// downstream view is deterministic.
    pub fn enabled_modules(&self, ctx: &BuildContext) -> Vec<&ModuleDescriptor> {
        let mut enabled: Vec<&ModuleDescriptor> = self
            .modules
            .iter()
            .filter(|m| m.is_enabled(ctx))
            .collect();
        enabled.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        enabled
    }

    /// Enabled modules that have a task bound for this stage, paired with
    /// that task.
    pub fn runnable_modules<'a>(
        &'a self,
        ctx: &BuildContext,
    ) -> Vec<(&'a ModuleDescriptor, &'a TaskFn)> {
        let key = ctx.stage().task_key();
        self.enabled_modules(ctx)
            .into_iter()
            .filter_map(|m| m.tasks.get(key).map(|t| (m, t)))
            .collect()
    }

    /// The run tasks for this stage, in `(order, id)` order. Modules with
    /// no binding for the stage are dropped.
    pub fn enabled_run_tasks(&self, ctx: &BuildContext) -> Vec<NamedTask> {
        self.runnable_modules(ctx)
            .into_iter()
            .map(|(m, task)| NamedTask {
                id: m.id.clone(),
                task: task.clone(),
            })
            .collect()
    }

    /// The aggregate watch rules of all enabled modules, validated.
    pub fn enabled_watch_rules(&self, ctx: &BuildContext) -> Result<Vec<WatchRule>> {
        let rules: Vec<WatchRule> = self
            .enabled_modules(ctx)
            .into_iter()
            .filter_map(|m| m.watch.as_ref())
            .flat_map(|w| w(ctx))
            .collect();

        validate_watch_rules(&rules)?;
        Ok(rules)
    }

    /// Ids of enabled, runnable, compile-kind modules.
    ///
    /// This is the implicit dependency set for post-compile steps:
    /// versioning depends on every compile module that actually ran.
    pub fn enabled_compile_ids(&self, ctx: &BuildContext) -> Vec<String> {
        self.runnable_modules(ctx)
            .into_iter()
            .filter(|(m, _)| m.kind == ModuleKind::Compile)
            .map(|(m, _)| m.id.clone())
            .collect()
    }
}
