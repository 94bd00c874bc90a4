// src/registry/module.rs

//! Module descriptor: the unit of configurable build work.

use std::fmt;
use std::sync::Arc;

use crate::context::BuildContext;
use crate::tasks::TaskFn;
use crate::types::{ModuleKind, StageKey, WatchAction};

/// Enable predicate over the build context. Pure; may be called several
/// times per pipeline construction.
pub type EnabledFn = Arc<dyn Fn(&BuildContext) -> bool + Send + Sync>;

/// Produces the module's watch rules; called once per registry evaluation.
pub type WatchFn = Arc<dyn Fn(&BuildContext) -> Vec<WatchRule> + Send + Sync>;

/// Per-stage task bindings.
///
/// The stage set is closed by construction: a binding can only exist for
/// `dev`, `build` or `preview` (`buildFast` resolves to the `build`
/// binding via [`crate::types::Stage::task_key`]).
#[derive(Clone, Default)]
pub struct StageTasks {
    pub dev: Option<TaskFn>,
    pub build: Option<TaskFn>,
    pub preview: Option<TaskFn>,
}

impl StageTasks {
    /// Bind the same task to every stage, the common case for compile
    /// modules.
    pub fn all(task: TaskFn) -> Self {
        Self {
            dev: Some(task.clone()),
            build: Some(task.clone()),
            preview: Some(task),
        }
    }

    pub fn get(&self, key: StageKey) -> Option<&TaskFn> {
        match key {
            StageKey::Dev => self.dev.as_ref(),
            StageKey::Build => self.build.as_ref(),
            StageKey::Preview => self.preview.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dev.is_none() && self.build.is_none() && self.preview.is_none()
    }
}

impl fmt::Debug for StageTasks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageTasks")
            .field("dev", &self.dev.is_some())
            .field("build", &self.build.is_some())
            .field("preview", &self.preview.is_some())
            .finish()
    }
}

/// What to do when files matching `globs` change during a dev session.
#[derive(Clone)]
pub struct WatchRule {
    /// Scheduler key: one debounce/single-flight slot per key.
    pub key: String,
    /// Glob patterns relative to the project root.
    pub globs: Vec<String>,
    pub task: TaskFn,
    pub action: WatchAction,
}

impl WatchRule {
    pub fn new(
        key: impl Into<String>,
        globs: Vec<String>,
        task: TaskFn,
        action: WatchAction,
    ) -> Self {
        Self {
            key: key.into(),
            globs,
            task,
            action,
        }
    }
}

impl fmt::Debug for WatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchRule")
            .field("key", &self.key)
            .field("globs", &self.globs)
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

/// A named unit of optional build work with stage-specific tasks and a
/// declared dependency set.
#[derive(Clone)]
pub struct ModuleDescriptor {
    /// Unique identity, stable across stages.
    pub id: String,
    pub kind: ModuleKind,
    /// Tie-break for deterministic layer-internal ordering. Not a
    /// dependency.
    pub order: i64,
    /// Ids of modules that must complete in an earlier layer.
    pub depends_on: Vec<String>,
    /// Modules failing this predicate are invisible to every later stage
    /// of processing. `None` means always enabled.
    pub enabled: Option<EnabledFn>,
    pub tasks: StageTasks,
    pub watch: Option<WatchFn>,
}

impl fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("order", &self.order)
            .field("depends_on", &self.depends_on)
            .field("tasks", &self.tasks)
            .finish_non_exhaustive()
    }
}

impl ModuleDescriptor {
    /// Start a compile-kind descriptor with defaults.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ModuleKind::Compile,
            order: 0,
            depends_on: Vec::new(),
            enabled: None,
            tasks: StageTasks::default(),
            watch: None,
        }
    }

    pub fn kind(mut self, kind: ModuleKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub fn depends_on<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn enabled_when<F>(mut self, pred: F) -> Self
    where
        F: Fn(&BuildContext) -> bool + Send + Sync + 'static,
    {
        self.enabled = Some(Arc::new(pred));
        self
    }

    /// Bind one task to all stages.
    pub fn task(mut self, task: TaskFn) -> Self {
        self.tasks = StageTasks::all(task);
        self
    }

    pub fn tasks(mut self, tasks: StageTasks) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn watch_rules<F>(mut self, watch: F) -> Self
    where
        F: Fn(&BuildContext) -> Vec<WatchRule> + Send + Sync + 'static,
    {
        self.watch = Some(Arc::new(watch));
        self
    }

    pub(crate) fn is_enabled(&self, ctx: &BuildContext) -> bool {
        match &self.enabled {
            Some(pred) => pred(ctx),
            None => true,
        }
    }
}

/// A module's bound task for one stage, tagged with its id for logging
/// and plan output.
#[derive(Clone)]
pub struct NamedTask {
    pub id: String,
    pub task: TaskFn,
}

impl fmt::Debug for NamedTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedTask").field("id", &self.id).finish()
    }
}
