use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Build stage: the high-level mode that selects which task variant of each
/// module runs and which validation strictness policy applies.
///
/// `BuildFast` is a distinct identity for policy decisions, but selects the
/// same module task as `Build` (see [`Stage::task_key`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Dev,
    Build,
    BuildFast,
    Preview,
}

impl Stage {
    /// Key used to pick a task out of a module's per-stage bindings.
    ///
    /// `buildFast` aliases to `build` here; only policy code distinguishes
    /// the two.
    pub fn task_key(self) -> StageKey {
        match self {
            Stage::Dev => StageKey::Dev,
            Stage::Build | Stage::BuildFast => StageKey::Build,
            Stage::Preview => StageKey::Preview,
        }
    }

    pub fn is_dev(self) -> bool {
        matches!(self, Stage::Dev)
    }

    /// Policy for a module whose `depends_on` references a module that is
    /// enabled but not runnable for this stage: warn-and-continue in dev,
    /// fail fast everywhere else.
    pub fn mismatch_policy(self) -> MismatchPolicy {
        if self.is_dev() {
            MismatchPolicy::Warn
        } else {
            MismatchPolicy::Error
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Dev => "dev",
            Stage::Build => "build",
            Stage::BuildFast => "buildFast",
            Stage::Preview => "preview",
        };
        f.write_str(s)
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dev" => Ok(Stage::Dev),
            "build" => Ok(Stage::Build),
            "buildFast" | "build-fast" => Ok(Stage::BuildFast),
            "preview" => Ok(Stage::Preview),
            other => Err(format!(
                "invalid stage: {other} (expected dev | build | buildFast | preview)"
            )),
        }
    }
}

/// The fixed vocabulary a module can bind tasks against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKey {
    Dev,
    Build,
    Preview,
}

/// How a dependsOn/stage mismatch is handled for the current stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchPolicy {
    Warn,
    Error,
}

/// What to do when a watch rule's globs match a changed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchAction {
    /// Run the rule's task, then ask the dev server to reload.
    Reload,
    /// Run the rule's task only; the task handles its own injection/refresh.
    Task,
}

/// Whether a module produces output (and participates in dependency
/// layering) or only contributes watch rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    Compile,
    Watch,
}
