// src/pipeline/mod.rs

//! Pipeline representation and execution.
//!
//! [`assembler`] composes the steps for a stage; [`Pipeline::run`]
//! executes them: serial steps one task after another, concurrent steps
//! as spawned tasks joined before the pipeline advances. A single slow
//! task therefore delays everything after its layer, by design.

pub mod assembler;

pub use assembler::{build_pipeline, StageTaskSet};

use std::fmt::Write as _;

use tracing::{debug, info};

use crate::errors::{Result, SiteforgeError};
use crate::registry::module::NamedTask;
use crate::tasks::await_task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMode {
    Serial,
    Concurrent,
}

/// One top-level pipeline position.
pub struct Step {
    pub label: String,
    pub mode: StepMode,
    pub tasks: Vec<NamedTask>,
}

impl Step {
    pub fn new(label: impl Into<String>, mode: StepMode, tasks: Vec<NamedTask>) -> Self {
        Self {
            label: label.into(),
            mode,
            tasks,
        }
    }

    pub fn serial(label: impl Into<String>, tasks: Vec<NamedTask>) -> Self {
        Self::new(label, StepMode::Serial, tasks)
    }

    fn task_ids(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.id.as_str()).collect()
    }
}

/// The runnable procedure for one stage.
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Human-readable plan, used by `--dry-run`.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            let mode = match step.mode {
                StepMode::Serial => "series",
                StepMode::Concurrent => "parallel",
            };
            let _ = writeln!(out, "  {} ({mode}): {}", step.label, step.task_ids().join(", "));
        }
        out
    }

    /// Execute every step in order. The first task failure fails the whole
    /// run — a broken build must not silently publish partial output.
    pub async fn run(&self) -> Result<()> {
        for step in &self.steps {
            debug!(step = %step.label, tasks = ?step.task_ids(), "running pipeline step");
            match step.mode {
                StepMode::Serial => {
                    for named in &step.tasks {
                        run_one(named).await?;
                    }
                }
                StepMode::Concurrent => {
                    run_concurrent(step).await?;
                }
            }
        }
        Ok(())
    }
}

async fn run_one(named: &NamedTask) -> Result<()> {
    info!(task = %named.id, "running task");
    await_task((named.task)())
        .await
        .map_err(|err| SiteforgeError::TaskFailed {
            task: named.id.clone(),
            message: format!("{err:#}"),
        })
}

/// Run every task in the layer to settlement, then report the first
/// failure, if any. The layer never advances half-finished.
async fn run_concurrent(step: &Step) -> Result<()> {
    let mut handles = Vec::with_capacity(step.tasks.len());

    for named in &step.tasks {
        let id = named.id.clone();
        let ret = (named.task)();
        info!(task = %id, step = %step.label, "running task (parallel)");
        handles.push((id, tokio::spawn(await_task(ret))));
    }

    let mut first_error: Option<SiteforgeError> = None;
    for (id, handle) in handles {
        let outcome = match handle.await {
            Ok(res) => res,
            Err(join_err) => Err(anyhow::anyhow!("task panicked: {join_err}")),
        };
        if let Err(err) = outcome {
            if first_error.is_none() {
                first_error = Some(SiteforgeError::TaskFailed {
                    task: id,
                    message: format!("{err:#}"),
                });
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
