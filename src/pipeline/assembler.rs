// src/pipeline/assembler.rs

//! Pipeline assembly: clean → compile layers → stage branch.

use crate::context::BuildContext;
use crate::dag::{compile_layers, layered_sort};
use crate::errors::Result;
use crate::pipeline::{Pipeline, Step, StepMode};
use crate::registry::module::NamedTask;
use crate::registry::Registry;
use crate::tasks::TaskFn;

/// Stage-level tasks bound around the compile layers. Any of these may be
/// unbound; an unbound position simply contributes no step.
#[derive(Default)]
pub struct StageTaskSet {
    pub clean: Option<TaskFn>,
    /// Dev only: starts the dev server.
    pub server: Option<TaskFn>,
    /// Dev only: registers filesystem watchers and returns.
    pub watch: Option<TaskFn>,
    /// Non-dev post step; depends on every compile module that ran.
    pub versioning: Option<TaskFn>,
    /// Non-dev post step; depends on versioning iff versioning is bound.
    pub seo: Option<TaskFn>,
}

/// A post-compile step name and its dependency ids, resolved against
/// whatever other post steps are bound.
struct PostNode {
    id: &'static str,
    task: TaskFn,
    depends_on: Vec<String>,
}

/// Compose the runnable procedure for one stage.
///
/// Strictly sequential at the top level:
/// 1. clean (if bound)
/// 2. each compile layer, concurrent within the layer
/// 3. dev: server then watch, in series;
///    non-dev: post steps, topologically sorted, in series (post steps
///    rewrite shared artifacts and are not safely parallelizable).
pub fn build_pipeline(
    registry: &Registry,
    ctx: &BuildContext,
    tasks: StageTaskSet,
) -> Result<Pipeline> {
    let mut steps = Vec::new();

    if let Some(clean) = tasks.clean {
        steps.push(Step::serial(
            "clean",
            vec![NamedTask {
                id: "clean".to_string(),
                task: clean,
            }],
        ));
    }

    for (i, layer) in compile_layers(registry, ctx)?.into_iter().enumerate() {
        if layer.is_empty() {
            continue;
        }
        let label = format!("compile#{}", i + 1);
        let mode = if layer.len() > 1 {
            StepMode::Concurrent
        } else {
            StepMode::Serial
        };
        steps.push(Step::new(label, mode, layer));
    }

    if ctx.stage().is_dev() {
        let mut serve = Vec::new();
        if let Some(server) = tasks.server {
            serve.push(NamedTask {
                id: "server".to_string(),
                task: server,
            });
        }
        if let Some(watch) = tasks.watch {
            serve.push(NamedTask {
                id: "watch".to_string(),
                task: watch,
            });
        }
        if !serve.is_empty() {
            steps.push(Step::serial("serve", serve));
        }
    } else {
        let post = post_steps(registry, ctx, tasks.versioning, tasks.seo)?;
        if !post.is_empty() {
            steps.push(Step::serial("post", post));
        }
    }

    Ok(Pipeline::new(steps))
}

/// Order the bound post steps through the shared layered sort.
///
/// Versioning depends on the full enabled compile-id set — ids that are
/// not post nodes themselves contribute no edge, which encodes "after all
/// compile layers" given the pipeline's top-level sequencing.
fn post_steps(
    registry: &Registry,
    ctx: &BuildContext,
    versioning: Option<TaskFn>,
    seo: Option<TaskFn>,
) -> Result<Vec<NamedTask>> {
    let mut nodes: Vec<PostNode> = Vec::new();

    let versioning_bound = versioning.is_some();
    if let Some(task) = versioning {
        nodes.push(PostNode {
            id: "versioning",
            task,
            depends_on: registry.enabled_compile_ids(ctx),
        });
    }
    if let Some(task) = seo {
        let depends_on = if versioning_bound {
            vec!["versioning".to_string()]
        } else {
            Vec::new()
        };
        nodes.push(PostNode {
            id: "seo",
            task,
            depends_on,
        });
    }

    if nodes.is_empty() {
        return Ok(Vec::new());
    }

    let layers = layered_sort(
        &nodes,
        |n| n.id,
        |n| n.depends_on.iter().map(String::as_str).collect(),
        |a, b| a.id.cmp(b.id),
    )?;

    Ok(layers
        .into_iter()
        .flatten()
        .map(|n| NamedTask {
            id: n.id.to_string(),
            task: n.task.clone(),
        })
        .collect())
}
