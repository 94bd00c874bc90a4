// src/dag/layers.rs

//! Dependency-ordered compile layering.

use std::collections::HashSet;

use tracing::warn;

use crate::context::BuildContext;
use crate::dag::topo::layered_sort;
use crate::errors::{Result, SiteforgeError};
use crate::registry::module::NamedTask;
use crate::registry::Registry;
use crate::types::{MismatchPolicy, ModuleKind};

/// Compute the compile layers for this stage: a sequence of task groups to
/// run strictly in order, tasks within one group concurrently.
///
/// Restricted to enabled, runnable, compile-kind modules. A dependency on
/// a module that is enabled but has no task bound for this stage is a
/// dependsOn mismatch: warned and dropped in dev, fatal elsewhere. A
/// dependency on a fully disabled module is invisible, same as the module
/// itself.
pub fn compile_layers(registry: &Registry, ctx: &BuildContext) -> Result<Vec<Vec<NamedTask>>> {
    let enabled_ids: HashSet<&str> = registry
        .enabled_modules(ctx)
        .iter()
        .map(|m| m.id.as_str())
        .collect();

    let runnable: Vec<_> = registry
        .runnable_modules(ctx)
        .into_iter()
        .filter(|(m, _)| m.kind == ModuleKind::Compile)
        .collect();

    let runnable_ids: HashSet<&str> = runnable.iter().map(|(m, _)| m.id.as_str()).collect();

    for (m, _) in &runnable {
        for dep in &m.depends_on {
            if !enabled_ids.contains(dep.as_str()) {
                continue;
            }
            if !runnable_ids.contains(dep.as_str()) {
                report_mismatch(ctx, &m.id, dep)?;
            }
        }
    }

    let layers = layered_sort(
        &runnable,
        |(m, _)| m.id.as_str(),
        |(m, _)| m.depends_on.iter().map(String::as_str).collect(),
        |(a, _), (b, _)| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)),
    )?;

    Ok(layers
        .into_iter()
        .map(|layer| {
            layer
                .into_iter()
                .map(|(m, task)| NamedTask {
                    id: m.id.clone(),
                    task: (*task).clone(),
                })
                .collect()
        })
        .collect())
}

fn report_mismatch(ctx: &BuildContext, module: &str, dep: &str) -> Result<()> {
    let stage = ctx.stage();
    match stage.mismatch_policy() {
        MismatchPolicy::Warn => {
            warn!(
                module = %module,
                dep = %dep,
                stage = %stage,
                "module dependsOn a module that is not runnable for this stage; dropping the edge"
            );
            Ok(())
        }
        MismatchPolicy::Error => Err(SiteforgeError::DependsOnMismatch {
            module: module.to_string(),
            dep: dep.to_string(),
            stage,
        }),
    }
}
