// src/lib.rs

//! siteforge — static-site build orchestration.
//!
//! The crate wires four layers together:
//!
//! - [`registry`]: module descriptors + the built-in catalogue.
//! - [`dag`]: layered dependency ordering shared by compile modules and
//!   post-compile steps.
//! - [`pipeline`]: stage pipeline assembly and execution.
//! - [`watch`]: dev-session file watching with debounce + single-flight.
//!
//! [`run`] is the top-level entry the binary calls with parsed CLI args.

pub mod cli;
pub mod config;
pub mod context;
pub mod dag;
pub mod errors;
pub mod logging;
pub mod pipeline;
pub mod registry;
pub mod tasks;
pub mod types;
pub mod watch;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::context::BuildContext;
use crate::errors::Result;
use crate::pipeline::{build_pipeline, StageTaskSet};
use crate::registry::{built_in_registry, Registry};
use crate::tasks::{clean_task, command_task, DevServer, ReloadFn, TaskFn, TaskReturn};
use crate::watch::{spawn_watcher, Scheduler, WatcherHandle};

/// Run one stage end to end.
pub async fn run(args: CliArgs) -> Result<()> {
    let stage = args.stage();
    let config = config::load_or_default(&args.config)?;
    let ctx = BuildContext::new(stage, config);

    info!(stage = %stage, config = %args.config, "assembling pipeline");

    let registry = built_in_registry(&ctx)?;

    let session = DevSession::default();
    let tasks = bind_stage_tasks(&ctx, &registry, &session)?;
    let pipeline = build_pipeline(&registry, &ctx, tasks)?;

    if args.dry_run {
        println!("pipeline for stage '{stage}':");
        print!("{}", pipeline.describe());
        return Ok(());
    }

    pipeline.run().await?;

    if stage.is_dev() {
        info!("dev session running; press Ctrl-C to stop");
        tokio::signal::ctrl_c().await.map_err(errors::SiteforgeError::IoError)?;
        session.shutdown().await;
        info!("dev session stopped");
    } else {
        info!(stage = %stage, "pipeline finished");
    }

    Ok(())
}

/// Long-lived dev-session handles, filled in by the serve-step tasks as
/// they run and torn down on Ctrl-C.
#[derive(Default, Clone)]
struct DevSession {
    server: Arc<Mutex<Option<Arc<DevServer>>>>,
    scheduler: Arc<Mutex<Option<Arc<Scheduler>>>>,
    watcher: Arc<Mutex<Option<WatcherHandle>>>,
}

impl DevSession {
    fn store_server(&self, server: Arc<DevServer>) {
        if let Ok(mut slot) = self.server.lock() {
            *slot = Some(server);
        }
    }

    fn server(&self) -> Option<Arc<DevServer>> {
        self.server.lock().ok().and_then(|s| s.clone())
    }

    fn store_watch(&self, scheduler: Arc<Scheduler>, watcher: WatcherHandle) {
        if let Ok(mut slot) = self.scheduler.lock() {
            *slot = Some(scheduler);
        }
        if let Ok(mut slot) = self.watcher.lock() {
            *slot = Some(watcher);
        }
    }

    async fn shutdown(&self) {
        if let Ok(mut slot) = self.watcher.lock() {
            // Dropping the handle stops event delivery before anything else.
            slot.take();
        }
        let scheduler = self.scheduler.lock().ok().and_then(|mut s| s.take());
        if let Some(scheduler) = scheduler {
            scheduler.close();
        }
        let server = self.server.lock().ok().and_then(|mut s| s.take());
        if let Some(server) = server {
            server.shutdown().await;
        }
    }
}

/// Bind the stage-level tasks around the compile layers.
fn bind_stage_tasks(
    ctx: &BuildContext,
    registry: &Registry,
    session: &DevSession,
) -> Result<StageTaskSet> {
    let mut tasks = StageTaskSet {
        clean: Some(clean_task(vec![
            ctx.paths().dist.clone(),
            ctx.paths().public.clone(),
        ])),
        ..StageTaskSet::default()
    };

    if ctx.stage().is_dev() {
        tasks.server = Some(server_task(ctx, session));
        tasks.watch = Some(watch_task(ctx, registry, session)?);
    } else {
        let engines = &ctx.config().engines;
        if ctx.features().versioning.enabled {
            match engines.versioning.as_deref() {
                Some(cmd) => tasks.versioning = Some(command_task("versioning", cmd)),
                None => warn!("versioning enabled but no [engines].versioning command; skipping"),
            }
        }
        if ctx.features().seo.enabled {
            match engines.seo.as_deref() {
                Some(cmd) => tasks.seo = Some(command_task("seo", cmd)),
                None => warn!("seo enabled but no [engines].seo command; skipping"),
            }
        }
    }

    Ok(tasks)
}

/// Dev-server task: spawns the configured server command (if any) and
/// parks the handle in the session.
fn server_task(ctx: &BuildContext, session: &DevSession) -> TaskFn {
    let cmd = ctx.project().server.cmd.clone();
    let port = ctx.project().server.port;
    let session = session.clone();

    Arc::new(move || {
        let cmd = cmd.clone();
        let session = session.clone();
        TaskReturn::Pending(Box::pin(async move {
            let server = Arc::new(DevServer::start(cmd.as_deref(), port)?);
            session.store_server(server);
            Ok(())
        }))
    })
}

/// Watch task: registers filesystem watchers for every enabled watch rule
/// and returns once registration is done. The watcher itself lives in the
/// session until shutdown.
fn watch_task(ctx: &BuildContext, registry: &Registry, session: &DevSession) -> Result<TaskFn> {
    let rules = registry.enabled_watch_rules(ctx)?;
    let debounce = Duration::from_millis(ctx.project().watch.debounce_ms);
    let content_hash = ctx.project().watch.content_hash;
    let session = session.clone();
    let rules = Arc::new(Mutex::new(Some(rules)));

    Ok(Arc::new(move || {
        let session = session.clone();
        let rules = rules.clone();
        TaskReturn::Pending(Box::pin(async move {
            let rules = rules
                .lock()
                .ok()
                .and_then(|mut r| r.take())
                .unwrap_or_default();
            if rules.is_empty() {
                info!("no watch rules enabled; skipping file watching");
                return Ok(());
            }

            let reload: ReloadFn = match session.server() {
                Some(server) => server.reload_fn(),
                None => Arc::new(|| {
                    tracing::debug!("reload requested (no dev server running)");
                }),
            };

            let scheduler = Arc::new(Scheduler::new(debounce));
            let watcher =
                spawn_watcher(".", rules, Arc::clone(&scheduler), reload, content_hash)?;
            session.store_watch(scheduler, watcher);
            info!("watching for file changes");
            Ok(())
        }))
    }))
}
