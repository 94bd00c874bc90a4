// src/watch/watcher.rs

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use crate::registry::module::WatchRule;
use crate::tasks::{await_task, ReloadFn, TaskFn, TaskReturn};
use crate::types::WatchAction;
use crate::watch::hash::{aggregate_hash, HashCache};
use crate::watch::patterns::{compile_watch_rules, CompiledWatchRule};
use crate::watch::scheduler::Scheduler;

/// Handle for the filesystem watcher.
///
/// Exists mainly so the underlying `RecommendedWatcher` stays alive for
/// as long as needed. Dropping this handle stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher observing `root` recursively, feeding
/// matching change events into the debounce scheduler.
///
/// - `rules` are the enabled, validated watch rules for this session.
/// - `reload` is invoked after a `reload`-action task completes.
/// - `content_hash` enables the aggregate-hash skip per rule.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    rules: Vec<WatchRule>,
    scheduler: Arc<Scheduler>,
    reload: ReloadFn,
    content_hash: bool,
) -> Result<WatcherHandle> {
    let root = root.into();
    // Canonicalize once so relative matching has a stable base.
    let root = root.canonicalize().unwrap_or(root);

    let rules = Arc::new(compile_watch_rules(rules)?);

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // tracing is unavailable inside the notify thread.
                    eprintln!("siteforge: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("siteforge: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!(root = ?root, rules = rules.len(), "file watcher started");

    let event_root = root.clone();
    let event_rules = Arc::clone(&rules);

    tokio::spawn(async move {
        let hash_cache = Arc::new(Mutex::new(HashCache::new()));

        while let Some(event) = event_rx.recv().await {
            debug!(?event, "received notify event");

            for path in event.paths {
                process_path(
                    &event_root,
                    &path,
                    &event_rules,
                    &scheduler,
                    &reload,
                    content_hash,
                    &hash_cache,
                )
                .await;
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Match one changed path against every rule and schedule the matches.
async fn process_path(
    root: &PathBuf,
    path: &PathBuf,
    rules: &Arc<Vec<CompiledWatchRule>>,
    scheduler: &Arc<Scheduler>,
    reload: &ReloadFn,
    content_hash: bool,
    hash_cache: &Arc<Mutex<HashCache>>,
) {
    let Some(rel_str) = relative_str(root, path) else {
        warn!(path = ?path, root = ?root, "could not relativize event path");
        return;
    };

    for rule in rules.iter() {
        if !rule.matches(&rel_str) {
            continue;
        }

        if content_hash && !content_changed(root, rule, hash_cache).await {
            info!(key = %rule.key, path = %rel_str, "watched content unchanged; skipping trigger");
            continue;
        }

        debug!(key = %rule.key, path = %rel_str, "watch match; scheduling");

        let handler = match rule.action {
            WatchAction::Task => rule.task.clone(),
            WatchAction::Reload => with_reload(rule.task.clone(), reload.clone()),
        };
        scheduler.schedule(&rule.key, handler);
    }
}

/// Aggregate-hash check; any error falls back to triggering.
async fn content_changed(
    root: &PathBuf,
    rule: &CompiledWatchRule,
    hash_cache: &Arc<Mutex<HashCache>>,
) -> bool {
    let root = root.clone();
    let rule = rule.clone();
    let cache = Arc::clone(hash_cache);

    let result = tokio::task::spawn_blocking(move || -> bool {
        let hash = match aggregate_hash(&root, &rule) {
            Ok(h) => h,
            Err(err) => {
                warn!(key = %rule.key, error = %err, "failed to hash watched files; triggering anyway");
                return true;
            }
        };

        match cache.lock() {
            Ok(mut cache) => cache.update(&rule.key, hash),
            Err(_) => {
                warn!(key = %rule.key, "hash cache poisoned; triggering anyway");
                true
            }
        }
    })
    .await;

    // A panicked hash check defaults to triggering.
    result.unwrap_or(true)
}

/// Wrap a reload-action task: run it, then ask the dev server to reload.
fn with_reload(task: TaskFn, reload: ReloadFn) -> TaskFn {
    Arc::new(move || {
        let ret = task();
        let reload = reload.clone();
        TaskReturn::Pending(Box::pin(async move {
            await_task(ret).await?;
            reload();
            Ok(())
        }))
    })
}

fn relative_str(root: &PathBuf, path: &PathBuf) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
}
