// src/watch/scheduler.rs

//! Debounce + single-flight runner for watch events.
//!
//! One rebuild per burst of changes; if changes land during an active
//! run, exactly one additional run happens afterwards, using the most
//! recently scheduled closure.
//!
//! Per-key state machine: Idle → PendingDebounce → Running
//! (→ RunningWithQueuedRerun → Running) → Idle. Entries are created
//! lazily on first schedule and only removed on [`Scheduler::close`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::tasks::{await_task, TaskFn};

#[derive(Default)]
struct KeyState {
    /// Pending debounce timer; re-armed on every schedule call.
    timer: Option<JoinHandle<()>>,
    running: bool,
    /// One-shot "re-run requested" flag; never counts past one.
    queued: bool,
    /// Most recently scheduled closure. Only the last closure of a burst
    /// runs — true debounce, not throttle.
    last_fn: Option<TaskFn>,
}

type StateMap = Arc<Mutex<HashMap<String, KeyState>>>;

/// Keyed debounce + single-flight scheduler for the dev watch session.
pub struct Scheduler {
    state: StateMap,
    debounce: Duration,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("debounce", &self.debounce)
            .finish_non_exhaustive()
    }
}

impl Scheduler {
    pub fn new(debounce: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(HashMap::new())),
            debounce,
        }
    }

    /// Schedule `task` for `key`, replacing any previously scheduled
    /// closure for that key and re-arming the debounce timer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, key: &str, task: TaskFn) {
        let mut map = match self.state.lock() {
            Ok(g) => g,
            Err(_) => {
                warn!(key = %key, "scheduler state poisoned; dropping schedule request");
                return;
            }
        };

        let s = map.entry(key.to_string()).or_default();
        s.last_fn = Some(task);

        if let Some(timer) = s.timer.take() {
            timer.abort();
        }

        let state = Arc::clone(&self.state);
        let key_owned = key.to_string();
        let debounce = self.debounce;

        // The run must be spawned detached, not awaited here: `schedule`
        // aborts this timer handle, and an abort landing after the sleep
        // expires must never take a started run down with it. Past the
        // sleep the timer body has no await points left, so it always
        // completes the hand-off.
        s.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;

            if let Ok(mut map) = state.lock() {
                if let Some(s) = map.get_mut(&key_owned) {
                    s.timer = None;
                }
            }

            tokio::spawn(run_now(state, key_owned));
        }));
    }

    /// Abort all pending timers and drop per-key state. In-flight runs are
    /// left to finish; they find their key gone and stop there.
    pub fn close(&self) {
        let mut map = match self.state.lock() {
            Ok(g) => g,
            Err(_) => {
                warn!("scheduler state poisoned during close");
                return;
            }
        };
        for s in map.values_mut() {
            if let Some(timer) = s.timer.take() {
                timer.abort();
            }
        }
        map.clear();
    }
}

/// Execute the latest closure for `key`, honouring single-flight: if a run
/// is already active, record that one more run is owed and return. After a
/// run settles, a queued re-run re-reads `last_fn` so it always executes
/// the closure from the most recent schedule call.
async fn run_now(state: StateMap, key: String) {
    loop {
        let task = {
            let mut map = match state.lock() {
                Ok(g) => g,
                Err(_) => {
                    warn!(key = %key, "scheduler state poisoned; abandoning run");
                    return;
                }
            };
            let Some(s) = map.get_mut(&key) else {
                return;
            };
            if s.running {
                s.queued = true;
                debug!(key = %key, "run already in flight; queued one re-run");
                return;
            }
            let Some(task) = s.last_fn.clone() else {
                return;
            };
            s.running = true;
            task
        };

        // Errors must be visible, but the watcher must not die in dev.
        if let Err(err) = await_task(task()).await {
            error!(key = %key, error = %format!("{err:#}"), "watch task failed; session continues");
        }

        {
            let mut map = match state.lock() {
                Ok(g) => g,
                Err(_) => return,
            };
            let Some(s) = map.get_mut(&key) else {
                return;
            };
            s.running = false;
            if s.queued {
                s.queued = false;
                debug!(key = %key, "starting queued re-run");
                continue;
            }
            return;
        }
    }
}
