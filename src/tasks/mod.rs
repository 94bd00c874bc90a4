// src/tasks/mod.rs

//! Opaque module tasks and the task-return contract.
//!
//! The orchestrator never looks inside a task: a module task is a
//! zero-argument closure producing a [`TaskReturn`]. Historically such
//! tasks returned "nothing, a promise, or a stream"; here that
//! polymorphism is a closed enum, normalized to a single future by
//! [`await_task`] — the only place in the crate that interprets task
//! results.
//!
//! Concrete collaborators (external engine commands, file copies,
//! cleanup, the dev server) live in the submodules. None of them contain
//! compilation or codec logic; they shell out or move bytes.

pub mod command;
pub mod fsops;
pub mod server;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

pub use command::command_task;
pub use fsops::{clean_task, copy_dir_task};
pub use server::{DevServer, ReloadFn};

/// Boxed future a task may hand to the orchestrator.
pub type TaskFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

/// A zero-argument module task. Invoking it starts the work.
pub type TaskFn = Arc<dyn Fn() -> TaskReturn + Send + Sync>;

/// What a task invocation hands back to the orchestrator.
pub enum TaskReturn {
    /// The work completed synchronously (or there was nothing to do).
    Completed,
    /// Asynchronous completion; the orchestrator awaits the future.
    Pending(TaskFuture),
    /// Streaming completion; the orchestrator awaits the first terminal
    /// event on the stream.
    Streaming(TaskStream),
}

impl std::fmt::Debug for TaskReturn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TaskReturn::Completed => "Completed",
            TaskReturn::Pending(_) => "Pending",
            TaskReturn::Streaming(_) => "Streaming",
        };
        f.write_str(name)
    }
}

/// Terminal events a streaming task can emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Finish,
    End,
    Close,
    Error(String),
}

/// Receiver half of a streaming task's event channel.
pub struct TaskStream {
    events: mpsc::UnboundedReceiver<StreamEvent>,
}

impl TaskStream {
    pub fn new(events: mpsc::UnboundedReceiver<StreamEvent>) -> Self {
        Self { events }
    }

    /// Create a stream together with its sender half.
    pub fn channel() -> (mpsc::UnboundedSender<StreamEvent>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self::new(rx))
    }
}

/// Normalize any [`TaskReturn`] into a single completion.
///
/// - `Completed` resolves immediately.
/// - `Pending` awaits the inner future.
/// - `Streaming` resolves on the first of `Finish`/`End`/`Close`, fails on
///   `Error`, and treats a closed channel as completion (the producer went
///   away without reporting a failure).
pub async fn await_task(ret: TaskReturn) -> anyhow::Result<()> {
    match ret {
        TaskReturn::Completed => Ok(()),
        TaskReturn::Pending(fut) => fut.await,
        TaskReturn::Streaming(mut stream) => loop {
            match stream.events.recv().await {
                Some(StreamEvent::Finish)
                | Some(StreamEvent::End)
                | Some(StreamEvent::Close) => break Ok(()),
                Some(StreamEvent::Error(msg)) => {
                    break Err(anyhow::anyhow!(msg));
                }
                None => {
                    debug!("task stream closed without a terminal event; treating as done");
                    break Ok(());
                }
            }
        },
    }
}

/// Wrap an async closure into a [`TaskFn`] producing `Pending` returns.
pub fn task_fn<F, Fut>(f: F) -> TaskFn
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move || TaskReturn::Pending(Box::pin(f())))
}

/// A task that does nothing and reports immediate completion.
///
/// Used wherever an optional pipeline position is unbound; the pipeline
/// must never stall because a component was disabled.
pub fn noop_task() -> TaskFn {
    Arc::new(|| TaskReturn::Completed)
}
