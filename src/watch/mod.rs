// src/watch/mod.rs

//! Dev-session file watching: notify events in, debounced task runs out.

pub mod hash;
pub mod patterns;
pub mod scheduler;
pub mod watcher;

pub use scheduler::Scheduler;
pub use watcher::{spawn_watcher, WatcherHandle};
