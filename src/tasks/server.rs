// src/tasks/server.rs

//! Dev-server collaborator.
//!
//! siteforge does not serve files itself; it optionally spawns a
//! configured server command (e.g. a live-reload static server) and keeps
//! the child alive for the duration of the dev session. The reload hook
//! handed to watch rules is a boundary: with no richer integration
//! configured it only logs, which keeps `reload`-action rules harmless
//! when no server is present.

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

/// Hook invoked after a `reload`-action watch task completes.
pub type ReloadFn = Arc<dyn Fn() + Send + Sync>;

/// Handle for the spawned dev-server process, if any.
///
/// Dropping this handle kills the child (`kill_on_drop`).
pub struct DevServer {
    child: Mutex<Option<Child>>,
    port: u16,
}

impl std::fmt::Debug for DevServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevServer").field("port", &self.port).finish()
    }
}

impl DevServer {
    /// Spawn the configured server command, or return an inert handle when
    /// no command is configured.
    pub fn start(cmd: Option<&str>, port: u16) -> Result<Self> {
        let child = match cmd {
            Some(cmd) if !cmd.trim().is_empty() => {
                info!(cmd = %cmd, port, "starting dev server");
                let mut command = if cfg!(windows) {
                    let mut c = Command::new("cmd");
                    c.arg("/C").arg(cmd);
                    c
                } else {
                    let mut c = Command::new("sh");
                    c.arg("-c").arg(cmd);
                    c
                };
                command.env("PORT", port.to_string()).kill_on_drop(true);
                let child = command
                    .spawn()
                    .with_context(|| format!("spawning dev server: {cmd}"))?;
                Some(child)
            }
            _ => {
                debug!("no dev server command configured; serving is up to the user");
                None
            }
        };

        Ok(Self {
            child: Mutex::new(child),
            port,
        })
    }

    /// Reload hook for watch rules with `action = reload`.
    ///
    /// Logs the request and nothing more: the configured server command is
    /// opaque, so browser refresh is delegated to a server that watches
    /// its own serve directory (see `[project.server].cmd` docs).
    pub fn reload_fn(self: &Arc<Self>) -> ReloadFn {
        let server = Arc::clone(self);
        Arc::new(move || {
            debug!(port = server.port, "reload requested");
        })
    }

    /// Kill the server child, if one is running.
    pub async fn shutdown(&self) {
        let child = {
            let mut guard = match self.child.lock() {
                Ok(g) => g,
                Err(_) => {
                    warn!("dev server handle poisoned; child will die on drop");
                    return;
                }
            };
            guard.take()
        };

        if let Some(mut child) = child {
            if let Err(e) = child.kill().await {
                warn!(error = %e, "failed to kill dev server");
            } else {
                info!("dev server stopped");
            }
        }
    }
}
