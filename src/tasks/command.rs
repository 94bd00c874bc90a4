// src/tasks/command.rs

//! Shell-command module task.
//!
//! Every "real" static-site module (templates, styles, scripts, media…)
//! is a thin wrapper around an external tool. This runner spawns the
//! configured command line and streams its terminal state back to the
//! orchestrator over the task-stream channel.

use std::process::Stdio;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{StreamEvent, TaskFn, TaskReturn, TaskStream};

/// Build a [`TaskFn`] that runs `cmd` through the platform shell.
///
/// Each invocation spawns a fresh process; the returned
/// [`TaskReturn::Streaming`] resolves when the process exits.
pub fn command_task(module: &str, cmd: &str) -> TaskFn {
    let module = module.to_string();
    let cmd = cmd.to_string();

    Arc::new(move || {
        let (tx, stream) = TaskStream::channel();
        let module = module.clone();
        let cmd = cmd.clone();

        tokio::spawn(async move {
            match run_command(&module, &cmd).await {
                Ok(success) => {
                    let event = if success {
                        StreamEvent::Finish
                    } else {
                        StreamEvent::Error(format!(
                            "command for module '{module}' exited with failure"
                        ))
                    };
                    let _ = tx.send(event);
                }
                Err(err) => {
                    let _ = tx.send(StreamEvent::Error(format!("{err:#}")));
                }
            }
        });

        TaskReturn::Streaming(stream)
    })
}

/// Spawn the process and wait for it. Returns whether it exited 0.
async fn run_command(module: &str, cmd: &str) -> Result<bool> {
    info!(module = %module, cmd = %cmd, "starting module command");

    let mut command = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    };

    command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .with_context(|| format!("spawning command for module '{module}'"))?;

    // Drain both pipes so the child never blocks on a full buffer.
    if let Some(stdout) = child.stdout.take() {
        let module = module.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(module = %module, "stdout: {}", line);
            }
        });
    }
    if let Some(stderr) = child.stderr.take() {
        let module = module.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(module = %module, "stderr: {}", line);
            }
        });
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for command of module '{module}'"))?;

    let code = status.code().unwrap_or(-1);
    if status.success() {
        info!(module = %module, exit_code = code, "module command finished");
    } else {
        warn!(module = %module, exit_code = code, "module command failed");
    }

    Ok(status.success())
}
