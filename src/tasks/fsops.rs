// src/tasks/fsops.rs

//! Filesystem collaborators: output cleanup and pass-through copies.
//!
//! Modules without a configured external engine (fonts, static files,
//! unoptimized assets) simply mirror their source directory into the
//! output tree. Each module copies into its own output subpath, so
//! concurrently running copy tasks never contend on the same file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::{TaskFn, TaskReturn};

/// Task that deletes the given output directories, tolerating absence.
pub fn clean_task(dirs: Vec<PathBuf>) -> TaskFn {
    let dirs = Arc::new(dirs);

    Arc::new(move || {
        let dirs = Arc::clone(&dirs);
        TaskReturn::Pending(Box::pin(async move {
            for dir in dirs.iter() {
                match tokio::fs::remove_dir_all(dir).await {
                    Ok(()) => info!(dir = ?dir, "removed output directory"),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        debug!(dir = ?dir, "output directory already absent");
                    }
                    Err(e) => {
                        return Err(e)
                            .with_context(|| format!("removing output directory {dir:?}"));
                    }
                }
            }
            Ok(())
        }))
    })
}

/// Task that recursively copies `from` into `to`, preserving relative paths.
///
/// A missing source directory is not an error: an optional module may be
/// enabled before its content exists.
pub fn copy_dir_task(module: &str, from: PathBuf, to: PathBuf) -> TaskFn {
    let module = module.to_string();

    Arc::new(move || {
        let module = module.clone();
        let from = from.clone();
        let to = to.clone();

        TaskReturn::Pending(Box::pin(async move {
            if !from.exists() {
                debug!(module = %module, src = ?from, "source directory absent; nothing to copy");
                return Ok(());
            }

            let copied = tokio::task::spawn_blocking(move || copy_tree(&from, &to))
                .await
                .context("copy task panicked")??;

            info!(module = %module, files = copied, "copied static sources");
            Ok(())
        }))
    })
}

/// Blocking recursive copy. Returns the number of files copied.
fn copy_tree(from: &Path, to: &Path) -> Result<usize> {
    let mut copied = 0usize;
    let mut stack = vec![from.to_path_buf()];

    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir)
            .with_context(|| format!("reading source directory {dir:?}"))?
        {
            let path = entry?.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.is_file() {
                let rel = path
                    .strip_prefix(from)
                    .context("source path escaped its own root")?;
                let dest = to.join(rel);
                if let Some(parent) = dest.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("creating {parent:?}"))?;
                }
                std::fs::copy(&path, &dest)
                    .with_context(|| format!("copying {path:?} to {dest:?}"))?;
                copied += 1;
            }
        }
    }

    Ok(copied)
}
