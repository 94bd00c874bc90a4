// src/watch/patterns.rs

//! Compiled glob matching for watch rules.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::registry::module::WatchRule;
use crate::tasks::TaskFn;
use crate::types::WatchAction;

/// A watch rule with its globs compiled for matching.
///
/// Patterns are relative to the project root; the watcher passes relative
/// paths (e.g. `"src/styles/main.scss"`) into [`matches`](Self::matches).
#[derive(Clone)]
pub struct CompiledWatchRule {
    pub key: String,
    pub raw_globs: Vec<String>,
    pub task: TaskFn,
    pub action: WatchAction,
    glob_set: GlobSet,
}

impl fmt::Debug for CompiledWatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledWatchRule")
            .field("key", &self.key)
            .field("globs", &self.raw_globs)
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

impl CompiledWatchRule {
    pub fn matches(&self, rel_path: &str) -> bool {
        self.glob_set.is_match(rel_path)
    }
}

/// Compile each validated rule's globs into a `GlobSet`.
pub fn compile_watch_rules(rules: Vec<WatchRule>) -> Result<Vec<CompiledWatchRule>> {
    let mut compiled = Vec::with_capacity(rules.len());

    for rule in rules {
        let glob_set = build_globset(&rule.globs)
            .with_context(|| format!("building globset for watch rule '{}'", rule.key))?;

        compiled.push(CompiledWatchRule {
            key: rule.key,
            raw_globs: rule.globs,
            task: rule.task,
            action: rule.action,
            glob_set,
        });
    }

    Ok(compiled)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Collect every file under `root` matching the rule, for aggregate
/// content hashing.
pub fn collect_matching_files(root: &Path, rule: &CompiledWatchRule) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = match std::fs::read_dir(&dir) {
            Ok(e) => e,
            // Directories can vanish mid-walk during rapid saves.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
            Err(err) => {
                return Err(err).with_context(|| format!("reading directory {dir:?}"));
            }
        };

        for entry in entries {
            let path = entry?.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.is_file() {
                if let Ok(rel) = path.strip_prefix(root) {
                    let rel_str = rel.to_string_lossy().replace('\\', "/");
                    if rule.matches(&rel_str) {
                        files.push(path);
                    }
                }
            }
        }
    }

    files.sort();
    Ok(files)
}
