// src/watch/hash.rs

//! Aggregate content hashing for watch rules.
//!
//! With `[project.watch].content_hash` enabled, a rule only schedules a
//! rebuild when the combined content of its watched files actually
//! changed — editor touch events and re-saves of identical content are
//! skipped.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::watch::patterns::{collect_matching_files, CompiledWatchRule};

/// In-memory hash per watch key. Lives for the dev session; a restart
/// starts from a clean slate and triggers everything once.
#[derive(Debug, Default)]
pub struct HashCache {
    hashes: HashMap<String, blake3::Hash>,
}

impl HashCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `hash` for `key`; returns whether it differs from the
    /// previously recorded value (a missing previous value counts as
    /// changed).
    pub fn update(&mut self, key: &str, hash: blake3::Hash) -> bool {
        match self.hashes.insert(key.to_string(), hash) {
            Some(old) => old != hash,
            None => true,
        }
    }
}

/// Hash of hashes over all files matching the rule, in sorted path order,
/// so the result is stable across directory iteration order.
pub fn aggregate_hash(root: &Path, rule: &CompiledWatchRule) -> Result<blake3::Hash> {
    let files = collect_matching_files(root, rule)?;

    let mut hasher = blake3::Hasher::new();
    for path in files {
        let contents = std::fs::read(&path)
            .with_context(|| format!("reading {path:?} for content hash"))?;
        hasher.update(blake3::hash(&contents).as_bytes());
    }

    Ok(hasher.finalize())
}
