// src/registry/contract.rs

//! Module contract validation.
//!
//! Pure, synchronous, fail-fast on the first violation. Runs at
//! registry-construction time so a malformed registry never reaches
//! stage execution. Messages name the offending module id and field —
//! this is the only error-reporting path for malformed registries.
//!
//! The stage set and watch actions are closed enums here, so their shape
//! checks are compile-time; what remains representable (ids, dependency
//! references, globs) is validated below.

use std::collections::HashSet;

use thiserror::Error;

use crate::registry::module::{ModuleDescriptor, WatchRule};
use crate::types::ModuleKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error("module id must be a non-empty string")]
    EmptyModuleId,

    #[error("duplicate module id: \"{0}\"")]
    DuplicateModuleId(String),

    #[error("{id}: tasks must define at least one stage task for compile modules")]
    MissingTasks { id: String },

    #[error("{id}: dependsOn items must be non-empty strings")]
    EmptyDependency { id: String },

    #[error("{id}: dependsOn references unknown module: \"{dep}\"")]
    UnknownDependency { id: String, dep: String },

    #[error("{id}: module cannot depend on itself")]
    SelfDependency { id: String },

    #[error("watch rule \"key\" must be a non-empty string")]
    EmptyWatchKey,

    #[error("watch rule \"{key}\": globs must be one or more non-empty strings")]
    InvalidWatchGlobs { key: String },
}

/// Validate the registry shape and common pitfalls.
///
/// Individual descriptors are checked first; `dependsOn` references are
/// checked in a second pass, after the full id set is known — declaration
/// order carries no meaning, a module may depend on one declared later.
pub fn validate_module_registry(modules: &[ModuleDescriptor]) -> Result<(), ContractError> {
    let mut ids: HashSet<&str> = HashSet::new();

    for m in modules {
        if m.id.trim().is_empty() {
            return Err(ContractError::EmptyModuleId);
        }
        if !ids.insert(m.id.as_str()) {
            return Err(ContractError::DuplicateModuleId(m.id.clone()));
        }

        if m.kind == ModuleKind::Compile && m.tasks.is_empty() {
            return Err(ContractError::MissingTasks { id: m.id.clone() });
        }
    }

    for m in modules {
        for dep in &m.depends_on {
            if dep.trim().is_empty() {
                return Err(ContractError::EmptyDependency { id: m.id.clone() });
            }
            if dep == &m.id {
                return Err(ContractError::SelfDependency { id: m.id.clone() });
            }
            if !ids.contains(dep.as_str()) {
                return Err(ContractError::UnknownDependency {
                    id: m.id.clone(),
                    dep: dep.clone(),
                });
            }
        }
    }

    Ok(())
}

/// Validate expanded watch rules (after calling each module's watch
/// producer).
pub fn validate_watch_rules(rules: &[WatchRule]) -> Result<(), ContractError> {
    for r in rules {
        if r.key.trim().is_empty() {
            return Err(ContractError::EmptyWatchKey);
        }
        if r.globs.is_empty() || r.globs.iter().any(|g| g.trim().is_empty()) {
            return Err(ContractError::InvalidWatchGlobs { key: r.key.clone() });
        }
    }

    Ok(())
}
