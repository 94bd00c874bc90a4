// src/errors.rs

//! Crate-wide error type and helpers.

use thiserror::Error;

use crate::dag::CycleError;
use crate::registry::ContractError;
use crate::types::Stage;

#[derive(Error, Debug)]
pub enum SiteforgeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error(transparent)]
    Cycle(#[from] CycleError),

    #[error(
        "Module \"{module}\" dependsOn \"{dep}\", but \"{dep}\" is not runnable for stage \"{stage}\". \
         Either enable \"{dep}\" for this stage or remove/adjust dependsOn."
    )]
    DependsOnMismatch {
        module: String,
        dep: String,
        stage: Stage,
    },

    #[error("Task '{task}' failed: {message}")]
    TaskFailed { task: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SiteforgeError>;
