// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! NOTE: this expects `clap` to be built with the `derive` feature, e.g.:
//! `clap = { version = "4.5", features = ["derive"] }` in `Cargo.toml`.

use clap::{Parser, Subcommand, ValueEnum};

use crate::types::Stage;

/// Command-line arguments for `siteforge`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "siteforge",
    version,
    about = "Orchestrate static-site builds from a module registry.",
    long_about = None
)]
pub struct CliArgs {
    /// Stage to run. Defaults to `dev`.
    #[command(subcommand)]
    pub stage: Option<StageCommand>,

    /// Path to the config file (TOML).
    ///
    /// Default: `Siteforge.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Siteforge.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SITEFORGE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve the registry and print the pipeline, but run nothing.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    pub fn stage(&self) -> Stage {
        self.stage.unwrap_or(StageCommand::Dev).into()
    }
}

/// Stage subcommands, one per pipeline variant.
#[derive(Debug, Copy, Clone, Subcommand)]
pub enum StageCommand {
    /// Clean, compile, then serve and watch until interrupted.
    Dev,
    /// Full production build, including post-processing steps.
    Build,
    /// Production build that skips slow optimizations.
    BuildFast,
    /// Build variant for preview deployments.
    Preview,
}

impl From<StageCommand> for Stage {
    fn from(cmd: StageCommand) -> Self {
        match cmd {
            StageCommand::Dev => Stage::Dev,
            StageCommand::Build => Stage::Build,
            StageCommand::BuildFast => Stage::BuildFast,
            StageCommand::Preview => Stage::Preview,
        }
    }
}

/// Log level as exposed on the CLI and the `SITEFORGE_LOG` env var.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_tracing(self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("invalid log level: {other}")),
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
