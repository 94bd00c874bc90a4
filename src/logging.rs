// src/logging.rs

//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Level resolution: `--log-level` flag, then the `SITEFORGE_LOG` env var,
//! then `info`. Logs go to stderr so stdout stays usable for module task
//! output (external compilers, dev servers, etc).

use anyhow::Result;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Initialise the global logging subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let level = cli_level
        .or_else(|| {
            std::env::var("SITEFORGE_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
        })
        .map(LogLevel::as_tracing)
        .unwrap_or(tracing::Level::INFO);

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
