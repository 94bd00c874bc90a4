// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{RawSiteConfig, SiteConfig};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// `RawSiteConfig`.
///
/// This only performs TOML deserialization; it does **not** perform
/// semantic validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawSiteConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawSiteConfig = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation + normalization.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML (unknown keys anywhere are a hard deserialization error,
///   so the feature/engine schema is closed at this boundary).
/// - Applies defaults (`serde` + `Default` impls).
/// - Checks watch/server/paths/engines sanity and normalizes `[site]`.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<SiteConfig> {
    let raw = load_from_path(&path)?;
    let config = SiteConfig::try_from(raw)?;
    Ok(config)
}

/// A missing config file is not an error: every section has defaults, so a
/// bare source tree still builds.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<SiteConfig> {
    let path = path.as_ref();
    if path.exists() {
        load_and_validate(path)
    } else {
        tracing::debug!(path = ?path, "no config file found; using defaults");
        SiteConfig::try_from(RawSiteConfig::default())
    }
}

/// Default config path: `Siteforge.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Siteforge.toml")
}
