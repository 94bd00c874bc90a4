// src/config/validate.rs

use crate::config::model::{RawSiteConfig, SiteConfig};
use crate::errors::{Result, SiteforgeError};

impl TryFrom<RawSiteConfig> for SiteConfig {
    type Error = SiteforgeError;

    fn try_from(mut raw: RawSiteConfig) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        normalize_site(&mut raw);
        Ok(SiteConfig::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawSiteConfig) -> Result<()> {
    validate_watch(cfg)?;
    validate_server(cfg)?;
    validate_paths(cfg)?;
    validate_engines(cfg)?;
    Ok(())
}

fn validate_watch(cfg: &RawSiteConfig) -> Result<()> {
    if cfg.project.watch.debounce_ms == 0 {
        return Err(SiteforgeError::ConfigError(
            "[project.watch].debounce_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_server(cfg: &RawSiteConfig) -> Result<()> {
    if cfg.project.server.port == 0 {
        return Err(SiteforgeError::ConfigError(
            "[project.server].port must be non-zero".to_string(),
        ));
    }
    Ok(())
}

fn validate_paths(cfg: &RawSiteConfig) -> Result<()> {
    for (name, path) in [
        ("src", &cfg.paths.src),
        ("dist", &cfg.paths.dist),
        ("public", &cfg.paths.public),
    ] {
        if path.as_os_str().is_empty() {
            return Err(SiteforgeError::ConfigError(format!(
                "[paths].{name} must not be empty"
            )));
        }
    }

    if cfg.paths.dist == cfg.paths.public {
        return Err(SiteforgeError::ConfigError(
            "[paths].dist and [paths].public must differ (clean deletes both)".to_string(),
        ));
    }

    Ok(())
}

fn validate_engines(cfg: &RawSiteConfig) -> Result<()> {
    let bindings = [
        ("templates", &cfg.engines.templates),
        ("styles", &cfg.engines.styles),
        ("scripts", &cfg.engines.scripts),
        ("images", &cfg.engines.images),
        ("svg", &cfg.engines.svg),
        ("svg_sprite", &cfg.engines.svg_sprite),
        ("favicons", &cfg.engines.favicons),
        ("video", &cfg.engines.video),
        ("audio", &cfg.engines.audio),
        ("versioning", &cfg.engines.versioning),
        ("seo", &cfg.engines.seo),
    ];

    for (name, cmd) in bindings {
        if let Some(cmd) = cmd {
            if cmd.trim().is_empty() {
                return Err(SiteforgeError::ConfigError(format!(
                    "[engines].{name} must not be an empty command"
                )));
            }
        }
    }

    Ok(())
}

/// Normalize `[site]` values the way publication tooling expects them:
/// `url` without a trailing slash, `base_path` with a leading slash and no
/// trailing slash, `/` collapsing to `""`.
fn normalize_site(raw: &mut RawSiteConfig) {
    let url = raw.site.url.trim().trim_end_matches('/').to_string();
    raw.site.url = url;

    let mut bp = raw.site.base_path.trim().to_string();
    if bp == "/" {
        bp.clear();
    }
    if !bp.is_empty() && !bp.starts_with('/') {
        bp.insert(0, '/');
    }
    while bp.ends_with('/') {
        bp.pop();
    }
    raw.site.base_path = bp;
}
