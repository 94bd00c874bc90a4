// src/config/mod.rs

//! Configuration loading and validation.
//!
//! - [`model`] maps `Siteforge.toml` onto a closed serde schema.
//! - [`validate`] turns the raw structs into a validated [`SiteConfig`].
//! - [`loader`] is the file-reading entry point.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_or_default};
pub use model::{
    EnginesSection, FeatureToggle, FeaturesSection, MediaFeatures, PathsSection, ProjectSection,
    RawSiteConfig, ServerSection, SiteConfig, SiteSection, WatchSection,
};
