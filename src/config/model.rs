// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration as read from `Siteforge.toml`.
///
/// ```toml
/// [project.server]
/// port = 3000
/// cmd = "npx serve dist"
///
/// [project.watch]
/// debounce_ms = 150
///
/// [features]
/// svg_sprite = { enabled = true }
///
/// [engines]
/// templates = "eleventy --input src/pages --output dist"
/// styles = "sass src/styles/main.scss dist/styles/main.css"
/// ```
///
/// All sections are optional and have defaults. Unknown keys are rejected
/// everywhere: feature flags and engine bindings are a closed schema,
/// validated once at load time rather than probed at each use site.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawSiteConfig {
    #[serde(default)]
    pub project: ProjectSection,

    #[serde(default)]
    pub paths: PathsSection,

    #[serde(default)]
    pub features: FeaturesSection,

    #[serde(default)]
    pub engines: EnginesSection,

    #[serde(default)]
    pub site: SiteSection,
}

/// Validated configuration. Construct via `TryFrom<RawSiteConfig>`
/// (see `config::validate`); immutable for the lifetime of a pipeline run.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub project: ProjectSection,
    pub paths: PathsSection,
    pub features: FeaturesSection,
    pub engines: EnginesSection,
    pub site: SiteSection,
}

impl SiteConfig {
    /// Internal constructor used after validation has passed.
    pub(crate) fn new_unchecked(raw: RawSiteConfig) -> Self {
        Self {
            project: raw.project,
            paths: raw.paths,
            features: raw.features,
            engines: raw.engines,
            site: raw.site,
        }
    }
}

/// `[project]` section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectSection {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub watch: WatchSection,
}

/// `[project.server]` — dev server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Port handed to the server command via `$PORT`.
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Command line for the dev server. When absent, siteforge does not
    /// serve anything; the watch session still rebuilds.
    ///
    /// Pick a server that live-reloads off its serve directory (e.g.
    /// `browser-sync start --server dist --watch`): siteforge rebuilds
    /// into the output tree and logs reload requests, but sends no reload
    /// signal to the child.
    #[serde(default)]
    pub cmd: Option<String>,
}

fn default_server_port() -> u16 {
    3000
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            cmd: None,
        }
    }
}

/// `[project.watch]` — dev watch behaviour.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    /// One rebuild per burst of changes: an IDE save can touch several
    /// files at once.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Skip a watch trigger when the aggregated content of the rule's
    /// watched files is unchanged (blake3).
    #[serde(default)]
    pub content_hash: bool,
}

fn default_debounce_ms() -> u64 {
    150
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            content_hash: false,
        }
    }
}

/// `[paths]` section. Source layout and output directories.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsSection {
    #[serde(default = "default_src")]
    pub src: PathBuf,

    /// Dev output tree.
    #[serde(default = "default_dist")]
    pub dist: PathBuf,

    /// Production output tree (build / buildFast / preview).
    #[serde(default = "default_public")]
    pub public: PathBuf,
}

fn default_src() -> PathBuf {
    PathBuf::from("src")
}
fn default_dist() -> PathBuf {
    PathBuf::from("dist")
}
fn default_public() -> PathBuf {
    PathBuf::from("public")
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            src: default_src(),
            dist: default_dist(),
            public: default_public(),
        }
    }
}

impl PathsSection {
    fn src_glob(&self, sub: &str) -> String {
        format!("{}/{}", self.src.display(), sub)
    }

    pub fn pages_watch(&self) -> Vec<String> {
        vec![self.src_glob("pages/**/*"), self.src_glob("shared/**/*")]
    }

    pub fn styles_watch(&self) -> Vec<String> {
        vec![self.src_glob("styles/**/*.{scss,css}")]
    }

    pub fn scripts_watch(&self) -> Vec<String> {
        vec![self.src_glob("scripts/**/*.{js,ts,jsx,tsx}")]
    }

    pub fn fonts_watch(&self) -> Vec<String> {
        vec![self.src_glob("fonts/**/*")]
    }

    pub fn images_watch(&self) -> Vec<String> {
        vec![self.src_glob("assets/images/**/*")]
    }

    pub fn svg_watch(&self) -> Vec<String> {
        vec![self.src_glob("assets/svg/**/*.svg")]
    }

    pub fn icons_watch(&self) -> Vec<String> {
        vec![self.src_glob("assets/icons/**/*.svg")]
    }

    pub fn favicons_watch(&self) -> Vec<String> {
        vec![self.src_glob("assets/favicons/**/*")]
    }

    pub fn static_watch(&self) -> Vec<String> {
        vec![self.src_glob("static/**/*")]
    }

    pub fn video_watch(&self) -> Vec<String> {
        vec![self.src_glob("assets/video/**/*")]
    }

    pub fn audio_watch(&self) -> Vec<String> {
        vec![self.src_glob("assets/audio/**/*")]
    }

    pub fn locales_watch(&self) -> Vec<String> {
        vec![self.src_glob("data/locales/**/*.json")]
    }
}

/// `[features]` section: the closed set of optional modules.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeaturesSection {
    #[serde(default)]
    pub svg_sprite: FeatureToggle,

    #[serde(default = "FeatureToggle::on")]
    pub favicons: FeatureToggle,

    #[serde(default = "FeatureToggle::on")]
    pub static_files: FeatureToggle,

    #[serde(default)]
    pub media: MediaFeatures,

    #[serde(default)]
    pub i18n: FeatureToggle,

    #[serde(default = "FeatureToggle::on")]
    pub seo: FeatureToggle,

    #[serde(default = "FeatureToggle::on")]
    pub versioning: FeatureToggle,
}

impl Default for FeaturesSection {
    fn default() -> Self {
        Self {
            svg_sprite: FeatureToggle::default(),
            favicons: FeatureToggle::on(),
            static_files: FeatureToggle::on(),
            media: MediaFeatures::default(),
            i18n: FeatureToggle::default(),
            seo: FeatureToggle::on(),
            versioning: FeatureToggle::on(),
        }
    }
}

/// `[features.media]` sub-section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct MediaFeatures {
    #[serde(default)]
    pub video: FeatureToggle,

    #[serde(default)]
    pub audio: FeatureToggle,
}

/// A single feature switch, e.g. `favicons = { enabled = true }`.
#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FeatureToggle {
    #[serde(default)]
    pub enabled: bool,
}

impl FeatureToggle {
    fn on() -> Self {
        Self { enabled: true }
    }
}

/// `[engines]` section: external command lines per module.
///
/// A module with no bound engine falls back to a pass-through copy of its
/// source directory (see `registry::catalogue`). Versioning and seo are
/// post-compile steps: leaving them unbound removes the step entirely.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct EnginesSection {
    #[serde(default)]
    pub templates: Option<String>,
    #[serde(default)]
    pub styles: Option<String>,
    #[serde(default)]
    pub scripts: Option<String>,
    #[serde(default)]
    pub images: Option<String>,
    #[serde(default)]
    pub svg: Option<String>,
    #[serde(default)]
    pub svg_sprite: Option<String>,
    #[serde(default)]
    pub favicons: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub audio: Option<String>,
    #[serde(default)]
    pub versioning: Option<String>,
    #[serde(default)]
    pub seo: Option<String>,
}

/// `[site]` section: publication environment.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SiteSection {
    /// Absolute site URL, needed by sitemap/hreflang tooling.
    /// Normalized at load time: no trailing slash.
    #[serde(default)]
    pub url: String,

    /// `/repo-name` for subdirectory hosting, `""` for domain root.
    /// Normalized at load time: leading slash, no trailing slash.
    #[serde(default)]
    pub base_path: String,
}
