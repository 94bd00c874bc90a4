use std::io::Write as _;

use siteforge::config::{load_and_validate, load_or_default};
use siteforge::errors::SiteforgeError;
use siteforge_test_utils::init_tracing;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

#[test]
fn empty_file_yields_full_defaults() {
    init_tracing();
    let file = write_config("");
    let config = load_and_validate(file.path()).unwrap();

    assert_eq!(config.project.server.port, 3000);
    assert_eq!(config.project.watch.debounce_ms, 150);
    assert!(!config.project.watch.content_hash);
    assert_eq!(config.paths.src, std::path::Path::new("src"));
    assert_eq!(config.paths.dist, std::path::Path::new("dist"));
    assert_eq!(config.paths.public, std::path::Path::new("public"));
    // Default feature posture: core extras on, heavyweight ones off.
    assert!(config.features.favicons.enabled);
    assert!(config.features.static_files.enabled);
    assert!(config.features.seo.enabled);
    assert!(config.features.versioning.enabled);
    assert!(!config.features.svg_sprite.enabled);
    assert!(!config.features.media.video.enabled);
    assert!(!config.features.i18n.enabled);
}

#[test]
fn missing_file_yields_defaults() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let config = load_or_default(dir.path().join("Siteforge.toml")).unwrap();
    assert_eq!(config.project.server.port, 3000);
}

#[test]
fn sections_override_defaults() {
    init_tracing();
    let file = write_config(
        r#"
[project.server]
port = 8080
cmd = "npx serve dist"

[project.watch]
debounce_ms = 300
content_hash = true

[features]
svg_sprite = { enabled = true }
favicons = { enabled = false }

[engines]
styles = "sass src/styles/main.scss dist/styles/main.css"
"#,
    );
    let config = load_and_validate(file.path()).unwrap();

    assert_eq!(config.project.server.port, 8080);
    assert_eq!(config.project.server.cmd.as_deref(), Some("npx serve dist"));
    assert_eq!(config.project.watch.debounce_ms, 300);
    assert!(config.project.watch.content_hash);
    assert!(config.features.svg_sprite.enabled);
    assert!(!config.features.favicons.enabled);
    assert!(config.engines.styles.as_deref().unwrap().starts_with("sass "));
}

#[test]
fn unknown_feature_key_is_rejected() {
    init_tracing();
    // The feature set is a closed schema; typos must fail loudly at load
    // time, not silently configure nothing.
    let file = write_config("[features]\nsvg_spritee = { enabled = true }\n");
    let err = load_and_validate(file.path()).unwrap_err();
    assert!(matches!(err, SiteforgeError::TomlError(_)), "{err}");
}

#[test]
fn unknown_top_level_section_is_rejected() {
    init_tracing();
    let file = write_config("[featuress]\n");
    assert!(load_and_validate(file.path()).is_err());
}

#[test]
fn zero_debounce_is_rejected() {
    init_tracing();
    let file = write_config("[project.watch]\ndebounce_ms = 0\n");
    let err = load_and_validate(file.path()).unwrap_err();
    let SiteforgeError::ConfigError(msg) = err else {
        panic!("expected config error, got: {err}");
    };
    assert!(msg.contains("debounce_ms"), "{msg}");
}

#[test]
fn zero_port_is_rejected() {
    init_tracing();
    let file = write_config("[project.server]\nport = 0\n");
    assert!(load_and_validate(file.path()).is_err());
}

#[test]
fn dist_and_public_must_differ() {
    init_tracing();
    let file = write_config("[paths]\ndist = \"out\"\npublic = \"out\"\n");
    assert!(load_and_validate(file.path()).is_err());
}

#[test]
fn empty_engine_command_is_rejected() {
    init_tracing();
    let file = write_config("[engines]\nstyles = \"  \"\n");
    assert!(load_and_validate(file.path()).is_err());
}

#[test]
fn site_url_and_base_path_are_normalized() {
    init_tracing();
    let file = write_config("[site]\nurl = \"https://example.com/\"\nbase_path = \"repo/\"\n");
    let config = load_and_validate(file.path()).unwrap();
    assert_eq!(config.site.url, "https://example.com");
    assert_eq!(config.site.base_path, "/repo");
}

#[test]
fn builder_configs_go_through_the_same_normalization() {
    init_tracing();
    // The test builder funnels through the raw→validated conversion, so
    // programmatic configs get the exact same site normalization as TOML.
    let config = siteforge_test_utils::builders::SiteConfigBuilder::new()
        .with_site("https://example.com/", "repo/")
        .build();
    assert_eq!(config.site.url, "https://example.com");
    assert_eq!(config.site.base_path, "/repo");
}

#[test]
fn root_base_path_normalizes_to_empty() {
    init_tracing();
    let file = write_config("[site]\nbase_path = \"/\"\n");
    let config = load_and_validate(file.path()).unwrap();
    assert_eq!(config.site.base_path, "");
}
