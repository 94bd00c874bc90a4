use siteforge::dag::compile_layers;
use siteforge::registry::built_in_registry;
use siteforge::types::Stage;
use siteforge_test_utils::builders::{ctx_for, ctx_with, SiteConfigBuilder};
use siteforge_test_utils::init_tracing;

#[test]
fn default_features_select_the_core_module_set() {
    init_tracing();
    let ctx = ctx_for(Stage::Build);
    let reg = built_in_registry(&ctx).unwrap();

    let ids: Vec<String> = reg
        .enabled_modules(&ctx)
        .iter()
        .map(|m| m.id.clone())
        .collect();
    assert_eq!(
        ids,
        vec![
            "templates",
            "styles",
            "scripts",
            "fonts",
            "images",
            "svg",
            "favicons",
            "static"
        ]
    );
}

#[test]
fn enabling_features_adds_their_modules() {
    init_tracing();
    let config = SiteConfigBuilder::new()
        .with_feature("svg_sprite", true)
        .with_feature("media.video", true)
        .with_feature("i18n", true)
        .build();
    let ctx = ctx_with(Stage::Build, config);
    let reg = built_in_registry(&ctx).unwrap();

    let ids: Vec<String> = reg
        .enabled_modules(&ctx)
        .iter()
        .map(|m| m.id.clone())
        .collect();
    assert!(ids.contains(&"svgSprite".to_string()));
    assert!(ids.contains(&"media.video".to_string()));
    assert!(ids.contains(&"i18n.locales".to_string()));
}

#[test]
fn svg_sprite_layers_after_svg() {
    init_tracing();
    let config = SiteConfigBuilder::new().with_feature("svg_sprite", true).build();
    let ctx = ctx_with(Stage::Build, config);
    let reg = built_in_registry(&ctx).unwrap();

    let layers = compile_layers(&reg, &ctx).unwrap();
    let layer_of = |id: &str| {
        layers
            .iter()
            .position(|l| l.iter().any(|t| t.id == id))
            .unwrap_or_else(|| panic!("{id} not layered"))
    };
    assert!(layer_of("svg") < layer_of("svgSprite"));
}

#[test]
fn locales_module_contributes_a_watch_rule_but_no_compile_task() {
    init_tracing();
    let config = SiteConfigBuilder::new().with_feature("i18n", true).build();
    let ctx = ctx_with(Stage::Dev, config);
    let reg = built_in_registry(&ctx).unwrap();

    let layers = compile_layers(&reg, &ctx).unwrap();
    assert!(layers
        .iter()
        .all(|l| l.iter().all(|t| t.id != "i18n.locales")));

    let rules = reg.enabled_watch_rules(&ctx).unwrap();
    assert!(rules.iter().any(|r| r.key == "locales"));
}

#[test]
fn disabled_feature_contributes_no_watch_rule() {
    init_tracing();
    let config = SiteConfigBuilder::new().with_feature("favicons", false).build();
    let ctx = ctx_with(Stage::Dev, config);
    let reg = built_in_registry(&ctx).unwrap();

    let rules = reg.enabled_watch_rules(&ctx).unwrap();
    assert!(rules.iter().all(|r| r.key != "favicons"));
}

#[test]
fn every_enabled_watch_rule_has_globs() {
    init_tracing();
    // All features on: the full rule set must pass watch validation with
    // non-empty globs.
    let config = SiteConfigBuilder::new()
        .with_feature("svg_sprite", true)
        .with_feature("media.video", true)
        .with_feature("media.audio", true)
        .with_feature("i18n", true)
        .build();
    let ctx = ctx_with(Stage::Dev, config);
    let reg = built_in_registry(&ctx).unwrap();

    let rules = reg.enabled_watch_rules(&ctx).unwrap();
    assert!(rules.len() >= 11);
    for rule in &rules {
        assert!(!rule.globs.is_empty(), "rule {} has no globs", rule.key);
    }
}
