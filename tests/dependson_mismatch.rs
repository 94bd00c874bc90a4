use siteforge::dag::compile_layers;
use siteforge::errors::SiteforgeError;
use siteforge::registry::{ModuleDescriptor, StageTasks};
use siteforge::types::Stage;
use siteforge_test_utils::builders::{ctx_for, module_after, recording_task, registry, run_log, RunLog};
use siteforge_test_utils::init_tracing;

/// Enabled module that only has a task bound for dev.
fn dev_only(log: &RunLog, id: &str, order: i64) -> ModuleDescriptor {
    ModuleDescriptor::new(id).order(order).tasks(StageTasks {
        dev: Some(recording_task(log, id)),
        build: None,
        preview: None,
    })
}

#[test]
fn dev_warns_and_drops_the_edge() {
    init_tracing();
    // "styles" depends on "tokens", which has no build binding — in dev
    // both are runnable, but here we simulate the inverse: tokens is
    // build-only, so in dev the edge is dropped and styles still layers.
    let log = run_log();
    let tokens = ModuleDescriptor::new("tokens").order(1).tasks(StageTasks {
        dev: None,
        build: Some(recording_task(&log, "tokens")),
        preview: None,
    });
    let reg = registry(vec![tokens, module_after(&log, "styles", 2, &["tokens"])]);
    let ctx = ctx_for(Stage::Dev);

    let layers = compile_layers(&reg, &ctx).unwrap();
    let ids: Vec<Vec<&str>> = layers
        .iter()
        .map(|l| l.iter().map(|t| t.id.as_str()).collect())
        .collect();
    assert_eq!(ids, vec![vec!["styles"]]);
}

#[test]
fn build_fails_and_names_module_dep_and_stage() {
    init_tracing();
    let log = run_log();
    let reg = registry(vec![
        dev_only(&log, "tokens", 1),
        module_after(&log, "styles", 2, &["tokens"]),
    ]);
    let ctx = ctx_for(Stage::Build);

    let err = compile_layers(&reg, &ctx).unwrap_err();
    let SiteforgeError::DependsOnMismatch { module, dep, stage } = err else {
        panic!("expected a dependsOn mismatch, got: {err}");
    };
    assert_eq!(module, "styles");
    assert_eq!(dep, "tokens");
    assert_eq!(stage, Stage::Build);
}

#[test]
fn mismatch_message_is_actionable() {
    init_tracing();
    let err = SiteforgeError::DependsOnMismatch {
        module: "styles".to_string(),
        dep: "tokens".to_string(),
        stage: Stage::BuildFast,
    };
    let msg = err.to_string();
    assert!(msg.contains("\"styles\""), "message: {msg}");
    assert!(msg.contains("\"tokens\""), "message: {msg}");
    assert!(msg.contains("buildFast"), "message: {msg}");
    assert!(msg.contains("remove/adjust dependsOn"), "message: {msg}");
}

#[test]
fn fully_disabled_dependency_is_not_a_mismatch() {
    init_tracing();
    // Disabled modules are invisible: dependents build without complaint
    // in every stage, dev and build alike.
    let log = run_log();
    let modules = |log: &RunLog| {
        vec![
            dev_only(log, "tokens", 1).enabled_when(|_| false),
            module_after(log, "styles", 2, &["tokens"]),
        ]
    };

    for stage in [Stage::Dev, Stage::Build, Stage::Preview] {
        let reg = registry(modules(&log));
        let ctx = ctx_for(stage);
        let layers = compile_layers(&reg, &ctx).unwrap();
        assert_eq!(layers.len(), 1, "stage {stage}");
        assert_eq!(layers[0][0].id, "styles");
    }
}

#[test]
fn build_fast_uses_the_build_binding() {
    init_tracing();
    // buildFast resolves module tasks through the build key, so a
    // build-bound module is runnable and no mismatch occurs.
    let log = run_log();
    let tokens = ModuleDescriptor::new("tokens").order(1).tasks(StageTasks {
        dev: None,
        build: Some(recording_task(&log, "tokens")),
        preview: None,
    });
    let reg = registry(vec![tokens, module_after(&log, "styles", 2, &["tokens"])]);
    let ctx = ctx_for(Stage::BuildFast);

    let layers = compile_layers(&reg, &ctx).unwrap();
    let ids: Vec<Vec<&str>> = layers
        .iter()
        .map(|l| l.iter().map(|t| t.id.as_str()).collect())
        .collect();
    assert_eq!(ids, vec![vec!["tokens"], vec!["styles"]]);
}
