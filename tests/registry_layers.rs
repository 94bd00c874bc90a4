use siteforge::dag::compile_layers;
use siteforge::types::Stage;
use siteforge_test_utils::builders::{ctx_for, module, module_after, registry, run_log};
use siteforge_test_utils::init_tracing;

fn layer_ids(layers: &[Vec<siteforge::registry::NamedTask>]) -> Vec<Vec<String>> {
    layers
        .iter()
        .map(|layer| layer.iter().map(|t| t.id.clone()).collect())
        .collect()
}

#[test]
fn independent_modules_share_one_layer() {
    init_tracing();
    // templates and styles have no dependency relation; both land in the
    // first layer, ordered by (order, id).
    let log = run_log();
    let reg = registry(vec![
        module(&log, "styles", 20),
        module(&log, "templates", 10),
    ]);
    let ctx = ctx_for(Stage::Build);

    let layers = compile_layers(&reg, &ctx).unwrap();
    assert_eq!(layer_ids(&layers), vec![vec!["templates", "styles"]]);
}

#[test]
fn dependency_lands_in_earlier_layer() {
    init_tracing();
    let log = run_log();
    let reg = registry(vec![
        module(&log, "svg", 60),
        module_after(&log, "svgSprite", 70, &["svg"]),
        module(&log, "templates", 10),
    ]);
    let ctx = ctx_for(Stage::Build);

    let layers = compile_layers(&reg, &ctx).unwrap();
    assert_eq!(
        layer_ids(&layers),
        vec![vec!["templates", "svg"], vec!["svgSprite"]]
    );
}

#[test]
fn order_breaks_ties_before_id() {
    init_tracing();
    // zeta has a lower order than alpha, so it comes first despite its id.
    let log = run_log();
    let reg = registry(vec![module(&log, "alpha", 50), module(&log, "zeta", 10)]);
    let ctx = ctx_for(Stage::Build);

    let layers = compile_layers(&reg, &ctx).unwrap();
    assert_eq!(layer_ids(&layers), vec![vec!["zeta", "alpha"]]);
}

#[test]
fn equal_order_falls_back_to_id() {
    init_tracing();
    let log = run_log();
    let reg = registry(vec![module(&log, "b", 10), module(&log, "a", 10)]);
    let ctx = ctx_for(Stage::Build);

    let layers = compile_layers(&reg, &ctx).unwrap();
    assert_eq!(layer_ids(&layers), vec![vec!["a", "b"]]);
}

#[test]
fn disabled_module_is_invisible() {
    init_tracing();
    // A disabled module contributes no task, and dependencies on it vanish
    // silently: dependents run in the first layer as if the edge never
    // existed.
    let log = run_log();
    let reg = registry(vec![
        module(&log, "svg", 60).enabled_when(|_| false),
        module_after(&log, "svgSprite", 70, &["svg"]),
    ]);
    let ctx = ctx_for(Stage::Build);

    let layers = compile_layers(&reg, &ctx).unwrap();
    assert_eq!(layer_ids(&layers), vec![vec!["svgSprite"]]);
}

#[test]
fn disabled_module_has_no_run_task() {
    init_tracing();
    let log = run_log();
    let reg = registry(vec![
        module(&log, "templates", 10),
        module(&log, "svgSprite", 70).enabled_when(|_| false),
    ]);
    let ctx = ctx_for(Stage::Dev);

    let ids: Vec<String> = reg
        .enabled_run_tasks(&ctx)
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec!["templates"]);
}

#[test]
fn layering_is_deterministic() {
    init_tracing();
    let log = run_log();
    let modules = || {
        vec![
            module(&log, "styles", 20),
            module(&log, "templates", 10),
            module_after(&log, "scripts", 30, &["templates"]),
            module_after(&log, "svgSprite", 70, &["svg"]),
            module(&log, "svg", 60),
        ]
    };
    let ctx = ctx_for(Stage::Build);

    let first = layer_ids(&compile_layers(&registry(modules()), &ctx).unwrap());
    for _ in 0..10 {
        let again = layer_ids(&compile_layers(&registry(modules()), &ctx).unwrap());
        assert_eq!(first, again);
    }
}

#[test]
fn every_dependency_is_in_a_strictly_earlier_layer() {
    init_tracing();
    let log = run_log();
    let reg = registry(vec![
        module(&log, "a", 1),
        module_after(&log, "b", 2, &["a"]),
        module_after(&log, "c", 3, &["a", "b"]),
        module_after(&log, "d", 4, &["a"]),
    ]);
    let ctx = ctx_for(Stage::Build);

    let layers = layer_ids(&compile_layers(&reg, &ctx).unwrap());
    assert_eq!(
        layers,
        vec![
            vec!["a".to_string()],
            vec!["b".to_string(), "d".to_string()],
            vec!["c".to_string()]
        ]
    );
}
