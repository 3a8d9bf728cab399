// tests/themes.rs

mod common;

use common::*;
use dashgraph::errors::{LoadError, ResourceKind};
use dashgraph_test_utils::fake_compiler::FakeThemeCompiler;

#[test]
fn build_installs_the_configured_theme() {
    let h = Harness::new(
        ConfigTreeBuilder::new()
            .settings("[settings]\ntheme = \"ocean\"\n")
            .system_theme("ocean", "body {}")
            .custom_theme("ocean", "body { color: blue; }")
            .dashboard("main", MAIN),
    );
    let generation = h.orchestrator.build().generation().cloned().unwrap();
    assert!(generation.theme_error().is_none());

    let source = h.layout.custom_themes_dir().join("ocean.scss");
    assert_eq!(h.compiler.compiled(), vec![source.clone()]);
    assert_eq!(
        read(&h.fs, h.layout.stylesheet()),
        FakeThemeCompiler::output_for(&source)
    );
}

#[test]
fn failed_compile_keeps_previous_stylesheet() {
    let h = Harness::new(ConfigTreeBuilder::new().dashboard("main", MAIN));
    h.orchestrator.build();
    let before = read(&h.fs, h.layout.stylesheet());

    h.compiler.set_failure(Some("unbalanced braces"));
    let generation = h.orchestrator.build().generation().cloned().unwrap();

    assert!(matches!(
        generation.theme_error(),
        Some(LoadError::Compile { theme, .. }) if theme == "dark"
    ));
    assert_eq!(read(&h.fs, h.layout.stylesheet()), before);
    // Theme failures are not stamped onto dashboards.
    assert!(generation.get_dashboard_by_name("main").error().is_none());
}

#[test]
fn change_theme_switches_without_rebuilding() {
    let h = Harness::new(
        ConfigTreeBuilder::new()
            .system_theme("light", "body { color: #111; }")
            .dashboard("main", MAIN),
    );
    let built = h.orchestrator.build().generation().cloned().unwrap();

    h.orchestrator.change_theme("light").unwrap();
    let current = h.orchestrator.current();
    assert_eq!(current.id(), built.id());
    assert_eq!(current.settings().theme(), "light");
    assert!(current.theme_error().is_none());
    assert_eq!(
        read(&h.fs, h.layout.stylesheet()),
        FakeThemeCompiler::output_for(&h.layout.system_themes_dir().join("light.scss"))
    );
}

#[test]
fn change_to_unknown_theme_reports_missing_resource() {
    let h = Harness::new(ConfigTreeBuilder::new().dashboard("main", MAIN));
    h.orchestrator.build();
    let before = read(&h.fs, h.layout.stylesheet());

    let err = h.orchestrator.change_theme("neon").unwrap_err();
    assert_eq!(err, LoadError::missing(ResourceKind::Theme, "neon"));
    assert_eq!(h.orchestrator.current().theme_error(), Some(&err));
    assert_eq!(read(&h.fs, h.layout.stylesheet()), before);
}

#[test]
fn change_theme_refuses_paths_outside_theme_dirs() {
    let h = Harness::new(ConfigTreeBuilder::new().dashboard("main", MAIN));
    // Stored under the unnormalised path the lookup would otherwise build.
    let escape = h.layout.custom_themes_dir().join("../escape.scss");
    h.fs.add_file(&escape, "body { color: red; }");
    h.orchestrator.build();
    let before = read(&h.fs, h.layout.stylesheet());

    let err = h.orchestrator.change_theme("../escape").unwrap_err();
    assert_eq!(err, LoadError::missing(ResourceKind::Theme, "../escape"));
    assert_eq!(read(&h.fs, h.layout.stylesheet()), before);
    assert_eq!(h.compiler.compiled().len(), 1);
}
