// tests/lookup_and_idempotence.rs

mod common;

use std::sync::Arc;

use common::*;
use dashgraph::errors::{LoadError, ResourceKind};

#[test]
fn unknown_name_falls_back_to_main() {
    let h = Harness::new(
        ConfigTreeBuilder::new()
            .dashboard("main", MAIN)
            .dashboard("media", MEDIA),
    );
    h.orchestrator.build();

    let main = h.orchestrator.get_dashboard_by_name("main");
    let fallback = h.orchestrator.get_dashboard_by_name("nonexistent");
    assert!(Arc::ptr_eq(&main, &fallback));
    assert_eq!(main.title(), Some("Home"));
    assert_eq!(main.cards().len(), 2);

    let media = h.orchestrator.get_dashboard_by_name("media");
    assert_eq!(media.name(), "media");
}

#[test]
fn missing_main_dashboard_yields_placeholder() {
    let h = Harness::new(ConfigTreeBuilder::new().dashboard("media", MEDIA));
    let generation = h.orchestrator.build().generation().cloned().unwrap();

    let main = generation.get_dashboard_by_name("anything");
    assert_eq!(main.name(), "main");
    assert!(main.cards().is_empty());
    assert_eq!(
        main.error(),
        Some(&LoadError::missing(ResourceKind::Dashboard, "main"))
    );
    assert!(!generation.contains_dashboard("main"));
}

#[test]
fn lookup_before_first_build_is_served() {
    let h = Harness::new(ConfigTreeBuilder::new());
    let main = h.orchestrator.get_dashboard_by_name("main");
    assert_eq!(main.name(), "main");
    assert_eq!(h.orchestrator.current().id(), 0);
}

#[test]
fn rebuilding_unchanged_sources_is_idempotent() {
    let h = Harness::new(
        ConfigTreeBuilder::new()
            .shared_cards("[[card]]\nname = \"bookmarks\"\ntype = \"links\"\n")
            .dashboard("main", MAIN)
            .dashboard("media", "[[card]]\nshared = \"bookmarks\"\n"),
    );

    let first = h.orchestrator.build().generation().cloned().unwrap();
    let second = h.orchestrator.build().generation().cloned().unwrap();

    assert!(second.id() > first.id());
    assert_eq!(dashboard_names(&first), dashboard_names(&second));
    for (a, b) in first.dashboards().zip(second.dashboards()) {
        assert_eq!(a.cards(), b.cards());
        assert_eq!(a.error(), b.error());
        assert_eq!(a.source_hash(), b.source_hash());
    }
    assert_eq!(**first.settings(), **second.settings());
    assert_eq!(h.watcher.active_count(h.dashboard_path("main")), 1);
    assert_eq!(h.watcher.active_count(h.dashboard_path("media")), 1);
    assert_eq!(h.watcher.total_subscriptions(), 2);
}

#[test]
fn non_matching_and_hidden_files_are_not_dashboards() {
    let h = Harness::new(ConfigTreeBuilder::new().dashboard("main", MAIN));
    let dir = h.layout.dashboards_dir().to_path_buf();
    h.fs.add_file(dir.join("notes.txt"), "hello");
    h.fs.add_file(dir.join(".draft.toml"), MEDIA);

    let generation = h.orchestrator.build().generation().cloned().unwrap();
    assert_eq!(dashboard_names(&generation), vec!["main"]);
}

#[test]
fn unknown_search_provider_keeps_other_cards() {
    let source = r#"
[[card]]
name = "s"
type = "search"
provider = "Bing"

[[card]]
name = "ok"
"#;
    let h = Harness::new(ConfigTreeBuilder::new().dashboard("main", source));
    let generation = h.orchestrator.build().generation().cloned().unwrap();
    let main = generation.get_dashboard_by_name("main");
    assert_eq!(main.cards().len(), 1);
    assert_eq!(
        main.error(),
        Some(&LoadError::missing(ResourceKind::QueryProvider, "Bing"))
    );
}

#[test]
fn missing_dashboards_dir_serves_only_the_placeholder() {
    let h = Harness::new(ConfigTreeBuilder::new());
    assert!(h.fs.remove(h.layout.dashboards_dir()));

    let generation = h.orchestrator.build().generation().cloned().unwrap();
    assert_eq!(generation.dashboards().count(), 0);
    assert_eq!(
        generation.get_dashboard_by_name("main").error(),
        Some(&LoadError::missing(ResourceKind::Dashboard, "main"))
    );
}
