// tests/dashboard_watches.rs

mod common;

use common::*;
use dashgraph::DashboardReload;
use dashgraph::engine::ReloadRequest;
use dashgraph::watch::EventFilter;

#[test]
fn renamed_dashboard_moves_its_watch() {
    init_tracing();
    let mut h = Harness::new(
        ConfigTreeBuilder::new()
            .dashboard("main", MAIN)
            .dashboard("media", MEDIA),
    );
    h.orchestrator.build();
    let old = h.dashboard_path("media");
    let new = h.dashboard_path("media2");
    assert_eq!(h.orchestrator.watched_dashboards(), vec!["main", "media"]);

    h.fs.rename(&old, &new).unwrap();
    let generation = h.orchestrator.build().generation().cloned().unwrap();

    assert_eq!(dashboard_names(&generation), vec!["main", "media2"]);
    assert_eq!(h.orchestrator.watched_dashboards(), vec!["main", "media2"]);

    // The cancelled subscription never fires again.
    assert_eq!(h.watcher.fire(&old), 0);
    assert!(h.drain_requests().is_empty());

    assert_eq!(h.watcher.fire(&new), 1);
    assert_eq!(
        h.drain_requests(),
        vec![ReloadRequest::Dashboard("media2".into())]
    );
}

#[test]
fn deleted_dashboard_loses_its_watch() {
    let h = Harness::new(
        ConfigTreeBuilder::new()
            .dashboard("main", MAIN)
            .dashboard("media", MEDIA),
    );
    h.orchestrator.build();
    h.fs.remove(h.dashboard_path("media"));
    h.orchestrator.build();

    assert_eq!(h.watcher.active_paths(), vec![h.dashboard_path("main")]);
    assert_eq!(
        h.watcher.filter_of(h.dashboard_path("main")),
        Some(EventFilter::FileModified)
    );
}

#[test]
fn reload_dashboard_outcomes() {
    let mut h = Harness::new(
        ConfigTreeBuilder::new()
            .dashboard("main", MAIN)
            .dashboard("media", MEDIA),
    );
    let built = h.orchestrator.build().generation().cloned().unwrap();

    assert_eq!(h.orchestrator.reload_dashboard("media"), DashboardReload::Unchanged);

    h.fs.add_file(
        h.dashboard_path("media"),
        "[[card]]\nname = \"plex\"\n\n[[card]]\nname = \"jellyfin\"\n",
    );
    assert_eq!(h.orchestrator.reload_dashboard("media"), DashboardReload::Reloaded);
    let current = h.orchestrator.current();
    assert_eq!(current.id(), built.id());
    assert_eq!(current.get_dashboard_by_name("media").cards().len(), 2);
    // Siblings are shared with the previous snapshot.
    assert!(std::sync::Arc::ptr_eq(
        &current.get_dashboard_by_name("main"),
        &built.get_dashboard_by_name("main")
    ));

    assert_eq!(h.orchestrator.reload_dashboard("ghost"), DashboardReload::Unknown);

    h.fs.remove(h.dashboard_path("media"));
    assert_eq!(h.orchestrator.reload_dashboard("media"), DashboardReload::Escalated);
    assert_eq!(h.drain_requests(), vec![ReloadRequest::Full]);
}

#[test]
fn reloaded_main_is_served_for_unknown_names() {
    let h = Harness::new(ConfigTreeBuilder::new().dashboard("main", MAIN));
    h.orchestrator.build();

    h.fs.add_file(h.dashboard_path("main"), "[[card]]\nname = \"only\"\n");
    assert_eq!(h.orchestrator.reload_dashboard("main"), DashboardReload::Reloaded);

    let fallback = h.orchestrator.get_dashboard_by_name("nonexistent");
    assert_eq!(fallback.cards().len(), 1);
    assert_eq!(fallback.cards()[0].name, "only");
}

#[test]
fn reload_keeps_upstream_error_stamp() {
    let h = Harness::new(
        ConfigTreeBuilder::new()
            .settings("[settings")
            .dashboard("main", MAIN),
    );
    let built = h.orchestrator.build().generation().cloned().unwrap();
    let err = built.settings().error().cloned();

    h.fs.add_file(h.dashboard_path("main"), MEDIA);
    assert_eq!(h.orchestrator.reload_dashboard("main"), DashboardReload::Reloaded);
    assert_eq!(h.orchestrator.get_dashboard_by_name("main").error(), err.as_ref());
}

#[test]
fn source_watches_cover_every_top_level_source() {
    let mut h = Harness::new(ConfigTreeBuilder::new().dashboard("main", MAIN));
    h.orchestrator.build();

    assert_eq!(h.orchestrator.start_watching(), 6);
    let layout = h.layout.clone();
    assert_eq!(
        h.watcher.filter_of(layout.settings_file()),
        Some(EventFilter::FileModified)
    );
    assert_eq!(
        h.watcher.filter_of(layout.users_file()),
        Some(EventFilter::FileModified)
    );
    assert_eq!(
        h.watcher.filter_of(layout.dashboards_dir()),
        Some(EventFilter::EntryAdded)
    );
    assert_eq!(
        h.watcher.filter_of(layout.custom_themes_dir()),
        Some(EventFilter::AnyEvent)
    );

    assert_eq!(h.watcher.fire(layout.data_sources_file()), 1);
    assert_eq!(h.drain_requests(), vec![ReloadRequest::Full]);

    // Restarting replaces rather than duplicates.
    h.orchestrator.start_watching();
    assert_eq!(h.watcher.active_count(layout.settings_file()), 1);

    h.orchestrator.stop_watching();
    assert!(h.watcher.active_paths().is_empty());
    assert_eq!(h.watcher.fire(layout.settings_file()), 0);
}
