// tests/upstream_errors.rs

mod common;

use common::*;
use dashgraph::errors::LoadError;
use dashgraph::model::Origin;
use proptest::prelude::*;

#[test]
fn malformed_settings_are_stamped_onto_every_dashboard() {
    init_tracing();
    let h = Harness::new(
        ConfigTreeBuilder::new()
            .settings("[settings\ntheme = \"dark\"\n")
            .dashboard("main", MAIN)
            .dashboard("media", MEDIA),
    );

    let generation = h.orchestrator.build().generation().cloned().unwrap();

    let settings_err = generation.settings().error().cloned().expect("settings error");
    assert!(matches!(settings_err, LoadError::SourceParse { .. }));
    assert!(!settings_err.to_string().is_empty());
    assert_eq!(generation.settings().origin(), Origin::Fallback);

    assert_eq!(dashboard_names(&generation), vec!["main", "media"]);
    for dboard in generation.dashboards() {
        assert_eq!(dboard.error(), Some(&settings_err), "dashboard {}", dboard.name());
    }
    assert!(generation.data_sources().error().is_none());
}

#[test]
fn missing_settings_file_uses_fallback_with_error() {
    let h = Harness::new(ConfigTreeBuilder::new().dashboard("main", MAIN));
    assert!(h.fs.remove(h.layout.settings_file()));

    let generation = h.orchestrator.build().generation().cloned().unwrap();
    assert!(generation.settings().error().is_some());
    assert_eq!(generation.settings().theme(), "dark");
    assert_eq!(
        generation.get_dashboard_by_name("main").error(),
        generation.settings().error()
    );
}

#[test]
fn malformed_data_sources_leave_settings_untouched() {
    init_tracing();
    let h = Harness::new(
        ConfigTreeBuilder::new()
            .data_sources("[weather]\nlocation = \"Oslo\"\n")
            .dashboard("main", MAIN)
            .dashboard("media", MEDIA),
    );

    let generation = h.orchestrator.build().generation().cloned().unwrap();

    assert!(generation.settings().error().is_none());
    assert_eq!(generation.settings().origin(), Origin::Source);

    let ds_err = generation.data_sources().error().cloned().expect("data source error");
    assert_eq!(generation.data_sources().origin(), Origin::Fallback);
    assert!(generation.data_sources().is_empty());
    for dboard in generation.dashboards() {
        assert_eq!(dboard.error(), Some(&ds_err));
    }
}

#[test]
fn data_source_error_wins_when_both_fail() {
    let h = Harness::new(
        ConfigTreeBuilder::new()
            .settings("not toml at all ===")
            .data_sources("also [broken")
            .dashboard("main", MAIN),
    );

    let generation = h.orchestrator.build().generation().cloned().unwrap();
    let ds_err = generation.data_sources().error().cloned().unwrap();
    assert!(generation.settings().error().is_some());
    assert_eq!(generation.get_dashboard_by_name("main").error(), Some(&ds_err));
    assert_eq!(generation.upstream_error(), Some(&ds_err));
}

#[test]
fn errors_clear_once_sources_are_fixed() {
    let h = Harness::new(
        ConfigTreeBuilder::new()
            .settings("[settings")
            .dashboard("main", MAIN),
    );
    let first = h.orchestrator.build().generation().cloned().unwrap();
    assert!(first.get_dashboard_by_name("main").error().is_some());

    h.fs.add_file(h.layout.settings_file(), VALID_SETTINGS);
    let second = h.orchestrator.build().generation().cloned().unwrap();
    assert!(second.settings().error().is_none());
    assert!(second.get_dashboard_by_name("main").error().is_none());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn any_unterminated_settings_header_is_stamped(tail in "[a-z =\"\n]{0,40}") {
        let h = Harness::new(
            ConfigTreeBuilder::new()
                .settings(&format!("[settings\n{tail}"))
                .dashboard("main", MAIN)
                .dashboard_with_cards("extra", 3),
        );

        let generation = h.orchestrator.build().generation().cloned().unwrap();
        let err = generation.settings().error().cloned();
        prop_assert!(err.is_some());
        for dboard in generation.dashboards() {
            prop_assert_eq!(dboard.error(), err.as_ref());
        }
    }

    #[test]
    fn any_malformed_data_sources_are_stamped(
        tail in "[a-z =\"\n]{0,40}",
        missing_platform in any::<bool>(),
    ) {
        let contents = if missing_platform {
            // Well-formed TOML, but the table lacks `platform`.
            format!("[plex]\nurl = \"{}\"\n", tail.replace(['"', '\n'], ""))
        } else {
            format!("[plex\n{tail}")
        };
        let h = Harness::new(
            ConfigTreeBuilder::new()
                .data_sources(&contents)
                .dashboard("main", MAIN)
                .dashboard_with_cards("extra", 2),
        );

        let generation = h.orchestrator.build().generation().cloned().unwrap();
        let err = generation.data_sources().error().cloned();
        prop_assert!(err.is_some());
        prop_assert!(generation.settings().error().is_none());
        prop_assert!(generation.data_sources().is_empty());
        for dboard in generation.dashboards() {
            prop_assert_eq!(dboard.error(), err.as_ref());
        }
    }
}
