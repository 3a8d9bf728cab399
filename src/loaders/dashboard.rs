// src/loaders/dashboard.rs

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::{LoadError, ResourceKind};
use crate::fs::FileSystem;
use crate::loaders::RawCard;
use crate::loaders::settings::source_name;
use crate::model::{Card, DEFAULT_CARD_TYPE, Dashboard, QueryProvider, SharedCards};

/// Card type whose `provider` must name a registered query provider.
const SEARCH_CARD_TYPE: &str = "search";

/// Shared services a dashboard resolves its cards against.
#[derive(Debug, Clone, Copy)]
pub struct LoadContext<'a> {
    pub query_providers: &'a [QueryProvider],
    pub shared_cards: &'a SharedCards,
    pub generation: u64,
}

#[derive(Debug, Deserialize, Default)]
struct RawDashboardFile {
    #[serde(default)]
    dashboard: RawDashboardMeta,
    #[serde(default)]
    card: Vec<RawCard>,
}

#[derive(Debug, Deserialize, Default)]
struct RawDashboardMeta {
    #[serde(default)]
    title: Option<String>,
}

/// Dashboard key for a source file: its base name without extension.
pub fn dashboard_name(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
}

/// blake3 hash of a source text.
pub fn content_hash(contents: &str) -> String {
    blake3::hash(contents.as_bytes()).to_hex().to_string()
}

/// Load one dashboard file.
///
/// The dashboard always exists afterwards. A file that cannot be read or
/// parsed gives an empty card list plus an error; a card that cannot be
/// resolved is dropped and the first such error is reported.
pub fn load_dashboard(
    fs: &dyn FileSystem,
    path: &Path,
    name: &str,
    ctx: LoadContext<'_>,
) -> Dashboard {
    let dashboard = Dashboard::new(name, path, ctx.generation);
    let source_name = source_name(path);

    let contents = match fs.read_to_string(path) {
        Ok(c) => c,
        Err(err) => {
            warn!(dashboard = %name, error = %format!("{err:#}"), "could not read dashboard");
            return dashboard.with_error(LoadError::source_parse(source_name, format!("{err:#}")));
        }
    };
    let dashboard = dashboard.with_source_hash(content_hash(&contents));

    let raw: RawDashboardFile = match toml::from_str(&contents) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(dashboard = %name, error = %err, "could not parse dashboard");
            return dashboard.with_error(LoadError::source_parse(source_name, err));
        }
    };

    let mut cards = Vec::with_capacity(raw.card.len());
    let mut first_error = None;
    for (idx, raw_card) in raw.card.into_iter().enumerate() {
        match resolve_card(raw_card, idx, &source_name, ctx) {
            Ok(card) => cards.push(card),
            Err(err) => {
                warn!(dashboard = %name, index = idx, error = %err, "skipping card");
                first_error.get_or_insert(err);
            }
        }
    }

    debug!(dashboard = %name, cards = cards.len(), "dashboard loaded");
    let dashboard = dashboard.with_title(raw.dashboard.title).with_cards(cards);
    match first_error {
        Some(err) => dashboard.with_error(err),
        None => dashboard,
    }
}

fn resolve_card(
    raw: RawCard,
    idx: usize,
    source_name: &str,
    ctx: LoadContext<'_>,
) -> Result<Card, LoadError> {
    if let Some(shared) = raw.shared {
        return ctx
            .shared_cards
            .get(&shared)
            .cloned()
            .ok_or_else(|| LoadError::missing(ResourceKind::SharedCard, shared));
    }

    let name = raw.name.ok_or_else(|| {
        LoadError::source_parse(source_name, format!("card #{} has no name", idx + 1))
    })?;
    let kind = raw.kind.unwrap_or_else(|| DEFAULT_CARD_TYPE.to_string());

    if kind == SEARCH_CARD_TYPE {
        if let Some(provider) = raw.options.get("provider").and_then(|v| v.as_str()) {
            if !ctx.query_providers.iter().any(|p| p.name == provider) {
                return Err(LoadError::missing(ResourceKind::QueryProvider, provider));
            }
        }
    }

    Ok(Card {
        name,
        kind,
        data_source: raw.data_source,
        options: raw.options,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use crate::model::default_query_providers;

    fn shared() -> SharedCards {
        SharedCards::new(vec![Card {
            name: "bookmarks".to_string(),
            kind: "link".to_string(),
            data_source: None,
            options: toml::Table::new(),
        }])
    }

    fn load(fs: &MockFileSystem, contents: &str) -> Dashboard {
        fs.add_file("/d/media.toml", contents);
        let providers = default_query_providers();
        let shared = shared();
        let ctx = LoadContext {
            query_providers: &providers,
            shared_cards: &shared,
            generation: 7,
        };
        load_dashboard(fs, Path::new("/d/media.toml"), "media", ctx)
    }

    #[test]
    fn resolves_cards_in_order_including_shared_ones() {
        let fs = MockFileSystem::new();
        let dboard = load(
            &fs,
            r#"
[dashboard]
title = "Media"

[[card]]
name = "plex"
type = "rest"
data_source = "plex"

[[card]]
shared = "bookmarks"

[[card]]
name = "search"
type = "search"
provider = "DuckDuckGo"
"#,
        );

        assert!(dboard.error().is_none());
        assert_eq!(dboard.title(), Some("Media"));
        assert_eq!(dboard.generation(), 7);
        let names: Vec<_> = dboard.cards().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["plex", "bookmarks", "search"]);
        assert_eq!(dboard.cards()[0].data_source.as_deref(), Some("plex"));
        assert!(dboard.source_hash().is_some());
    }

    #[test]
    fn unknown_shared_card_is_dropped_and_reported() {
        let fs = MockFileSystem::new();
        let dboard = load(
            &fs,
            "[[card]]\nshared = \"nope\"\n\n[[card]]\nname = \"kept\"\n",
        );

        assert_eq!(dboard.cards().len(), 1);
        assert_eq!(dboard.cards()[0].name, "kept");
        assert_eq!(
            dboard.error(),
            Some(&LoadError::missing(ResourceKind::SharedCard, "nope"))
        );
    }

    #[test]
    fn unknown_search_provider_is_a_missing_resource() {
        let fs = MockFileSystem::new();
        let dboard = load(
            &fs,
            "[[card]]\nname = \"s\"\ntype = \"search\"\nprovider = \"Altavista\"\n",
        );

        assert!(dboard.cards().is_empty());
        assert!(matches!(
            dboard.error(),
            Some(LoadError::MissingResource { kind: ResourceKind::QueryProvider, .. })
        ));
    }

    #[test]
    fn malformed_file_keeps_the_dashboard_with_an_error() {
        let fs = MockFileSystem::new();
        let dboard = load(&fs, "[[card]\n");

        assert_eq!(dboard.name(), "media");
        assert!(dboard.cards().is_empty());
        assert!(matches!(dboard.error(), Some(LoadError::SourceParse { .. })));
    }

    #[test]
    fn dashboard_name_strips_extension() {
        assert_eq!(dashboard_name(Path::new("/d/media.toml")).as_deref(), Some("media"));
        assert_eq!(dashboard_name(Path::new("/d/main")).as_deref(), Some("main"));
    }
}
