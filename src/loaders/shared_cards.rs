// src/loaders/shared_cards.rs

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::fs::FileSystem;
use crate::loaders::RawCard;
use crate::model::{Card, DEFAULT_CARD_TYPE, SharedCards};

#[derive(Debug, Deserialize, Default)]
struct RawSharedCardsFile {
    #[serde(default)]
    card: Vec<RawCard>,
}

/// Parse `shared_cards.toml`.
///
/// Shared cards are best-effort: on failure the error is logged and an empty
/// set is returned. Nothing is reported to dashboards.
pub fn load_shared_cards(fs: &dyn FileSystem, path: &Path) -> SharedCards {
    let contents = match fs.read_to_string(path) {
        Ok(c) => c,
        Err(err) => {
            error!(path = ?path, error = %format!("{err:#}"), "could not load shared cards");
            return SharedCards::default();
        }
    };

    let raw: RawSharedCardsFile = match toml::from_str(&contents) {
        Ok(raw) => raw,
        Err(err) => {
            error!(path = ?path, error = %err, "could not load shared cards");
            return SharedCards::default();
        }
    };

    let mut cards = Vec::with_capacity(raw.card.len());
    for (idx, card) in raw.card.into_iter().enumerate() {
        if card.shared.is_some() {
            warn!(index = idx, "shared cards cannot reference other shared cards; skipping");
            continue;
        }
        let Some(name) = card.name else {
            warn!(index = idx, "shared card without a name; skipping");
            continue;
        };
        cards.push(Card {
            name,
            kind: card.kind.unwrap_or_else(|| DEFAULT_CARD_TYPE.to_string()),
            data_source: card.data_source,
            options: card.options,
        });
    }

    info!(cards = cards.len(), "shared cards loaded");
    SharedCards::new(cards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn keeps_file_order_and_skips_invalid_entries() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "/cfg/shared_cards.toml",
            r#"
[[card]]
name = "zeta"
type = "link"
url = "https://example.org"

[[card]]
type = "link"

[[card]]
name = "alpha"
data_source = "weather"
"#,
        );

        let shared = load_shared_cards(&fs, Path::new("/cfg/shared_cards.toml"));
        let names: Vec<_> = shared.cards().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(shared.get("alpha").unwrap().kind, DEFAULT_CARD_TYPE);
        assert_eq!(
            shared.get("zeta").unwrap().options.get("url").and_then(|v| v.as_str()),
            Some("https://example.org")
        );
    }

    #[test]
    fn malformed_file_yields_empty_set() {
        let fs = MockFileSystem::new();
        fs.add_file("/cfg/shared_cards.toml", "[[card]\nname=");

        let shared = load_shared_cards(&fs, Path::new("/cfg/shared_cards.toml"));
        assert!(shared.is_empty());
    }
}
