// src/model/card.rs

/// Card type used when a definition has no `type` key.
pub const DEFAULT_CARD_TYPE: &str = "custom";

/// One resolved card definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub name: String,
    pub kind: String,
    pub data_source: Option<String>,
    /// Remaining keys, interpreted by the card renderer.
    pub options: toml::Table,
}

/// Cards from `shared_cards.toml`, referenced from dashboards by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SharedCards {
    cards: Vec<Card>,
}

impl SharedCards {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// First card with the given name.
    pub fn get(&self, name: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.name == name)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
