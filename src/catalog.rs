use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context};

use crate::data::builtin_deck;
use crate::models::Flashcard;

/// Immutable card content, built once at startup and shared by reference.
/// The scheduler only ever consumes card ids; everything else is opaque
/// payload for the client.
pub struct Catalog {
    cards: HashMap<String, Flashcard>,
}

impl Catalog {
    /// Catalog backed by the compiled-in seed deck.
    pub fn builtin() -> anyhow::Result<Self> {
        Self::from_cards(builtin_deck())
    }

    /// Catalog loaded from a JSON deck file (an array of cards).
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read deck file {}", path.display()))?;
        let cards: Vec<Flashcard> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse deck file {}", path.display()))?;

        Self::from_cards(cards)
    }

    fn from_cards(cards: Vec<Flashcard>) -> anyhow::Result<Self> {
        let mut map = HashMap::with_capacity(cards.len());
        for card in cards {
            if let Some(previous) = map.insert(card.id.clone(), card) {
                bail!("duplicate card id in deck: {}", previous.id);
            }
        }

        Ok(Self { cards: map })
    }

    pub fn get(&self, id: &str) -> Option<&Flashcard> {
        self.cards.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.cards.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
