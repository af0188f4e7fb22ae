use crate::cards::{Card, CardParseError, Rank, Suit};
use crate::config::{DeckType, GameConfiguration, PoolEntry};
use serde::{Deserialize, Serialize};

const FALLBACK_MIN_CARDS: usize = 6;
const FALLBACK_LABEL: &str = "Civilian";
const FALLBACK_SUMMARY: &str = "Survivor";

/// One dealt unit: a playing card, a role card or a custom card.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeckCard {
    pub label: String,
    #[serde(default)]
    pub summary: String,
}

impl DeckCard {
    pub fn new(label: impl Into<String>, summary: impl Into<String>) -> Self {
        Self { label: label.into(), summary: summary.into() }
    }

    /// Interpret the label as a playing card (`"10♥"`).
    pub fn to_card(&self) -> Result<Card, CardParseError> {
        self.label.parse()
    }
}

impl From<Card> for DeckCard {
    fn from(card: Card) -> Self {
        DeckCard {
            label: card.to_string(),
            summary: format!("{}{}", card.suit().name(), card.rank().label()),
        }
    }
}

/// The 52-card deck in table order: ♠ ♥ ♦ ♣, each from Ace down to Two.
///
/// ```
/// use tabletop_engine::deck::standard_52;
///
/// let deck = standard_52();
/// assert_eq!(deck.len(), 52);
/// assert_eq!(deck[0].label, "A♠");
/// assert_eq!(deck[51].label, "2♣");
/// ```
pub fn standard_52() -> Vec<DeckCard> {
    let mut cards = Vec::with_capacity(52);
    for &s in &Suit::DECK_ORDER {
        for &r in &Rank::DECK_ORDER {
            cards.push(DeckCard::from(Card::new(r, s)));
        }
    }
    cards
}

fn expand(entries: &[PoolEntry]) -> Vec<DeckCard> {
    entries
        .iter()
        .flat_map(|e| std::iter::repeat(DeckCard::new(&e.name, &e.skill_summary)).take(e.count))
        .collect()
}

/// Build the deck a configuration describes.
///
/// A `custom` deck with no cards falls back to the roles; with no roles
/// either, the deck is a pile of interchangeable civilian cards.
pub fn build_deck(config: &GameConfiguration) -> Vec<DeckCard> {
    let dist = &config.game_schema.distribution;
    match dist.deck_type {
        DeckType::Standard52 => return standard_52(),
        DeckType::Custom => {
            let deck = expand(&dist.deck_cards);
            if !deck.is_empty() {
                return deck;
            }
        }
        DeckType::FromRoles => {}
    }
    let deck = expand(&config.roles);
    if !deck.is_empty() {
        return deck;
    }
    let n = config.max_players.unwrap_or(FALLBACK_MIN_CARDS).max(FALLBACK_MIN_CARDS);
    vec![DeckCard::new(FALLBACK_LABEL, FALLBACK_SUMMARY); n]
}

/// Whether the configuration declares a deck of its own (no fallback pile).
pub fn can_build_deck(config: &GameConfiguration) -> bool {
    let dist = &config.game_schema.distribution;
    match dist.deck_type {
        DeckType::Standard52 => true,
        DeckType::Custom => !dist.deck_cards.is_empty(),
        DeckType::FromRoles => !config.roles.is_empty(),
    }
}

pub fn expected_deck_size(config: &GameConfiguration) -> usize {
    build_deck(config).len()
}
