pub(crate) mod analysis;
pub(crate) mod combinations;
pub(crate) mod detector;

use crate::cards::{Card, Rank};
use crate::hand::{validate_distinct, HandError};
use crate::player::PlayerId;
use core::cmp::Ordering;
use std::fmt;

/// Compact, comparable hand strength. Higher is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandValue(u64);

/// Poker hand category from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum Category {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl Category {
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::Pair => "Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Best five cards with their category. Ordered by `value` alone, so two
/// evaluations with different suits can compare equal.
#[derive(Debug, Clone, Copy)]
pub struct Evaluation {
    pub category: Category,
    pub best_five: [Card; 5],
    value: HandValue,
}

impl Ord for Evaluation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl PartialOrd for Evaluation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Evaluation {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Evaluation {}

impl Evaluation {
    pub const fn value(&self) -> HandValue {
        self.value
    }

    /// Category name, reporting an ace-high straight flush as a royal flush.
    pub fn name(&self) -> &'static str {
        if self.category == Category::StraightFlush && self.value.primary() == Rank::Ace.value() {
            "Royal Flush"
        } else {
            self.category.name()
        }
    }
}

// [ category (8 bits) | r0 (6) | r1 (6) | r2 (6) | r3 (6) | r4 (6) | 18 zero bits ]
const CAT_SHIFT: u32 = 48;
const RANK_STRIDE: u32 = 6;

impl HandValue {
    /// Pack a category and five tiebreak ranks, most significant first.
    pub fn from_parts(category: Category, ranks_desc: &[Rank; 5]) -> Self {
        let mut v = u64::from(category.ordinal()) << CAT_SHIFT;
        for (i, r) in ranks_desc.iter().enumerate() {
            v |= u64::from(r.value()) << (CAT_SHIFT - RANK_STRIDE * (i as u32 + 1));
        }
        HandValue(v)
    }

    fn primary(self) -> u8 {
        ((self.0 >> (CAT_SHIFT - RANK_STRIDE)) & 0x3f) as u8
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
    #[error("invalid hand: {0}")]
    InvalidHand(#[from] HandError),
    #[error("not enough cards to evaluate")]
    NotEnoughCards,
}

/// Evaluate exactly five cards.
pub fn evaluate_five(cards: &[Card; 5]) -> Evaluation {
    let a = analysis::HandAnalysis::new(cards);
    detector::DETECTORS
        .iter()
        .find_map(|d| d.detect(&a))
        .unwrap_or_else(|| a.evaluation(Category::HighCard, &a.ranks))
}

/// Best five of seven cards over all 21 combinations.
pub fn evaluate_seven(cards: &[Card; 7]) -> Evaluation {
    best_of(cards).unwrap_or_else(|| evaluate_five(&[cards[0], cards[1], cards[2], cards[3], cards[4]]))
}

fn best_of(cards: &[Card]) -> Option<Evaluation> {
    combinations::ChooseFive::new(cards.len())
        .map(|ix| evaluate_five(&ix.map(|i| cards[i])))
        .max()
}

/// Best five-card hand from five to seven distinct cards.
///
/// ```
/// use tabletop_engine::cards::parse_cards;
/// use tabletop_engine::evaluator::{best_hand, Category};
///
/// let eval = best_hand(&parse_cards("As Ah Qc Jd 9h 3s 2c").unwrap()).unwrap();
/// assert_eq!(eval.category, Category::Pair);
/// ```
pub fn best_hand(cards: &[Card]) -> Result<Evaluation, EvalError> {
    if cards.len() < 5 {
        return Err(EvalError::NotEnoughCards);
    }
    if cards.len() > 7 {
        return Err(HandError::CardCount(cards.len()).into());
    }
    validate_distinct(cards)?;
    best_of(cards).ok_or(EvalError::NotEnoughCards)
}

/// Result of comparing every contender's best hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Showdown {
    /// Everyone tied at the top, in input order.
    pub winners: Vec<PlayerId>,
    /// Name of the winning hand; empty when nobody contested.
    pub hand_name: String,
    /// All contenders, strongest first; ties keep input order.
    pub ranked: Vec<(PlayerId, Evaluation)>,
}

/// Rank private hands against shared community cards.
///
/// ```
/// use tabletop_engine::cards::parse_cards;
/// use tabletop_engine::evaluator::evaluate_showdown;
/// use tabletop_engine::player::PlayerId;
///
/// let board = parse_cards("Qc Jd 9h 3s 2c").unwrap();
/// let hands = vec![
///     (PlayerId::from("ann"), parse_cards("Ks Kh").unwrap()),
///     (PlayerId::from("bo"), parse_cards("As Ah").unwrap()),
/// ];
/// let showdown = evaluate_showdown(&hands, &board).unwrap();
/// assert_eq!(showdown.winners, vec![PlayerId::from("bo")]);
/// assert_eq!(showdown.hand_name, "Pair");
/// ```
pub fn evaluate_showdown(
    players: &[(PlayerId, Vec<Card>)],
    community: &[Card],
) -> Result<Showdown, EvalError> {
    let mut ranked = Vec::with_capacity(players.len());
    for (player, hole) in players {
        let mut cards = hole.clone();
        cards.extend_from_slice(community);
        ranked.push((player.clone(), best_hand(&cards)?));
    }
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let Some(top) = ranked.first().map(|(_, e)| *e) else {
        return Ok(Showdown { winners: Vec::new(), hand_name: String::new(), ranked });
    };
    let winners = ranked.iter().take_while(|(_, e)| *e == top).map(|(p, _)| p.clone()).collect();
    Ok(Showdown { winners, hand_name: top.name().to_string(), ranked })
}
