//! Seeded dealing of decks and social-deduction roles.

use crate::config::{CountChoice, GameConfiguration, WordPair};
use crate::deck::{build_deck, DeckCard};
use crate::player::PlayerId;
use crate::shuffle::{hash_seed, seeded_shuffle};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Word pair used when a room supplies none.
const FALLBACK_PAIR: (&str, &str) = ("Carrot", "Parsnip");
/// Index range shuffled to pick a word pair when none are supplied.
const DEFAULT_PAIR_SLOTS: usize = 15;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DealError {
    #[error("{players} players x {per_player} cards needs more than the {deck} cards in the deck")]
    PoolTooSmall { players: usize, per_player: usize, deck: usize },
    #[error("dealer consistency failed: hands {hands} + remainder {remainder} != deck {deck}")]
    Inconsistent { hands: usize, remainder: usize, deck: usize },
}

/// Opaque deal seed; numbers are used by their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seed(String);

impl Seed {
    pub fn new(seed: impl Into<String>) -> Self {
        Self(seed.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn hash(&self) -> u32 {
        hash_seed(&self.0)
    }

    /// Derived seed used for a secondary shuffle.
    fn suffixed(&self, suffix: &str) -> u32 {
        hash_seed(&format!("{}{suffix}", self.0))
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Seed {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Seed {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for Seed {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealResult {
    /// Private hands in roster order.
    pub hands: Vec<(PlayerId, Vec<DeckCard>)>,
    /// Undealt cards, next card first.
    pub remainder: Vec<DeckCard>,
}

impl DealResult {
    pub fn hand(&self, player: &str) -> Option<&[DeckCard]> {
        self.hands.iter().find(|(p, _)| p.as_str() == player).map(|(_, h)| h.as_slice())
    }

    pub fn total_cards(&self) -> usize {
        self.hands.iter().map(|(_, h)| h.len()).sum::<usize>() + self.remainder.len()
    }
}

/// Shuffle the configured deck and hand out `cards_per_player` consecutive
/// cards to each player in roster order.
///
/// ```
/// use tabletop_engine::config::GameConfiguration;
/// use tabletop_engine::deal::{deal, Seed};
/// use tabletop_engine::player::roster;
///
/// let cfg = GameConfiguration::texas_holdem();
/// let dealt = deal(&cfg, &roster(["alice", "bob"]), &Seed::from("room-42")).unwrap();
/// assert_eq!(dealt.hand("alice").unwrap().len(), 2);
/// assert_eq!(dealt.remainder.len(), 48);
/// ```
pub fn deal(
    config: &GameConfiguration,
    players: &[PlayerId],
    seed: &Seed,
) -> Result<DealResult, DealError> {
    let deck = build_deck(config);
    let per_player = config.cards_per_player();
    if players.len().saturating_mul(per_player) > deck.len() {
        let err = DealError::PoolTooSmall { players: players.len(), per_player, deck: deck.len() };
        warn!("refusing to deal: {err}");
        return Err(err);
    }
    debug!("dealing {} cards with seed {} (hash {})", deck.len(), seed, seed.hash());

    let mut shuffled = seeded_shuffle(&deck, seed.hash()).into_iter();
    let hands: Vec<(PlayerId, Vec<DeckCard>)> = players
        .iter()
        .map(|p| (p.clone(), shuffled.by_ref().take(per_player).collect()))
        .collect();
    let remainder: Vec<DeckCard> = shuffled.collect();

    let result = DealResult { hands, remainder };
    if result.total_cards() != deck.len() {
        let err = DealError::Inconsistent {
            hands: result.total_cards() - result.remainder.len(),
            remainder: result.remainder.len(),
            deck: deck.len(),
        };
        warn!("{err}");
        return Err(err);
    }
    Ok(result)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Civilian,
    Spy,
    Blank,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Civilian => "civilian",
            Role::Spy => "spy",
            Role::Blank => "blank",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub role: Role,
    /// Secret word; empty for blanks.
    pub word: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDeal {
    /// Assignments in shuffled-player order.
    pub assignments: Vec<(PlayerId, RoleAssignment)>,
    pub civilian_word: String,
    pub spy_word: String,
}

impl RoleDeal {
    pub fn role_of(&self, player: &str) -> Option<&RoleAssignment> {
        self.assignments.iter().find(|(p, _)| p.as_str() == player).map(|(_, a)| a)
    }

    pub fn count(&self, role: Role) -> usize {
        self.assignments.iter().filter(|(_, a)| a.role == role).count()
    }
}

/// Pick one entry of a count list by seed. Empty lists count as zero.
fn choose(choice: &CountChoice, seed: u32) -> usize {
    let options = choice.choices();
    let indices: Vec<usize> = (0..options.len()).collect();
    seeded_shuffle(&indices, seed).first().and_then(|&i| options.get(i).copied()).unwrap_or(0)
}

/// Civilian, spy and blank counts for a room of `n`.
fn role_counts(config: &GameConfiguration, n: usize, seed: &Seed) -> (usize, usize, usize) {
    let Some(rule) = config.role_distribution_rules.iter().find(|r| r.covers(n)) else {
        return (n.saturating_sub(1), 1.min(n), 0);
    };
    let mut civ = choose(&rule.civilian, seed.suffixed("c"));
    let mut spy = choose(&rule.spy, seed.suffixed("s"));
    civ = civ.min(n.saturating_sub(1));
    spy = spy.min(n - civ);
    civ = civ.min(n - spy);
    (civ, spy, n - civ - spy)
}

/// Assign civilian, spy and blank roles with their secret words.
///
/// Blanks take whatever seats the civilians and spies leave, so the blank
/// entry of a rule only matters through that arithmetic.
pub fn deal_roles(
    config: &GameConfiguration,
    players: &[PlayerId],
    seed: &Seed,
    word_pairs: &[WordPair],
) -> RoleDeal {
    let n = players.len();
    let (civ, spy, blank) = role_counts(config, n, seed);

    let seed_num = seed.hash();
    let shuffled = seeded_shuffle(players, seed_num);
    let slots = if word_pairs.is_empty() { DEFAULT_PAIR_SLOTS } else { word_pairs.len() };
    let indices: Vec<usize> = (0..slots).collect();
    let pick = seeded_shuffle(&indices, seed_num.wrapping_add(1))[0] % word_pairs.len().max(1);
    let pair = word_pairs
        .get(pick)
        .cloned()
        .unwrap_or_else(|| WordPair::new(FALLBACK_PAIR.0, FALLBACK_PAIR.1));
    debug!("roles for {n} players: {civ} civilian, {spy} spy, {blank} blank");

    let assignments = shuffled
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            let assignment = if i < civ {
                RoleAssignment { role: Role::Civilian, word: pair.civilian.clone() }
            } else if i < civ + spy {
                RoleAssignment { role: Role::Spy, word: pair.spy.clone() }
            } else {
                RoleAssignment { role: Role::Blank, word: String::new() }
            };
            (p, assignment)
        })
        .collect();

    RoleDeal { assignments, civilian_word: pair.civilian, spy_word: pair.spy }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolEntry;
    use crate::player::roster;

    fn labels(cards: &[DeckCard]) -> Vec<&str> {
        cards.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn poker_deal_matches_reference_vector() {
        let cfg = GameConfiguration::texas_holdem();
        let dealt = deal(&cfg, &roster(["alice", "bob"]), &Seed::from("room-42")).unwrap();
        assert_eq!(labels(dealt.hand("alice").unwrap()), ["10♥", "K♣"]);
        assert_eq!(labels(dealt.hand("bob").unwrap()), ["3♦", "7♦"]);
        assert_eq!(labels(&dealt.remainder[..5]), ["K♠", "10♣", "5♦", "8♠", "J♣"]);
        assert_eq!(dealt.remainder.len(), 48);
    }

    #[test]
    fn role_deck_deal_matches_reference_vector() {
        let cfg = GameConfiguration {
            roles: vec![
                PoolEntry::new("Hacker", 1, ""),
                PoolEntry::new("Bodyguard", 1, ""),
                PoolEntry::new("Fixer", 1, ""),
                PoolEntry::new("Civilian Specialist", 2, ""),
            ],
            cards_per_player: Some(1),
            ..GameConfiguration::default()
        };
        let dealt = deal(&cfg, &roster(["p1", "p2", "p3"]), &Seed::from("heist-7")).unwrap();
        assert_eq!(labels(dealt.hand("p1").unwrap()), ["Bodyguard"]);
        assert_eq!(labels(dealt.hand("p2").unwrap()), ["Civilian Specialist"]);
        assert_eq!(labels(dealt.hand("p3").unwrap()), ["Fixer"]);
        assert_eq!(labels(&dealt.remainder), ["Civilian Specialist", "Hacker"]);
    }

    #[test]
    fn too_many_players_is_a_configuration_error() {
        let cfg = GameConfiguration {
            roles: vec![PoolEntry::new("Seer", 2, "")],
            ..GameConfiguration::default()
        };
        let err = deal(&cfg, &roster(["a", "b", "c"]), &Seed::from(1)).unwrap_err();
        assert_eq!(err, DealError::PoolTooSmall { players: 3, per_player: 1, deck: 2 });
    }

    #[test]
    fn undercover_roles_match_reference_vectors() {
        let cfg = GameConfiguration::undercover();
        let deal4 = deal_roles(&cfg, &roster(["a", "b", "c", "d"]), &Seed::from("spy-room"), &cfg.word_pairs);
        let order: Vec<&str> = deal4.assignments.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(order, ["b", "c", "a", "d"]);
        assert_eq!(deal4.civilian_word, "Monkey");
        assert_eq!(deal4.spy_word, "Ape");
        assert_eq!(deal4.role_of("d").unwrap().role, Role::Spy);
        assert_eq!(deal4.role_of("a").unwrap().word, "Monkey");

        let deal7 = deal_roles(
            &cfg,
            &roster(["a", "b", "c", "d", "e", "f", "g"]),
            &Seed::from("big-room"),
            &cfg.word_pairs,
        );
        assert_eq!((deal7.count(Role::Civilian), deal7.count(Role::Spy), deal7.count(Role::Blank)), (4, 2, 1));
        assert_eq!(deal7.civilian_word, "Bun");
        assert_eq!(deal7.role_of("a").unwrap(), &RoleAssignment { role: Role::Blank, word: String::new() });
        assert_eq!(deal7.role_of("f").unwrap().word, "Dumpling");

        let ten = roster(["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"]);
        let deal10 = deal_roles(&cfg, &ten, &Seed::from("x"), &cfg.word_pairs);
        assert_eq!(deal10.count(Role::Civilian), 9);
        assert_eq!(deal10.role_of("j").unwrap().word, "Sandals");
        assert_eq!(deal10.civilian_word, "Slippers");
    }

    #[test]
    fn without_rules_or_pairs_one_spy_and_the_fallback_words() {
        let cfg = GameConfiguration::default();
        let dealt = deal_roles(&cfg, &roster(["a", "b", "c"]), &Seed::from("s"), &[]);
        assert_eq!(dealt.count(Role::Spy), 1);
        assert_eq!(dealt.count(Role::Civilian), 2);
        assert_eq!(dealt.civilian_word, "Carrot");
        assert_eq!(dealt.spy_word, "Parsnip");
    }
}
