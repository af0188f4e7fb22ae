//! Built-in sample games that skip the rule parser.

use crate::config::{
    ActionTarget, CountChoice, DeckType, Distribution, GameConfiguration, GameSchema,
    OptionSpec, PhaseInteraction, PoolEntry, RoleDistributionRule, WordPair,
};
use crate::win::WinCondition;
use std::collections::BTreeMap;

pub const TEXAS_HOLDEM: &str = "texas-holdem";
pub const UNDERCOVER: &str = "among-us";
pub const NEON_HEIST: &str = "neon-heist";

/// Civilian/spy word pairs for the undercover game.
pub const WORD_PAIRS: [(&str, &str); 15] = [
    ("Carrot", "Parsnip"),
    ("Rose", "Carnation"),
    ("Cabbage", "Lettuce"),
    ("Potato", "Sweet potato"),
    ("Orange", "Tangerine"),
    ("Butterfly", "Moth"),
    ("Monkey", "Ape"),
    ("Soap", "Shower gel"),
    ("Pepper", "Bell pepper"),
    ("Milk", "Soy milk"),
    ("Bun", "Dumpling"),
    ("Dumpling", "Wonton"),
    ("Slippers", "Sandals"),
    ("Phone", "Tablet"),
    ("Watermelon", "Winter melon"),
];

fn interaction(id: &str, name: &str) -> PhaseInteraction {
    PhaseInteraction {
        phase_id: id.to_string(),
        phase_name: Some(name.to_string()),
        ..PhaseInteraction::default()
    }
}

fn dealing(id: &str, name: &str, cards: usize) -> PhaseInteraction {
    PhaseInteraction { deal_from_deck: Some(cards), ..interaction(id, name) }
}

fn prompted(id: &str, name: &str, kind: &str, target: ActionTarget) -> PhaseInteraction {
    PhaseInteraction {
        in_app_input: true,
        action_type: Some(kind.to_string()),
        action_target: Some(target),
        ..interaction(id, name)
    }
}

impl GameConfiguration {
    /// Texas Hold'em for 1-10 players: blinds 10/20, 500 chips each.
    pub fn texas_holdem() -> Self {
        let betting = PhaseInteraction {
            action_options: ["Fold", "Check", "Call", "Raise"]
                .iter()
                .map(|o| OptionSpec::Plain(o.to_string()))
                .collect(),
            ..prompted("pre_flop", "Pre-flop Betting", "select", ActionTarget::CurrentPlayer)
        };
        GameConfiguration {
            game_name: "Texas Hold'em".to_string(),
            game_id: Some(TEXAS_HOLDEM.to_string()),
            min_players: Some(1),
            max_players: Some(10),
            cards_per_player: Some(2),
            game_schema: GameSchema {
                game_type: Some("card_based".to_string()),
                distribution: Distribution {
                    deck_type: DeckType::Standard52,
                    deck_cards: Vec::new(),
                    cards_per_player: Some(2),
                },
                phase_interactions: vec![
                    betting,
                    dealing("flop", "Flop", 3),
                    dealing("turn", "Turn", 1),
                    dealing("river", "River", 1),
                    interaction("showdown", "Showdown"),
                ],
                win_conditions: vec![WinCondition::LastStanding, WinCondition::HandCompare],
                ..GameSchema::default()
            },
            small_blind: Some(10),
            big_blind: Some(20),
            initial_items: BTreeMap::from([("chips".to_string(), 500)]),
            ..GameConfiguration::default()
        }
    }

    /// "Who is the undercover": 4-12 players, shared secret word, one odd word out.
    pub fn undercover() -> Self {
        let description = PhaseInteraction {
            transition_trigger: Some("host_confirm".to_string()),
            transition_target: Some("voting".to_string()),
            ..interaction("description", "Description Phase")
        };
        GameConfiguration {
            game_name: "Undercover".to_string(),
            game_id: Some(UNDERCOVER.to_string()),
            min_players: Some(4),
            max_players: Some(12),
            game_schema: GameSchema {
                game_type: Some("word_based".to_string()),
                phase_interactions: vec![
                    description,
                    prompted("voting", "Voting Phase", "select", ActionTarget::AllPlayers),
                ],
                win_conditions: vec![WinCondition::RoleElimination {
                    civilians: "civilian".to_string(),
                    spies: "spy".to_string(),
                }],
                ..GameSchema::default()
            },
            role_distribution_rules: vec![
                RoleDistributionRule {
                    min: 4,
                    max: 5,
                    civilian: CountChoice::Many(vec![3, 4]),
                    spy: CountChoice::One(1),
                    blank: CountChoice::One(0),
                },
                RoleDistributionRule {
                    min: 6,
                    max: 8,
                    civilian: CountChoice::Many(vec![4, 5, 6]),
                    spy: CountChoice::Many(vec![1, 2]),
                    blank: CountChoice::Many(vec![0, 1]),
                },
                RoleDistributionRule {
                    min: 9,
                    max: 12,
                    civilian: CountChoice::Many(vec![6, 7, 8, 9]),
                    spy: CountChoice::One(2),
                    blank: CountChoice::Many(vec![0, 1]),
                },
            ],
            word_pairs: WORD_PAIRS.iter().map(|&(c, s)| WordPair::new(c, s)).collect(),
            ..GameConfiguration::default()
        }
    }

    /// A role-card heist for 3-5 players. It declares no win conditions, so
    /// the engine leaves it to the external agent.
    pub fn neon_heist() -> Self {
        GameConfiguration {
            game_name: "Neon Heist: The Core".to_string(),
            game_id: Some(NEON_HEIST.to_string()),
            min_players: Some(3),
            max_players: Some(5),
            cards_per_player: Some(1),
            roles: vec![
                PoolEntry::new("Hacker", 1, "Bypass security locks without spending action points."),
                PoolEntry::new("Bodyguard", 1, "Protect one teammate from security system tagging."),
                PoolEntry::new("Fixer", 1, "Trade items between any two players during planning phase."),
                PoolEntry::new("Civilian Specialist", 2, "Assist infiltration with extra action support."),
            ],
            game_schema: GameSchema {
                game_type: Some("role_based".to_string()),
                distribution: Distribution { cards_per_player: Some(1), ..Distribution::default() },
                phase_interactions: vec![
                    prompted("infiltration", "Infiltration Phase", "confirm", ActionTarget::CurrentPlayer),
                    prompted("vault", "Core Vault", "input", ActionTarget::CurrentPlayer),
                    prompted("extraction", "Extraction Phase", "confirm", ActionTarget::CurrentPlayer),
                ],
                ..GameSchema::default()
            },
            initial_items: BTreeMap::from([
                ("credits".to_string(), 1000),
                ("neural_link".to_string(), 1),
                ("action_points".to_string(), 2),
            ]),
            ..GameConfiguration::default()
        }
    }

    /// Look up a built-in game by id.
    pub fn preset(id: &str) -> Option<Self> {
        match id {
            TEXAS_HOLDEM | "holdem" => Some(Self::texas_holdem()),
            UNDERCOVER | "undercover" => Some(Self::undercover()),
            NEON_HEIST => Some(Self::neon_heist()),
            _ => None,
        }
    }
}
