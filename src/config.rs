//! Declarative game configuration as produced by the external rule parser.
//!
//! The engine trusts the shape (serde enforces it) but validates the parts it
//! depends on: roster size, schema completeness, and later the deal
//! cardinalities (see [`crate::deal`]).

use crate::win::WinCondition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const DEFAULT_SMALL_BLIND: u64 = 10;
const DEFAULT_BIG_BLIND: u64 = 20;
const DEFAULT_STARTING_CHIPS: u64 = 500;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("malformed game configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("player count {got} outside the supported range {min}..={max}")]
    PlayerCount { min: usize, max: usize, got: usize },
    #[error("incomplete game schema: {}", .0.join("; "))]
    InvalidSchema(Vec<String>),
}

/// One entry of a role or card pool: `count` copies of `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEntry {
    #[serde(default = "unknown_name", alias = "roleName")]
    pub name: String,
    #[serde(default = "one")]
    pub count: usize,
    #[serde(default)]
    pub skill_summary: String,
}

impl PoolEntry {
    pub fn new(name: impl Into<String>, count: usize, skill_summary: impl Into<String>) -> Self {
        Self { name: name.into(), count, skill_summary: skill_summary.into() }
    }
}

fn unknown_name() -> String {
    "Unknown".to_string()
}

fn one() -> usize {
    1
}

/// Where the deck comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeckType {
    #[serde(rename = "standard_52")]
    Standard52,
    #[serde(rename = "custom")]
    Custom,
    #[default]
    #[serde(rename = "from_roles")]
    FromRoles,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Distribution {
    pub deck_type: DeckType,
    pub deck_cards: Vec<PoolEntry>,
    pub cards_per_player: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseTrigger {
    #[default]
    AllActed,
    HostConfirm,
    Timer,
    Auto,
    PlayerAction,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTarget {
    #[default]
    CurrentPlayer,
    AllPlayers,
    FirstPlayer,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseDef {
    pub id: String,
    pub name: String,
    pub next: Vec<String>,
    pub trigger: PhaseTrigger,
    pub deal_count: usize,
}

/// A choice offered during a phase. Numeric options become input requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionDef {
    pub id: String,
    pub label: String,
    pub input_type: Option<String>,
    pub min: Option<u64>,
    pub max: Option<u64>,
    pub step: Option<u64>,
}

impl OptionDef {
    pub fn is_numeric(&self) -> bool {
        self.input_type.as_deref() == Some("number")
    }

    /// The identifier a client answers with; falls back to the label.
    pub fn key(&self) -> &str {
        if self.id.is_empty() {
            &self.label
        } else {
            &self.id
        }
    }

    pub fn display(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionDef {
    pub phase_id: String,
    pub options: Vec<OptionDef>,
    pub target: ActionTarget,
}

/// Plain string or `{id, label}` object, as legacy interaction lists mix both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionSpec {
    Plain(String),
    Full {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        label: Option<String>,
    },
}

impl OptionSpec {
    fn to_option(&self) -> Option<OptionDef> {
        let (id, label) = match self {
            OptionSpec::Plain(s) => (s.clone(), s.clone()),
            OptionSpec::Full { id, label } => {
                let id = id.clone().or_else(|| label.clone())?;
                let label = label.clone().unwrap_or_else(|| id.clone());
                (id, label)
            }
        };
        Some(OptionDef { id, label, ..OptionDef::default() })
    }
}

/// Older per-phase interaction description; folded into phases and actions by
/// [`GameSchema::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseInteraction {
    #[serde(alias = "id")]
    pub phase_id: String,
    #[serde(alias = "name")]
    pub phase_name: Option<String>,
    pub in_app_input: bool,
    pub action_type: Option<String>,
    pub action_target: Option<ActionTarget>,
    pub action_options: Vec<OptionSpec>,
    pub transition_trigger: Option<String>,
    pub transition_target: Option<String>,
    pub deal_from_deck: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSchema {
    pub game_type: Option<String>,
    pub distribution: Distribution,
    pub phases: Vec<PhaseDef>,
    pub actions: Vec<ActionDef>,
    pub phase_interactions: Vec<PhaseInteraction>,
    pub win_conditions: Vec<WinCondition>,
}

impl GameSchema {
    /// Fold legacy `phase_interactions` into `phases`/`actions`. Explicit
    /// phases and actions win when both are present.
    pub fn normalize(&self) -> GameSchema {
        let mut phases = Vec::new();
        let mut actions = Vec::new();
        for pi in &self.phase_interactions {
            let trigger = match pi.transition_trigger.as_deref() {
                Some("host_confirm") => PhaseTrigger::HostConfirm,
                _ => PhaseTrigger::AllActed,
            };
            phases.push(PhaseDef {
                id: pi.phase_id.clone(),
                name: pi.phase_name.clone().unwrap_or_else(|| pi.phase_id.clone()),
                next: pi.transition_target.iter().cloned().collect(),
                trigger,
                deal_count: pi.deal_from_deck.unwrap_or(0),
            });
            if pi.in_app_input {
                let options: Vec<OptionDef> =
                    pi.action_options.iter().filter_map(OptionSpec::to_option).collect();
                if !options.is_empty() {
                    let target = match pi.action_target {
                        Some(ActionTarget::AllPlayers) => ActionTarget::AllPlayers,
                        _ => ActionTarget::CurrentPlayer,
                    };
                    actions.push(ActionDef { phase_id: pi.phase_id.clone(), options, target });
                }
            }
        }
        GameSchema {
            phases: if phases.is_empty() { self.phases.clone() } else { phases },
            actions: if actions.is_empty() { self.actions.clone() } else { actions },
            ..self.clone()
        }
    }

    /// Check that the schema is complete enough to drive a game; collects
    /// every problem rather than stopping at the first.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        if self.phases.is_empty() {
            errors.push("phases must be a non-empty list".to_string());
        }
        if self.win_conditions.is_empty() {
            errors.push("win_conditions must be a non-empty list".to_string());
        }
        for p in &self.phases {
            if p.id.is_empty() || p.name.is_empty() {
                errors.push(format!("phase is missing an id or name: {p:?}"));
            }
            for next in &p.next {
                if !self.phases.iter().any(|q| &q.id == next) {
                    errors.push(format!("phase {} transitions to unknown phase {next}", p.id));
                }
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::InvalidSchema(errors))
        }
    }

    pub fn phase(&self, id: &str) -> Option<&PhaseDef> {
        self.phases.iter().find(|p| p.id == id)
    }

    /// The first action declared for a phase.
    pub fn action_for(&self, phase_id: &str) -> Option<&ActionDef> {
        self.actions.iter().find(|a| a.phase_id == phase_id)
    }
}

/// A count that may be fixed or chosen (by seed) from a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CountChoice {
    One(usize),
    Many(Vec<usize>),
}

impl CountChoice {
    pub fn choices(&self) -> Vec<usize> {
        match self {
            CountChoice::One(n) => vec![*n],
            CountChoice::Many(ns) => ns.clone(),
        }
    }
}

impl Default for CountChoice {
    fn default() -> Self {
        CountChoice::One(0)
    }
}

/// Role counts for rooms whose size falls in `min..=max`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDistributionRule {
    pub min: usize,
    pub max: usize,
    pub civilian: CountChoice,
    pub spy: CountChoice,
    #[serde(default)]
    pub blank: CountChoice,
}

impl RoleDistributionRule {
    pub fn covers(&self, players: usize) -> bool {
        self.min <= players && players <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPair {
    pub civilian: String,
    pub spy: String,
}

impl WordPair {
    pub fn new(civilian: impl Into<String>, spy: impl Into<String>) -> Self {
        Self { civilian: civilian.into(), spy: spy.into() }
    }
}

/// Immutable description of a game; fixed once a room starts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfiguration {
    pub game_name: String,
    #[serde(alias = "gameId")]
    pub game_id: Option<String>,
    pub min_players: Option<usize>,
    pub max_players: Option<usize>,
    pub cards_per_player: Option<usize>,
    pub roles: Vec<PoolEntry>,
    pub game_schema: GameSchema,
    pub small_blind: Option<u64>,
    pub big_blind: Option<u64>,
    pub initial_items: BTreeMap<String, i64>,
    pub role_distribution_rules: Vec<RoleDistributionRule>,
    pub word_pairs: Vec<WordPair>,
}

impl GameConfiguration {
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn is_game(&self, id: &str) -> bool {
        self.game_id.as_deref() == Some(id)
    }

    /// Cards dealt to each player; top-level value first, then the
    /// distribution block, else one.
    pub fn cards_per_player(&self) -> usize {
        self.cards_per_player.or(self.game_schema.distribution.cards_per_player).unwrap_or(1)
    }

    pub fn deck_type(&self) -> DeckType {
        self.game_schema.distribution.deck_type
    }

    pub fn blinds(&self) -> (u64, u64) {
        (
            self.small_blind.unwrap_or(DEFAULT_SMALL_BLIND),
            self.big_blind.unwrap_or(DEFAULT_BIG_BLIND),
        )
    }

    pub fn starting_chips(&self) -> u64 {
        self.initial_items
            .get("chips")
            .and_then(|&c| u64::try_from(c).ok())
            .unwrap_or(DEFAULT_STARTING_CHIPS)
    }

    pub fn win_conditions(&self) -> &[WinCondition] {
        &self.game_schema.win_conditions
    }

    pub fn validate_roster(&self, players: usize) -> Result<(), ConfigError> {
        let min = self.min_players.unwrap_or(1);
        let max = self.max_players.unwrap_or(usize::MAX);
        if players < min.max(1) || players > max {
            return Err(ConfigError::PlayerCount { min: min.max(1), max, got: players });
        }
        Ok(())
    }
}
