//! Engine boundary. Hosts hand every submission to `apply_action` together with
//! the stored state and persist whatever comes back; nothing here holds state
//! between calls.

use crate::action::{ActionError, Submission};
use crate::betting::BettingState;
use crate::cards::CardParseError;
use crate::config::{ConfigError, DeckType, GameConfiguration};
use crate::deal::{DealError, Seed};
use crate::elimination::EliminationState;
use crate::evaluator::EvalError;
use crate::pending::PendingAction;
use crate::phases::PhaseState;
use crate::player::PlayerId;
use crate::presets::{TEXAS_HOLDEM, UNDERCOVER};
use crate::win::{WinCondition, WinOutcome};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fatal setup problems. Retrying with the same inputs fails the same way.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Deal(#[from] DealError),
    #[error("deck card is not a playing card: {0}")]
    Card(#[from] CardParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error("a game needs at least one player")]
    NoPlayers,
    #[error("{players} players need {needed} cards but the deck holds {deck}")]
    TooManyPlayers { players: usize, needed: usize, deck: usize },
    #[error("no deterministic engine for '{0}'")]
    Unsupported(String),
}

/// The families of games the engine can run without an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameFamily {
    Poker,
    SocialDeduction,
    Generic,
}

impl GameFamily {
    /// Pick the family for a configuration, or `None` when the game has to be
    /// run by an agent.
    pub fn detect(config: &GameConfiguration) -> Option<GameFamily> {
        let compares_hands = config.win_conditions().iter().any(|c| *c == WinCondition::HandCompare);
        if config.is_game(TEXAS_HOLDEM) || (config.deck_type() == DeckType::Standard52 && compares_hands) {
            return Some(GameFamily::Poker);
        }
        if config.is_game(UNDERCOVER) || !config.role_distribution_rules.is_empty() {
            return Some(GameFamily::SocialDeduction);
        }
        let schema = config.game_schema.normalize();
        if !schema.phases.is_empty() && schema.validate().is_ok() {
            return Some(GameFamily::Generic);
        }
        None
    }
}

/// A state machine for one game family.
pub trait GameMachine: Sized {
    /// The request the game is waiting on; `None` once it is over.
    fn pending(&self) -> Option<PendingAction>;

    fn outcome(&self) -> Option<&WinOutcome>;

    /// The state after `submission`, leaving `self` untouched.
    fn apply(&self, submission: &Submission) -> Result<Self, ActionError>;
}

impl GameMachine for BettingState {
    fn pending(&self) -> Option<PendingAction> {
        self.pending()
    }
    fn outcome(&self) -> Option<&WinOutcome> {
        self.outcome()
    }
    fn apply(&self, submission: &Submission) -> Result<Self, ActionError> {
        self.apply(submission)
    }
}

impl GameMachine for EliminationState {
    fn pending(&self) -> Option<PendingAction> {
        self.pending()
    }
    fn outcome(&self) -> Option<&WinOutcome> {
        self.outcome()
    }
    fn apply(&self, submission: &Submission) -> Result<Self, ActionError> {
        self.apply(submission)
    }
}

impl GameMachine for PhaseState {
    fn pending(&self) -> Option<PendingAction> {
        self.pending()
    }
    fn outcome(&self) -> Option<&WinOutcome> {
        self.outcome()
    }
    fn apply(&self, submission: &Submission) -> Result<Self, ActionError> {
        self.apply(submission)
    }
}

/// Serializable state of a running game.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "family", content = "state", rename_all = "snake_case")]
pub enum GameState {
    Poker(BettingState),
    SocialDeduction(EliminationState),
    Generic(PhaseState),
}

impl GameState {
    pub fn family(&self) -> GameFamily {
        match self {
            GameState::Poker(_) => GameFamily::Poker,
            GameState::SocialDeduction(_) => GameFamily::SocialDeduction,
            GameState::Generic(_) => GameFamily::Generic,
        }
    }
}

impl GameMachine for GameState {
    fn pending(&self) -> Option<PendingAction> {
        match self {
            GameState::Poker(s) => s.pending(),
            GameState::SocialDeduction(s) => s.pending(),
            GameState::Generic(s) => s.pending(),
        }
    }

    fn outcome(&self) -> Option<&WinOutcome> {
        match self {
            GameState::Poker(s) => s.outcome(),
            GameState::SocialDeduction(s) => s.outcome(),
            GameState::Generic(s) => s.outcome(),
        }
    }

    fn apply(&self, submission: &Submission) -> Result<Self, ActionError> {
        Ok(match self {
            GameState::Poker(s) => GameState::Poker(s.apply(submission)?),
            GameState::SocialDeduction(s) => GameState::SocialDeduction(s.apply(submission)?),
            GameState::Generic(s) => GameState::Generic(s.apply(submission)?),
        })
    }
}

/// Who is seated and how the deal is seeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSetup {
    pub players: Vec<PlayerId>,
    pub seed: Seed,
    /// Per-player chip overrides; others get the configured starting chips.
    #[serde(default)]
    pub stacks: BTreeMap<PlayerId, u64>,
}

impl RoomSetup {
    pub fn new(players: Vec<PlayerId>, seed: impl Into<Seed>) -> Self {
        Self { players, seed: seed.into(), stacks: BTreeMap::new() }
    }

    pub fn with_stack(mut self, player: impl Into<PlayerId>, chips: u64) -> Self {
        self.stacks.insert(player.into(), chips);
        self
    }

    fn stacks_for(&self, config: &GameConfiguration) -> Vec<(PlayerId, u64)> {
        let default = config.starting_chips();
        self.players
            .iter()
            .map(|p| (p.clone(), self.stacks.get(p).copied().unwrap_or(default)))
            .collect()
    }
}

/// A new state and what it asks for next.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition {
    pub state: GameState,
    pub pending: Option<PendingAction>,
    pub outcome: Option<WinOutcome>,
}

impl Transition {
    fn of(state: GameState) -> Self {
        let pending = state.pending();
        let outcome = state.outcome().cloned();
        Transition { state, pending, outcome }
    }
}

/// A refused submission. The state did not change; `pending` is the same
/// request again with the reason attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub error: ActionError,
    pub pending: Option<PendingAction>,
}

/// Detect the family, deal and return the opening request.
pub fn start_game(config: &GameConfiguration, setup: &RoomSetup) -> Result<Transition, EngineError> {
    config.validate_roster(setup.players.len())?;
    let family = GameFamily::detect(config).ok_or_else(|| {
        let name = if config.game_name.is_empty() {
            config.game_id.clone().unwrap_or_default()
        } else {
            config.game_name.clone()
        };
        warn!("no engine for '{name}', handing the game to the agent");
        EngineError::Unsupported(name)
    })?;
    let state = match family {
        GameFamily::Poker => GameState::Poker(BettingState::start(config, &setup.stacks_for(config), &setup.seed)?),
        GameFamily::SocialDeduction => {
            GameState::SocialDeduction(EliminationState::start(config, &setup.players, &setup.seed)?)
        }
        GameFamily::Generic => GameState::Generic(PhaseState::start(config, &setup.players, &setup.seed)?),
    };
    info!("started {family:?} game for {} players", setup.players.len());
    Ok(Transition::of(state))
}

/// Apply one submission: `(state, action) -> state'`.
pub fn apply_action(state: &GameState, submission: &Submission) -> Result<Transition, Rejection> {
    match state.apply(submission) {
        Ok(next) => Ok(Transition::of(next)),
        Err(error) => {
            warn!("rejected {} from {}: {error}", submission.action, submission.player);
            let pending = state.pending().map(|p| p.with_note(error.to_string()));
            Err(Rejection { error, pending })
        }
    }
}
