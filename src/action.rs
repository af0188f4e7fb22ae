//! The closed set of player inputs and why one can be refused.

use crate::player::PlayerId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Everything a player can submit, across all game families.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Fold,
    Check,
    Call,
    /// "Raise to" a street total. Without an amount the engine asks for one.
    Raise {
        #[serde(default)]
        amount: Option<u64>,
    },
    Vote {
        target: PlayerId,
    },
    Select {
        option: String,
    },
    Input {
        value: u64,
    },
    /// Host confirmation that moves the game to its next phase.
    Advance,
}

impl Action {
    pub fn verb(&self) -> &'static str {
        match self {
            Action::Fold => "fold",
            Action::Check => "check",
            Action::Call => "call",
            Action::Raise { .. } => "raise",
            Action::Vote { .. } => "vote",
            Action::Select { .. } => "select",
            Action::Input { .. } => "input",
            Action::Advance => "advance",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Raise { amount: Some(a) } => write!(f, "raise {a}"),
            Action::Vote { target } => write!(f, "vote {target}"),
            Action::Select { option } => write!(f, "select {option}"),
            Action::Input { value } => write!(f, "input {value}"),
            other => f.write_str(other.verb()),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionParseError {
    #[error("unknown action: '{0}'")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("invalid amount: '{0}'")]
    Amount(String),
}

fn amount(s: &str) -> Result<u64, ActionParseError> {
    s.parse().map_err(|_| ActionParseError::Amount(s.to_string()))
}

/// Parses the text form used by scripts: `fold`, `raise 60`, `vote bob`.
impl FromStr for Action {
    type Err = ActionParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let verb = parts.next().unwrap_or_default().to_ascii_lowercase();
        let arg = parts.next();
        let action = match (verb.as_str(), arg) {
            ("fold", _) => Action::Fold,
            ("check", _) => Action::Check,
            ("call", _) => Action::Call,
            ("raise", None) => Action::Raise { amount: None },
            ("raise", Some(a)) => Action::Raise { amount: Some(amount(a)?) },
            ("vote", Some(t)) => Action::Vote { target: PlayerId::from(t) },
            ("select", Some(o)) => Action::Select { option: o.to_string() },
            ("input", Some(v)) => Action::Input { value: amount(v)? },
            ("advance", _) => Action::Advance,
            ("vote", None) => return Err(ActionParseError::MissingArgument("vote")),
            ("select", None) => return Err(ActionParseError::MissingArgument("select")),
            ("input", None) => return Err(ActionParseError::MissingArgument("input")),
            _ => return Err(ActionParseError::Unknown(s.to_string())),
        };
        Ok(action)
    }
}

/// An action attributed to the player who sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub player: PlayerId,
    pub action: Action,
}

impl Submission {
    pub fn new(player: impl Into<PlayerId>, action: Action) -> Self {
        Self { player: player.into(), action }
    }
}

/// Why a submission was refused. The state is left untouched and the
/// player is asked again.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ActionError {
    #[error("it is not {0}'s turn")]
    NotYourTurn(PlayerId),
    #[error("the game is over")]
    GameOver,
    #[error("{0} is not allowed in this phase")]
    WrongPhase(String),
    #[error("cannot check while facing {to_call} to call")]
    CannotCheck { to_call: u64 },
    #[error("cannot raise: no chips beyond the current bet")]
    CannotRaise,
    #[error("a raise amount is required")]
    AmountRequired,
    #[error("amount {got} outside {min}..={max}")]
    AmountOutOfRange { min: u64, max: u64, got: u64 },
    #[error("{0} has been eliminated")]
    Eliminated(PlayerId),
    #[error("{0} is not in this game")]
    UnknownPlayer(PlayerId),
    #[error("{0} cannot be targeted")]
    InvalidTarget(PlayerId),
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("{0} is not supported by this game")]
    Unsupported(String),
    #[error("game state is inconsistent: {0}")]
    Inconsistent(String),
}
