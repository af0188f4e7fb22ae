//! Declarative win conditions and the evaluator that runs them against any
//! game state exposing a [`WinView`].

use crate::cards::Card;
use crate::evaluator::{evaluate_showdown, EvalError};
use crate::player::PlayerId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const DEFAULT_CIVILIAN_ROLE: &str = "civilian";
const DEFAULT_SPY_ROLE: &str = "spy";
const DEFAULT_RESOURCE: &str = "score";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WinConditionError {
    #[error("score_threshold needs a numeric threshold")]
    MissingThreshold,
    #[error("win condition params must be an object")]
    Params,
}

/// One entry of `win_conditions`, tried in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWinCondition", into = "RawWinCondition")]
pub enum WinCondition {
    /// Exactly one roster player neither folded nor eliminated.
    LastStanding,
    /// Team play by role name: no spies left, or spies reach parity.
    RoleElimination { civilians: String, spies: String },
    /// Best poker hand among the contenders.
    HandCompare,
    /// First player whose `resource` reaches `threshold`.
    ScoreThreshold { threshold: i64, resource: String },
    /// Whoever received the most votes.
    VoteMajority,
    /// Anything else; never decided here.
    Custom { kind: String, params: Value },
}

/// `{"type": ..., "params": {...}}` as written by the rule parser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawWinCondition {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub params: Value,
}

fn param_str(params: &Map<String, Value>, key: &str, default: &str) -> String {
    params.get(key).and_then(Value::as_str).unwrap_or(default).to_string()
}

fn param_int(params: &Map<String, Value>, key: &str) -> Option<i64> {
    let v = params.get(key)?;
    v.as_i64()
        .or_else(|| v.as_f64().map(|f| f.ceil() as i64))
        .or_else(|| v.as_str()?.trim().parse().ok())
}

impl TryFrom<RawWinCondition> for WinCondition {
    type Error = WinConditionError;

    fn try_from(raw: RawWinCondition) -> Result<Self, Self::Error> {
        let params = match &raw.params {
            Value::Null => Map::new(),
            Value::Object(m) => m.clone(),
            _ => return Err(WinConditionError::Params),
        };
        let wc = match raw.kind.as_str() {
            "last_standing" => WinCondition::LastStanding,
            "role_elimination" => WinCondition::RoleElimination {
                civilians: param_str(&params, "civilians", DEFAULT_CIVILIAN_ROLE),
                spies: param_str(&params, "spies", DEFAULT_SPY_ROLE),
            },
            "hand_compare" => WinCondition::HandCompare,
            "score_threshold" => WinCondition::ScoreThreshold {
                threshold: param_int(&params, "threshold")
                    .or_else(|| param_int(&params, "score"))
                    .ok_or(WinConditionError::MissingThreshold)?,
                resource: param_str(&params, "resource", DEFAULT_RESOURCE),
            },
            "vote_majority" => WinCondition::VoteMajority,
            _ => WinCondition::Custom { kind: raw.kind, params: raw.params },
        };
        Ok(wc)
    }
}

impl From<WinCondition> for RawWinCondition {
    fn from(wc: WinCondition) -> Self {
        let (kind, params) = match wc {
            WinCondition::LastStanding => ("last_standing".to_string(), Value::Object(Map::new())),
            WinCondition::RoleElimination { civilians, spies } => (
                "role_elimination".to_string(),
                serde_json::json!({ "civilians": civilians, "spies": spies }),
            ),
            WinCondition::HandCompare => ("hand_compare".to_string(), Value::Object(Map::new())),
            WinCondition::ScoreThreshold { threshold, resource } => (
                "score_threshold".to_string(),
                serde_json::json!({ "threshold": threshold, "resource": resource }),
            ),
            WinCondition::VoteMajority => ("vote_majority".to_string(), Value::Object(Map::new())),
            WinCondition::Custom { kind, params } => (kind, params),
        };
        RawWinCondition { kind, params }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinReason {
    LastStanding,
    RoleElimination,
    HandCompare,
    ScoreThreshold,
    VoteMajority,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinOutcome {
    pub winners: Vec<PlayerId>,
    /// Winning side for team conditions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    pub reason: WinReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hand_name: Option<String>,
    pub message: String,
}

impl WinOutcome {
    fn new(winners: Vec<PlayerId>, reason: WinReason, message: impl Into<String>) -> Self {
        Self { winners, team: None, reason, hand_name: None, message: message.into() }
    }
}

/// Read-only facts a win condition may look at.
pub trait WinView {
    fn roster(&self) -> &[PlayerId];

    /// Folded or eliminated.
    fn is_out(&self, player: &PlayerId) -> bool;

    fn role_of(&self, _player: &PlayerId) -> Option<&str> {
        None
    }

    /// Private cards of everyone still contesting the pot.
    fn showdown_hands(&self) -> Vec<(PlayerId, Vec<Card>)> {
        Vec::new()
    }

    fn community(&self) -> &[Card] {
        &[]
    }

    fn score(&self, _player: &PlayerId, _resource: &str) -> Option<i64> {
        None
    }

    /// `(voter, target)` pairs.
    fn votes(&self) -> Vec<(PlayerId, PlayerId)> {
        Vec::new()
    }
}

/// Most-voted target and its count. Ties go to whoever comes first in
/// `roster`; targets outside the roster are ignored.
///
/// ```
/// use tabletop_engine::player::{roster, PlayerId};
/// use tabletop_engine::win::plurality;
///
/// let players = roster(["a", "b", "c"]);
/// let votes = [PlayerId::from("c"), PlayerId::from("b"), PlayerId::from("c"), PlayerId::from("b")];
/// assert_eq!(plurality(&players, votes.iter()), Some((PlayerId::from("b"), 2)));
/// ```
pub fn plurality<'a, I>(roster: &[PlayerId], targets: I) -> Option<(PlayerId, usize)>
where
    I: IntoIterator<Item = &'a PlayerId>,
{
    let mut tally = vec![0usize; roster.len()];
    for t in targets {
        if let Some(i) = roster.iter().position(|p| p == t) {
            tally[i] += 1;
        }
    }
    let max = tally.iter().copied().max().filter(|&m| m > 0)?;
    let i = tally.iter().position(|&c| c == max)?;
    Some((roster[i].clone(), max))
}

fn survivors<V: WinView + ?Sized>(view: &V) -> Vec<&PlayerId> {
    view.roster().iter().filter(|p| !view.is_out(p)).collect()
}

fn last_standing<V: WinView + ?Sized>(view: &V) -> Option<WinOutcome> {
    match survivors(view).as_slice() {
        [only] => Some(WinOutcome::new(
            vec![(*only).clone()],
            WinReason::LastStanding,
            format!("{only} is the last player standing"),
        )),
        _ => None,
    }
}

fn role_elimination<V: WinView + ?Sized>(view: &V, civilians: &str, spies: &str) -> Option<WinOutcome> {
    let alive = survivors(view);
    let count = |role: &str| alive.iter().filter(|p| view.role_of(p) == Some(role)).count();
    let (alive_civilians, alive_spies) = (count(civilians), count(spies));

    let (role, team, message) = if alive_spies == 0 {
        (civilians, "civilians", "every spy has been found")
    } else if alive_civilians <= alive_spies {
        (spies, "spies", "the spies held out")
    } else {
        return None;
    };
    let winners =
        view.roster().iter().filter(|p| view.role_of(p) == Some(role)).cloned().collect();
    Some(WinOutcome {
        team: Some(team.to_string()),
        ..WinOutcome::new(winners, WinReason::RoleElimination, message)
    })
}

fn hand_compare<V: WinView + ?Sized>(view: &V) -> Result<Option<WinOutcome>, EvalError> {
    let hands = view.showdown_hands();
    if hands.len() < 2 {
        return Ok(None);
    }
    let showdown = evaluate_showdown(&hands, view.community())?;
    if showdown.winners.is_empty() {
        return Ok(None);
    }
    let message = if showdown.winners.len() == 1 {
        format!("showdown won with {}", showdown.hand_name)
    } else {
        format!("showdown tied on {}, pot split", showdown.hand_name)
    };
    Ok(Some(WinOutcome {
        hand_name: Some(showdown.hand_name),
        ..WinOutcome::new(showdown.winners, WinReason::HandCompare, message)
    }))
}

fn score_threshold<V: WinView + ?Sized>(view: &V, threshold: i64, resource: &str) -> Option<WinOutcome> {
    let p = view.roster().iter().find(|p| view.score(p, resource).is_some_and(|s| s >= threshold))?;
    Some(WinOutcome::new(
        vec![p.clone()],
        WinReason::ScoreThreshold,
        format!("{p} reached {threshold} {resource}"),
    ))
}

fn vote_majority<V: WinView + ?Sized>(view: &V) -> Option<WinOutcome> {
    let votes = view.votes();
    let (p, n) = plurality(view.roster(), votes.iter().map(|(_, t)| t))?;
    Some(WinOutcome::new(vec![p.clone()], WinReason::VoteMajority, format!("{p} drew the most votes ({n})")))
}

/// Try each condition in order; the first one that decides wins.
pub fn evaluate<V: WinView + ?Sized>(
    view: &V,
    conditions: &[WinCondition],
) -> Result<Option<WinOutcome>, EvalError> {
    for wc in conditions {
        let outcome = match wc {
            WinCondition::LastStanding => last_standing(view),
            WinCondition::RoleElimination { civilians, spies } => role_elimination(view, civilians, spies),
            WinCondition::HandCompare => hand_compare(view)?,
            WinCondition::ScoreThreshold { threshold, resource } => score_threshold(view, *threshold, resource),
            WinCondition::VoteMajority => vote_majority(view),
            WinCondition::Custom { .. } => None,
        };
        if outcome.is_some() {
            return Ok(outcome);
        }
    }
    Ok(None)
}
