//! Walks a declared phase graph for games that are neither poker nor
//! social deduction.

use crate::action::{Action, ActionError, Submission};
use crate::config::{ActionDef, ActionTarget, GameConfiguration, GameSchema, OptionDef, PhaseDef, PhaseTrigger};
use crate::deal::{deal, Seed};
use crate::deck::{can_build_deck, DeckCard};
use crate::engine::EngineError;
use crate::pending::{Choice, PendingAction};
use crate::player::PlayerId;
use crate::win::{self, WinCondition, WinOutcome, WinView};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const INPUT_MIN: u64 = 0;
pub const INPUT_MAX: u64 = 9999;
pub const INPUT_STEP: u64 = 1;

/// A player's answer within the current phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Answer {
    Option(String),
    Number(u64),
    Vote(PlayerId),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseState {
    pub(crate) roster: Vec<PlayerId>,
    pub(crate) schema: GameSchema,
    pub(crate) phase_id: String,
    /// Phases entered so far, the first one included.
    pub(crate) transitions: u32,
    pub(crate) current: usize,
    pub(crate) hands: Vec<(PlayerId, Vec<DeckCard>)>,
    pub(crate) remainder: Vec<DeckCard>,
    /// Cards dealt face up by phases.
    pub(crate) table: Vec<DeckCard>,
    pub(crate) answers: BTreeMap<PlayerId, Answer>,
    pub(crate) votes: BTreeMap<PlayerId, PlayerId>,
    pub(crate) scores: BTreeMap<PlayerId, BTreeMap<String, i64>>,
    pub(crate) win_conditions: Vec<WinCondition>,
    pub(crate) finished: bool,
    pub(crate) outcome: Option<WinOutcome>,
}

impl PhaseState {
    pub fn start(config: &GameConfiguration, players: &[PlayerId], seed: &Seed) -> Result<Self, EngineError> {
        if players.is_empty() {
            return Err(EngineError::NoPlayers);
        }
        let schema = config.game_schema.normalize();
        schema.validate()?;
        let first = schema.phases.first().map(|p| p.id.clone()).unwrap_or_default();

        let (hands, remainder) = if can_build_deck(config) {
            let dealt = deal(config, players, seed)?;
            (dealt.hands, dealt.remainder)
        } else {
            (players.iter().map(|p| (p.clone(), Vec::new())).collect(), Vec::new())
        };
        let scores = players.iter().map(|p| (p.clone(), config.initial_items.clone())).collect();

        let mut state = PhaseState {
            roster: players.to_vec(),
            win_conditions: schema.win_conditions.clone(),
            schema,
            phase_id: first,
            transitions: 0,
            current: 0,
            hands,
            remainder,
            table: Vec::new(),
            answers: BTreeMap::new(),
            votes: BTreeMap::new(),
            scores,
            finished: false,
            outcome: None,
        };
        state.enter_phase();
        Ok(state)
    }

    pub fn phase(&self) -> Option<&PhaseDef> {
        self.schema.phase(&self.phase_id)
    }

    pub fn phase_id(&self) -> &str {
        &self.phase_id
    }

    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    /// Player whose turn it is in current-player phases.
    pub fn current_player(&self) -> &PlayerId {
        &self.roster[self.current % self.roster.len()]
    }

    pub fn hand(&self, player: &str) -> Option<&[DeckCard]> {
        self.hands.iter().find(|(p, _)| p.as_str() == player).map(|(_, h)| h.as_slice())
    }

    pub fn table(&self) -> &[DeckCard] {
        &self.table
    }

    pub fn remainder(&self) -> &[DeckCard] {
        &self.remainder
    }

    pub fn answers(&self) -> &BTreeMap<PlayerId, Answer> {
        &self.answers
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn outcome(&self) -> Option<&WinOutcome> {
        self.outcome.as_ref()
    }

    fn host(&self) -> &PlayerId {
        &self.roster[0]
    }

    fn action(&self) -> Option<&ActionDef> {
        self.schema.action_for(&self.phase_id)
    }

    fn trigger(&self) -> PhaseTrigger {
        self.phase().map(|p| p.trigger).unwrap_or_default()
    }

    /// Everyone expected to answer in this phase, answered or not.
    fn expected(&self, def: &ActionDef) -> Vec<PlayerId> {
        match def.target {
            ActionTarget::CurrentPlayer => vec![self.current_player().clone()],
            ActionTarget::FirstPlayer => vec![self.host().clone()],
            ActionTarget::AllPlayers => self.roster.clone(),
        }
    }

    fn numeric(def: &ActionDef) -> Option<&OptionDef> {
        def.options.iter().find(|o| o.is_numeric())
    }

    fn input_bounds(option: &OptionDef) -> (u64, u64, u64) {
        (
            option.min.unwrap_or(INPUT_MIN),
            option.max.unwrap_or(INPUT_MAX),
            option.step.unwrap_or(INPUT_STEP).max(1),
        )
    }

    pub fn pending(&self) -> Option<PendingAction> {
        if self.finished {
            return None;
        }
        let name = self.phase().map(|p| p.name.as_str()).unwrap_or(self.phase_id.as_str());
        let Some(def) = self.action() else {
            return Some(PendingAction::confirm(self.host().clone(), name, format!("Continue after {name}")));
        };
        let waiting: Vec<PlayerId> =
            self.expected(def).into_iter().filter(|p| !self.answers.contains_key(p)).collect();
        if waiting.is_empty() {
            // answers are in, the host moves on
            return Some(PendingAction::confirm(self.host().clone(), name, format!("Continue after {name}")));
        }
        if let Some(option) = Self::numeric(def) {
            let (min, max, step) = Self::input_bounds(option);
            return Some(PendingAction::input(waiting, option.display(), min, max, step));
        }
        let options = def.options.iter().map(|o| Choice::new(o.key(), o.display())).collect();
        Some(PendingAction::select(waiting, name, options))
    }

    pub fn apply(&self, submission: &Submission) -> Result<Self, ActionError> {
        if self.finished {
            return Err(ActionError::GameOver);
        }
        let player = &submission.player;
        if !self.roster.contains(player) {
            return Err(ActionError::UnknownPlayer(player.clone()));
        }
        let mut next = self.clone();
        if submission.action == Action::Advance {
            if player != self.host() {
                return Err(ActionError::NotYourTurn(player.clone()));
            }
            let answered = self.action().map_or(true, |def| {
                self.expected(def).iter().all(|p| self.answers.contains_key(p))
            });
            if !answered && self.trigger() == PhaseTrigger::AllActed {
                return Err(ActionError::WrongPhase("advance".to_string()));
            }
            next.advance();
            return Ok(next);
        }

        let def = self.action().ok_or_else(|| ActionError::WrongPhase(submission.action.verb().to_string()))?;
        if !self.expected(def).contains(player) {
            return Err(ActionError::NotYourTurn(player.clone()));
        }
        let answer = match &submission.action {
            Action::Select { option } => {
                if !def.options.iter().any(|o| !o.is_numeric() && o.key() == option) {
                    return Err(ActionError::UnknownOption(option.clone()));
                }
                Answer::Option(option.clone())
            }
            Action::Input { value } => {
                let option = Self::numeric(def).ok_or_else(|| ActionError::WrongPhase("input".to_string()))?;
                let (min, max, _) = Self::input_bounds(option);
                if *value < min || *value > max {
                    return Err(ActionError::AmountOutOfRange { min, max, got: *value });
                }
                Answer::Number(*value)
            }
            Action::Vote { target } => {
                if !self.roster.contains(target) {
                    return Err(ActionError::InvalidTarget(target.clone()));
                }
                next.votes.insert(player.clone(), target.clone());
                Answer::Vote(target.clone())
            }
            other => return Err(ActionError::Unsupported(other.verb().to_string())),
        };
        next.answers.insert(player.clone(), answer);

        let done = next.expected(def).iter().all(|p| next.answers.contains_key(p));
        let waits_for_host = matches!(self.trigger(), PhaseTrigger::HostConfirm | PhaseTrigger::Timer);
        if done && !waits_for_host {
            next.advance();
        }
        Ok(next)
    }

    /// Set a player's tally for a resource and re-check the win conditions.
    pub fn record_score(&self, player: &PlayerId, resource: &str, value: i64) -> Result<Self, ActionError> {
        if self.finished {
            return Err(ActionError::GameOver);
        }
        if !self.roster.contains(player) {
            return Err(ActionError::UnknownPlayer(player.clone()));
        }
        let mut next = self.clone();
        next.scores.entry(player.clone()).or_default().insert(resource.to_string(), value);
        next.check_win();
        Ok(next)
    }

    fn enter_phase(&mut self) {
        self.transitions += 1;
        let count = self.phase().map_or(0, |p| p.deal_count);
        let dealt: Vec<DeckCard> = self.remainder.drain(..count.min(self.remainder.len())).collect();
        if !dealt.is_empty() {
            debug!("phase {} deals {} card(s) to the table", self.phase_id, dealt.len());
        }
        self.table.extend(dealt);
    }

    fn advance(&mut self) {
        if self.action().is_some_and(|d| d.target == ActionTarget::CurrentPlayer) {
            self.current = (self.current + 1) % self.roster.len();
        }
        match self.phase().and_then(|p| p.next.first()).cloned() {
            Some(next) => {
                debug!("phase {} -> {next}", self.phase_id);
                self.phase_id = next;
                self.enter_phase();
                self.check_win();
            }
            None => {
                self.check_win();
                self.finished = true;
                info!("final phase {} reached", self.phase_id);
            }
        }
        self.answers.clear();
        self.votes.clear();
    }

    fn check_win(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        if let Ok(Some(outcome)) = win::evaluate(&*self, &self.win_conditions) {
            info!("game over: {}", outcome.message);
            self.outcome = Some(outcome);
            self.finished = true;
        }
    }
}

impl WinView for PhaseState {
    fn roster(&self) -> &[PlayerId] {
        &self.roster
    }

    fn is_out(&self, _player: &PlayerId) -> bool {
        false
    }

    fn score(&self, player: &PlayerId, resource: &str) -> Option<i64> {
        self.scores.get(player)?.get(resource).copied()
    }

    fn votes(&self) -> Vec<(PlayerId, PlayerId)> {
        self.votes.iter().map(|(v, t)| (v.clone(), t.clone())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolEntry;
    use crate::pending::PendingKind;
    use crate::player::roster;

    fn phase(id: &str, next: &[&str]) -> PhaseDef {
        PhaseDef {
            id: id.to_string(),
            name: id.to_uppercase(),
            next: next.iter().map(|s| s.to_string()).collect(),
            ..PhaseDef::default()
        }
    }

    fn option(id: &str) -> OptionDef {
        OptionDef { id: id.to_string(), label: id.to_string(), ..OptionDef::default() }
    }

    fn quiz() -> GameConfiguration {
        let mut bid = option("bid");
        bid.input_type = Some("number".to_string());
        bid.max = Some(100);
        GameConfiguration {
            game_name: "Quiz".to_string(),
            roles: vec![PoolEntry::new("Token", 8, "")],
            game_schema: GameSchema {
                phases: vec![
                    PhaseDef { deal_count: 2, ..phase("setup", &["pick"]) },
                    phase("pick", &["bid"]),
                    phase("bid", &["accuse"]),
                    phase("accuse", &[]),
                ],
                actions: vec![
                    ActionDef {
                        phase_id: "pick".to_string(),
                        options: vec![option("left"), option("right")],
                        target: ActionTarget::CurrentPlayer,
                    },
                    ActionDef { phase_id: "bid".to_string(), options: vec![bid], target: ActionTarget::AllPlayers },
                    ActionDef {
                        phase_id: "accuse".to_string(),
                        options: vec![option("vote")],
                        target: ActionTarget::AllPlayers,
                    },
                ],
                win_conditions: vec![WinCondition::ScoreThreshold { threshold: 10, resource: "score".to_string() }],
                ..GameSchema::default()
            },
            ..GameConfiguration::default()
        }
    }

    fn submit(state: &PhaseState, player: &str, action: Action) -> Result<PhaseState, ActionError> {
        state.apply(&Submission::new(player, action))
    }

    #[test]
    fn first_phase_deals_to_the_table() {
        let s = PhaseState::start(&quiz(), &roster(["a", "b"]), &Seed::from("q")).unwrap();
        assert_eq!(s.phase_id(), "setup");
        assert_eq!(s.table().len(), 2);
        assert_eq!(s.hand("a").unwrap().len(), 1);
        assert_eq!(s.remainder().len(), 4);
        assert!(matches!(s.pending().unwrap().kind, PendingKind::Confirm { .. }));
    }

    #[test]
    fn walks_select_input_and_vote_phases() {
        let s = PhaseState::start(&quiz(), &roster(["a", "b"]), &Seed::from("q")).unwrap();
        assert_eq!(submit(&s, "b", Action::Advance).unwrap_err(), ActionError::NotYourTurn("b".into()));
        let s = submit(&s, "a", Action::Advance).unwrap();
        assert_eq!(s.phase_id(), "pick");
        assert_eq!(s.pending().unwrap().targets, roster(["a"]));

        let bad = Action::Select { option: "middle".to_string() };
        assert_eq!(submit(&s, "a", bad).unwrap_err(), ActionError::UnknownOption("middle".into()));
        let s = submit(&s, "a", Action::Select { option: "left".to_string() }).unwrap();
        assert_eq!(s.phase_id(), "bid");
        assert_eq!(s.current_player().as_str(), "b");

        let pending = s.pending().unwrap();
        assert_eq!(pending.kind, PendingKind::Input { min: 0, max: 100, step: 1 });
        assert_eq!(
            submit(&s, "a", Action::Input { value: 101 }).unwrap_err(),
            ActionError::AmountOutOfRange { min: 0, max: 100, got: 101 }
        );
        let s = submit(&s, "a", Action::Input { value: 40 }).unwrap();
        assert_eq!(s.pending().unwrap().targets, roster(["b"]));
        let s = submit(&s, "b", Action::Input { value: 7 }).unwrap();
        assert_eq!(s.phase_id(), "accuse");

        let s = submit(&s, "a", Action::Vote { target: "b".into() }).unwrap();
        let s = submit(&s, "b", Action::Vote { target: "a".into() }).unwrap();
        assert!(s.is_finished());
        assert!(s.outcome().is_none());
        assert_eq!(submit(&s, "a", Action::Advance).unwrap_err(), ActionError::GameOver);
    }

    #[test]
    fn recorded_scores_decide_the_game() {
        let s = PhaseState::start(&quiz(), &roster(["a", "b"]), &Seed::from("q")).unwrap();
        let s = s.record_score(&"b".into(), "score", 4).unwrap();
        assert!(s.outcome().is_none());
        let s = s.record_score(&"b".into(), "score", 12).unwrap();
        assert_eq!(s.outcome().unwrap().winners, roster(["b"]));
        assert!(s.pending().is_none());
    }

    #[test]
    fn schemas_without_win_conditions_are_refused() {
        let mut cfg = quiz();
        cfg.game_schema.win_conditions.clear();
        let err = PhaseState::start(&cfg, &roster(["a"]), &Seed::from("q")).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }
}
