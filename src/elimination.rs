//! Social-deduction rounds: describe, vote, eliminate, until a side wins.

use crate::action::{Action, ActionError, Submission};
use crate::config::{GameConfiguration, WordPair};
use crate::deal::{deal_roles, Role, RoleAssignment, RoleDeal, Seed};
use crate::engine::EngineError;
use crate::pending::{Choice, PendingAction};
use crate::player::PlayerId;
use crate::presets::WORD_PAIRS;
use crate::win::{self, plurality, WinCondition, WinOutcome, WinReason, WinView};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VotePhase {
    Description,
    Voting,
    Resolved,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EliminationState {
    pub(crate) roster: Vec<PlayerId>,
    pub(crate) roles: RoleDeal,
    /// In elimination order.
    pub(crate) eliminated: Vec<PlayerId>,
    pub(crate) round: u32,
    pub(crate) phase: VotePhase,
    /// Voter to target for the current round.
    pub(crate) votes: BTreeMap<PlayerId, PlayerId>,
    pub(crate) last_tally: Vec<(PlayerId, usize)>,
    pub(crate) win_conditions: Vec<WinCondition>,
    pub(crate) outcome: Option<WinOutcome>,
}

impl EliminationState {
    pub fn start(config: &GameConfiguration, players: &[PlayerId], seed: &Seed) -> Result<Self, EngineError> {
        if players.is_empty() {
            return Err(EngineError::NoPlayers);
        }
        let pairs: Vec<WordPair> = if config.word_pairs.is_empty() {
            WORD_PAIRS.iter().map(|(c, s)| WordPair::new(*c, *s)).collect()
        } else {
            config.word_pairs.clone()
        };
        let roles = deal_roles(config, players, seed, &pairs);
        let win_conditions = match config.win_conditions() {
            [] => vec![WinCondition::RoleElimination {
                civilians: Role::Civilian.as_str().to_string(),
                spies: Role::Spy.as_str().to_string(),
            }],
            conditions => conditions.to_vec(),
        };
        debug!("elimination game with {} players, seed {seed}", players.len());
        Ok(EliminationState {
            roster: players.to_vec(),
            roles,
            eliminated: Vec::new(),
            round: 1,
            phase: VotePhase::Description,
            votes: BTreeMap::new(),
            last_tally: Vec::new(),
            win_conditions,
            outcome: None,
        })
    }

    pub fn phase(&self) -> VotePhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn eliminated(&self) -> &[PlayerId] {
        &self.eliminated
    }

    pub fn roles(&self) -> &RoleDeal {
        &self.roles
    }

    pub fn assignment(&self, player: &str) -> Option<&RoleAssignment> {
        self.roles.role_of(player)
    }

    pub fn votes(&self) -> &BTreeMap<PlayerId, PlayerId> {
        &self.votes
    }

    /// Counts from the most recent completed vote, in roster order.
    pub fn last_tally(&self) -> &[(PlayerId, usize)] {
        &self.last_tally
    }

    pub fn outcome(&self) -> Option<&WinOutcome> {
        self.outcome.as_ref()
    }

    pub fn survivors(&self) -> Vec<PlayerId> {
        self.roster.iter().filter(|p| !self.eliminated.contains(p)).cloned().collect()
    }

    /// First surviving player in roster order.
    pub fn host(&self) -> Option<&PlayerId> {
        self.roster.iter().find(|p| !self.eliminated.contains(p))
    }

    pub fn pending(&self) -> Option<PendingAction> {
        match self.phase {
            VotePhase::Resolved => None,
            VotePhase::Description => {
                let host = self.host()?.clone();
                Some(PendingAction::confirm(
                    host,
                    format!("Round {}: descriptions", self.round),
                    "Everyone describes their word, then the host starts the vote.",
                ))
            }
            VotePhase::Voting => {
                let survivors = self.survivors();
                let waiting: Vec<PlayerId> =
                    survivors.iter().filter(|p| !self.votes.contains_key(*p)).cloned().collect();
                let options = survivors.iter().map(|p| Choice::new(p.as_str(), p.as_str())).collect();
                Some(PendingAction::select(waiting, format!("Round {}: vote someone out", self.round), options))
            }
        }
    }

    pub fn apply(&self, submission: &Submission) -> Result<Self, ActionError> {
        let player = &submission.player;
        if self.phase == VotePhase::Resolved {
            return Err(ActionError::GameOver);
        }
        if !self.roster.contains(player) {
            return Err(ActionError::UnknownPlayer(player.clone()));
        }
        if self.eliminated.contains(player) {
            return Err(ActionError::Eliminated(player.clone()));
        }
        let mut next = self.clone();
        match (&submission.action, self.phase) {
            (Action::Advance, VotePhase::Description) => {
                if self.host() != Some(player) {
                    return Err(ActionError::NotYourTurn(player.clone()));
                }
                next.phase = VotePhase::Voting;
            }
            (Action::Vote { target }, VotePhase::Voting) => next.vote(player, target)?,
            (Action::Select { option }, VotePhase::Voting) => next.vote(player, &PlayerId::from(option.as_str()))?,
            (action, _) => return Err(ActionError::WrongPhase(action.verb().to_string())),
        }
        Ok(next)
    }

    fn vote(&mut self, voter: &PlayerId, target: &PlayerId) -> Result<(), ActionError> {
        if !self.roster.contains(target) || self.eliminated.contains(target) {
            return Err(ActionError::InvalidTarget(target.clone()));
        }
        self.votes.insert(voter.clone(), target.clone());
        let survivors = self.survivors();
        if survivors.iter().all(|p| self.votes.contains_key(p)) {
            self.resolve_vote(&survivors)?;
        }
        Ok(())
    }

    fn resolve_vote(&mut self, survivors: &[PlayerId]) -> Result<(), ActionError> {
        self.last_tally = survivors
            .iter()
            .map(|p| (p.clone(), self.votes.values().filter(|t| *t == p).count()))
            .collect();
        let Some((out, count)) = plurality(survivors, self.votes.values()) else {
            return Ok(());
        };
        info!("round {}: {out} eliminated with {count} votes", self.round);
        self.eliminated.push(out);

        let decided = win::evaluate(&*self, &self.win_conditions)
            .map_err(|e| ActionError::Inconsistent(e.to_string()))?;
        match decided.or_else(|| self.nobody_left_to_vote()) {
            Some(outcome) => {
                info!("game over: {}", outcome.message);
                self.outcome = Some(outcome);
                self.phase = VotePhase::Resolved;
            }
            None => {
                self.round += 1;
                self.votes.clear();
                self.phase = VotePhase::Description;
            }
        }
        Ok(())
    }

    /// Ends a game the configured conditions left open once fewer than two
    /// players can still vote.
    fn nobody_left_to_vote(&self) -> Option<WinOutcome> {
        let survivors = self.survivors();
        let message = match survivors.as_slice() {
            [] => "everyone was voted out".to_string(),
            [only] => format!("{only} is the last player standing"),
            _ => return None,
        };
        Some(WinOutcome { winners: survivors, team: None, reason: WinReason::LastStanding, hand_name: None, message })
    }
}

impl WinView for EliminationState {
    fn roster(&self) -> &[PlayerId] {
        &self.roster
    }

    fn is_out(&self, player: &PlayerId) -> bool {
        self.eliminated.contains(player)
    }

    fn role_of(&self, player: &PlayerId) -> Option<&str> {
        self.roles.role_of(player.as_str()).map(|a| a.role.as_str())
    }

    fn votes(&self) -> Vec<(PlayerId, PlayerId)> {
        self.votes.iter().map(|(v, t)| (v.clone(), t.clone())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pending::PendingKind;
    use crate::player::roster;

    fn spy_room() -> EliminationState {
        EliminationState::start(&GameConfiguration::undercover(), &roster(["a", "b", "c", "d"]), &Seed::from("spy-room"))
            .unwrap()
    }

    fn submit(state: &EliminationState, player: &str, action: Action) -> Result<EliminationState, ActionError> {
        state.apply(&Submission::new(player, action))
    }

    fn vote(target: &str) -> Action {
        Action::Vote { target: target.into() }
    }

    #[test]
    fn host_confirms_descriptions() {
        let s = spy_room();
        let pending = s.pending().unwrap();
        assert!(matches!(pending.kind, PendingKind::Confirm { .. }));
        assert_eq!(pending.targets, roster(["a"]));
        assert_eq!(submit(&s, "b", Action::Advance).unwrap_err(), ActionError::NotYourTurn("b".into()));
        assert_eq!(submit(&s, "a", vote("d")).unwrap_err(), ActionError::WrongPhase("vote".into()));
        let s = submit(&s, "a", Action::Advance).unwrap();
        assert_eq!(s.phase(), VotePhase::Voting);
    }

    #[test]
    fn voting_out_the_spy_ends_the_game_at_once() {
        let s = spy_room();
        assert_eq!(s.roles().count(Role::Spy), 1);
        assert_eq!(s.assignment("d").unwrap().role, Role::Spy);
        let mut s = submit(&s, "a", Action::Advance).unwrap();
        for voter in ["a", "b", "c", "d"] {
            s = submit(&s, voter, vote("d")).unwrap();
        }
        let outcome = s.outcome().unwrap();
        assert_eq!(outcome.team.as_deref(), Some("civilians"));
        assert_eq!(outcome.winners, roster(["a", "b", "c"]));
        assert_eq!(s.phase(), VotePhase::Resolved);
        assert_eq!(s.eliminated(), roster(["d"]).as_slice());
        assert_eq!(submit(&s, "a", Action::Advance).unwrap_err(), ActionError::GameOver);
    }

    #[test]
    fn missed_vote_starts_another_round() {
        let mut s = submit(&spy_room(), "a", Action::Advance).unwrap();
        s = submit(&s, "a", vote("b")).unwrap();
        // change of mind overwrites
        s = submit(&s, "a", vote("c")).unwrap();
        s = submit(&s, "b", vote("c")).unwrap();
        s = submit(&s, "c", vote("b")).unwrap();
        s = submit(&s, "d", vote("a")).unwrap();
        assert_eq!(s.eliminated(), roster(["c"]).as_slice());
        assert!(s.outcome().is_none());
        assert_eq!(s.round(), 2);
        assert_eq!(s.phase(), VotePhase::Description);
        assert!(s.votes().is_empty());
        assert_eq!(submit(&s, "c", Action::Advance).unwrap_err(), ActionError::Eliminated("c".into()));
        let s = submit(&s, "a", Action::Advance).unwrap();
        assert_eq!(submit(&s, "a", vote("c")).unwrap_err(), ActionError::InvalidTarget("c".into()));
        assert_eq!(s.pending().unwrap().targets, roster(["a", "b", "d"]));
    }

    #[test]
    fn tied_vote_eliminates_earliest_in_roster() {
        let mut s = submit(&spy_room(), "a", Action::Advance).unwrap();
        s = submit(&s, "a", vote("c")).unwrap();
        s = submit(&s, "b", vote("b")).unwrap();
        s = submit(&s, "c", vote("b")).unwrap();
        s = submit(&s, "d", vote("c")).unwrap();
        assert_eq!(s.eliminated(), roster(["b"]).as_slice());
        assert_eq!(s.last_tally()[1], (PlayerId::from("b"), 2));
    }

    #[test]
    fn strangers_are_refused() {
        let s = spy_room();
        assert_eq!(submit(&s, "zed", Action::Advance).unwrap_err(), ActionError::UnknownPlayer("zed".into()));
    }

    #[test]
    fn open_ended_games_stop_at_the_last_survivor() {
        let mut config = GameConfiguration::undercover();
        config.game_schema.win_conditions =
            vec![WinCondition::Custom { kind: "story_vote".into(), params: serde_json::Value::Null }];
        let players = roster(["a", "b", "c", "d"]);
        let mut s = EliminationState::start(&config, &players, &Seed::from("spy-room")).unwrap();
        for round in 1..=3 {
            assert_eq!(s.round(), round);
            let host = s.host().unwrap().clone();
            s = submit(&s, host.as_str(), Action::Advance).unwrap();
            for voter in s.survivors() {
                s = submit(&s, voter.as_str(), vote(host.as_str())).unwrap();
            }
        }
        assert_eq!(s.eliminated(), roster(["a", "b", "c"]).as_slice());
        assert_eq!(s.phase(), VotePhase::Resolved);
        assert!(s.pending().is_none());
        let outcome = s.outcome().unwrap();
        assert_eq!(outcome.winners, roster(["d"]));
        assert_eq!(outcome.reason, WinReason::LastStanding);
    }
}
