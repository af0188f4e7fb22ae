//! No-limit hold'em betting for one hand: blinds, four streets, showdown
//! with side pots.

use crate::action::{Action, ActionError, Submission};
use crate::cards::Card;
use crate::config::GameConfiguration;
use crate::deal::{deal, Seed};
use crate::deck::{expected_deck_size, DeckCard};
use crate::engine::EngineError;
use crate::evaluator::{best_hand, EvalError, Evaluation};
use crate::hand::{Board, MAX_BOARD};
use crate::pending::{Choice, PendingAction};
use crate::player::PlayerId;
use crate::win::{self, WinCondition, WinOutcome, WinReason, WinView};
use log::{debug, info};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Street {
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Street {
    pub const fn label(self) -> &'static str {
        match self {
            Street::PreFlop => "Pre-flop",
            Street::Flop => "Flop",
            Street::Turn => "Turn",
            Street::River => "River",
            Street::Showdown => "Showdown",
        }
    }

    /// The street that follows and how many board cards it reveals.
    const fn next(self) -> Option<(Street, usize)> {
        match self {
            Street::PreFlop => Some((Street::Flop, 3)),
            Street::Flop => Some((Street::Turn, 1)),
            Street::Turn => Some((Street::River, 1)),
            Street::River | Street::Showdown => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryVerb {
    SmallBlind,
    BigBlind,
    Fold,
    Check,
    Call,
    RaiseTo,
    Win,
    Split,
    Refund,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub player: PlayerId,
    pub verb: HistoryVerb,
    pub amount: Option<u64>,
    pub street: Street,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub player: PlayerId,
    pub stack: u64,
    pub folded: bool,
    /// Chips put in on the current street.
    pub street_bet: u64,
    /// Chips put in over the whole hand.
    pub contributed: u64,
    pub hole: Vec<Card>,
    /// Has acted since the last full raise.
    pub acted: bool,
}

impl Seat {
    fn new(player: PlayerId, stack: u64, hole: Vec<Card>) -> Self {
        Self { player, stack, folded: false, street_bet: 0, contributed: 0, hole, acted: false }
    }

    /// Not folded and not all-in.
    pub fn can_act(&self) -> bool {
        !self.folded && self.stack > 0
    }

    fn pay(&mut self, amount: u64) -> u64 {
        let paid = self.stack.min(amount);
        self.stack -= paid;
        self.street_bet += paid;
        self.contributed += paid;
        paid
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandResult {
    /// Chips paid out of the pot, in seat order; zero entries omitted.
    pub payouts: Vec<(PlayerId, u64)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BettingState {
    pub(crate) roster: Vec<PlayerId>,
    pub(crate) seats: Vec<Seat>,
    pub(crate) street: Street,
    pub(crate) to_act: usize,
    pub(crate) first_to_act: usize,
    pub(crate) current_bet: u64,
    pub(crate) min_raise: u64,
    pub(crate) big_blind: u64,
    pub(crate) last_raiser: Option<usize>,
    pub(crate) awaiting_raise: Option<usize>,
    pub(crate) pot: u64,
    pub(crate) board: Board,
    /// Undealt cards, next card first.
    pub(crate) remainder: Vec<Card>,
    pub(crate) total_chips: u64,
    pub(crate) win_conditions: Vec<WinCondition>,
    pub(crate) history: Vec<HistoryEntry>,
    pub(crate) outcome: Option<WinOutcome>,
    pub(crate) result: Option<HandResult>,
}

fn playing_cards(cards: &[DeckCard]) -> Result<Vec<Card>, EngineError> {
    Ok(cards.iter().map(DeckCard::to_card).collect::<Result<Vec<_>, _>>()?)
}

impl BettingState {
    /// Deal hole cards, post blinds and hand the action to the first seat.
    ///
    /// Seat 0 posts the small blind and seat 1 the big blind. Heads-up the
    /// small blind acts first; with three or more players seat 2 does. A lone
    /// player posts only the small blind.
    pub fn start(
        config: &GameConfiguration,
        stacks: &[(PlayerId, u64)],
        seed: &Seed,
    ) -> Result<Self, EngineError> {
        let n = stacks.len();
        if n == 0 {
            return Err(EngineError::NoPlayers);
        }
        let deck = expected_deck_size(config);
        let needed = n.saturating_mul(config.cards_per_player()).saturating_add(MAX_BOARD);
        if needed > deck {
            return Err(EngineError::TooManyPlayers { players: n, needed, deck });
        }

        let roster: Vec<PlayerId> = stacks.iter().map(|(p, _)| p.clone()).collect();
        let dealt = deal(config, &roster, seed)?;
        let mut seats = Vec::with_capacity(n);
        for ((player, stack), (_, hand)) in stacks.iter().zip(&dealt.hands) {
            seats.push(Seat::new(player.clone(), *stack, playing_cards(hand)?));
        }
        let (small_blind, big_blind) = config.blinds();

        let mut state = BettingState {
            roster,
            seats,
            street: Street::PreFlop,
            to_act: 0,
            first_to_act: 0,
            current_bet: 0,
            min_raise: big_blind.max(1),
            big_blind: big_blind.max(1),
            last_raiser: None,
            awaiting_raise: None,
            pot: 0,
            board: Board::default(),
            remainder: playing_cards(&dealt.remainder)?,
            total_chips: stacks.iter().map(|(_, s)| s).sum(),
            win_conditions: config.win_conditions().to_vec(),
            history: Vec::new(),
            outcome: None,
            result: None,
        };
        state.post_blind(0, small_blind, HistoryVerb::SmallBlind);
        if n > 1 {
            state.post_blind(1, big_blind, HistoryVerb::BigBlind);
        }
        state.current_bet = state.seats.iter().map(|s| s.street_bet).max().unwrap_or(0);

        let first = if n > 2 { 2 } else { 0 };
        debug!("hand starts: {n} seats, blinds {small_blind}/{big_blind}, seed {seed}");
        match state.needing_action_from(first) {
            Some(i) => {
                state.to_act = i;
                state.first_to_act = i;
            }
            // everyone is all-in on the blinds
            None => state.progress(first)?,
        }
        Ok(state)
    }

    fn post_blind(&mut self, seat: usize, amount: u64, verb: HistoryVerb) {
        let paid = self.seats[seat].pay(amount);
        self.pot += paid;
        self.record(seat, verb, Some(paid));
    }

    fn record(&mut self, seat: usize, verb: HistoryVerb, amount: Option<u64>) {
        let player = self.seats[seat].player.clone();
        self.history.push(HistoryEntry { player, verb, amount, street: self.street });
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn seat(&self, player: &str) -> Option<&Seat> {
        self.seats.iter().find(|s| s.player.as_str() == player)
    }

    pub fn street(&self) -> Street {
        self.street
    }

    pub fn pot(&self) -> u64 {
        self.pot
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn remainder(&self) -> &[Card] {
        &self.remainder
    }

    pub fn current_bet(&self) -> u64 {
        self.current_bet
    }

    pub fn min_raise(&self) -> u64 {
        self.min_raise
    }

    pub fn last_raiser(&self) -> Option<&PlayerId> {
        self.last_raiser.map(|i| &self.seats[i].player)
    }

    /// Seat that opened the action on the current street.
    pub fn first_to_act(&self) -> &PlayerId {
        &self.seats[self.first_to_act].player
    }

    /// Player whose turn it is, until the hand is over.
    pub fn to_act(&self) -> Option<&PlayerId> {
        self.outcome.is_none().then(|| &self.seats[self.to_act].player)
    }

    pub fn to_call(&self, seat: usize) -> u64 {
        self.current_bet.saturating_sub(self.seats[seat].street_bet)
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn outcome(&self) -> Option<&WinOutcome> {
        self.outcome.as_ref()
    }

    pub fn result(&self) -> Option<&HandResult> {
        self.result.as_ref()
    }

    pub fn total_chips(&self) -> u64 {
        self.total_chips
    }

    /// Pot plus stacks equals the chips the hand started with.
    pub fn chips_conserved(&self) -> bool {
        self.pot + self.seats.iter().map(|s| s.stack).sum::<u64>() == self.total_chips
    }

    /// Board, undealt and hole cards together.
    pub fn cards_in_play(&self) -> usize {
        self.board.len() + self.remainder.len() + self.seats.iter().map(|s| s.hole.len()).sum::<usize>()
    }

    fn live_seats(&self) -> Vec<usize> {
        (0..self.seats.len()).filter(|&i| !self.seats[i].folded).collect()
    }

    fn actors(&self) -> usize {
        self.seats.iter().filter(|s| s.can_act()).count()
    }

    fn needs_action(&self, i: usize) -> bool {
        let s = &self.seats[i];
        s.can_act() && !(s.acted && s.street_bet >= self.current_bet)
    }

    fn needing_action_from(&self, start: usize) -> Option<usize> {
        let n = self.seats.len();
        (0..n).map(|k| (start + k) % n).find(|&i| self.needs_action(i))
    }

    /// Legal "raise to" totals for a seat.
    fn raise_bounds(&self, seat: usize) -> Result<(u64, u64), ActionError> {
        let s = &self.seats[seat];
        let max = s.street_bet + s.stack;
        if max <= self.current_bet {
            return Err(ActionError::CannotRaise);
        }
        Ok(((self.current_bet + self.min_raise).min(max), max))
    }

    pub fn pending(&self) -> Option<PendingAction> {
        if self.outcome.is_some() {
            return None;
        }
        let seat = &self.seats[self.to_act];
        let targets = vec![seat.player.clone()];
        let to_call = self.to_call(self.to_act);
        if self.awaiting_raise == Some(self.to_act) {
            let (min, max) = self.raise_bounds(self.to_act).ok()?;
            return Some(PendingAction::input(targets, format!("Raise to (pot {})", self.pot), min, max, 1));
        }
        let mut options = vec![Choice::new("fold", "Fold")];
        if to_call == 0 {
            options.push(Choice::new("check", "Check"));
        } else {
            options.push(Choice::new("call", format!("Call {}", to_call.min(seat.stack))));
        }
        if self.raise_bounds(self.to_act).is_ok() {
            options.push(Choice::new("raise", "Raise"));
        }
        let prompt = format!("{}: pot {}, {} to call", self.street.label(), self.pot, to_call);
        Some(PendingAction::select(targets, prompt, options))
    }

    pub fn apply(&self, submission: &Submission) -> Result<Self, ActionError> {
        if self.outcome.is_some() {
            return Err(ActionError::GameOver);
        }
        let seat = self
            .seats
            .iter()
            .position(|s| s.player == submission.player)
            .ok_or_else(|| ActionError::UnknownPlayer(submission.player.clone()))?;
        if seat != self.to_act {
            return Err(ActionError::NotYourTurn(submission.player.clone()));
        }
        let mut next = self.clone();
        next.act(seat, &submission.action)?;
        Ok(next)
    }

    /// Map generic answers onto betting actions.
    fn betting_action(action: &Action) -> Result<Action, ActionError> {
        match action {
            Action::Select { option } => match option.parse::<Action>() {
                Ok(a @ (Action::Fold | Action::Check | Action::Call | Action::Raise { .. })) => Ok(a),
                _ => Err(ActionError::UnknownOption(option.clone())),
            },
            Action::Input { value } => Ok(Action::Raise { amount: Some(*value) }),
            Action::Vote { .. } | Action::Advance => Err(ActionError::Unsupported(action.verb().to_string())),
            other => Ok(other.clone()),
        }
    }

    fn act(&mut self, seat: usize, action: &Action) -> Result<(), ActionError> {
        let action = Self::betting_action(action)?;
        if self.awaiting_raise == Some(seat) && !matches!(action, Action::Raise { amount: Some(_) }) {
            return Err(ActionError::AmountRequired);
        }
        match action {
            Action::Fold => {
                self.seats[seat].folded = true;
                self.record(seat, HistoryVerb::Fold, None);
            }
            Action::Check => {
                let to_call = self.to_call(seat);
                if to_call > 0 {
                    return Err(ActionError::CannotCheck { to_call });
                }
                self.record(seat, HistoryVerb::Check, None);
            }
            Action::Call => {
                let owed = self.to_call(seat);
                let paid = self.seats[seat].pay(owed);
                self.pot += paid;
                self.record(seat, HistoryVerb::Call, Some(paid));
            }
            Action::Raise { amount: None } => {
                self.raise_bounds(seat)?;
                self.awaiting_raise = Some(seat);
                return Ok(());
            }
            Action::Raise { amount: Some(to) } => {
                let (min, max) = self.raise_bounds(seat)?;
                if to < min || to > max {
                    return Err(ActionError::AmountOutOfRange { min, max, got: to });
                }
                let need = to - self.seats[seat].street_bet;
                self.pot += self.seats[seat].pay(need);
                let increment = to - self.current_bet;
                // a short all-in does not reopen the action
                if increment >= self.min_raise {
                    self.min_raise = increment;
                    self.last_raiser = Some(seat);
                    for s in &mut self.seats {
                        s.acted = false;
                    }
                }
                self.current_bet = to;
                self.record(seat, HistoryVerb::RaiseTo, Some(to));
            }
            other => return Err(ActionError::Unsupported(other.verb().to_string())),
        }
        self.seats[seat].acted = true;
        self.awaiting_raise = None;
        self.progress(seat).map_err(|e| ActionError::Inconsistent(e.to_string()))
    }

    /// Pass the turn on, close the street, or finish the hand.
    fn progress(&mut self, last: usize) -> Result<(), EvalError> {
        let live = self.live_seats().len();
        if live < 2 && live < self.seats.len() {
            return self.settle();
        }
        let n = self.seats.len();
        if let Some(next) = self.needing_action_from((last + 1) % n) {
            self.to_act = next;
            return Ok(());
        }
        while self.street != Street::River && self.actors() >= 2 {
            self.open_next_street()?;
            if let Some(first) = self.needing_action_from(0) {
                self.to_act = first;
                self.first_to_act = first;
                return Ok(());
            }
        }
        while self.street != Street::River {
            self.open_next_street()?;
        }
        self.settle()
    }

    fn open_next_street(&mut self) -> Result<(), EvalError> {
        let Some((street, count)) = self.street.next() else {
            return Ok(());
        };
        let cards: Vec<Card> = self.remainder.drain(..count.min(self.remainder.len())).collect();
        self.board.reveal(cards)?;
        self.street = street;
        for s in &mut self.seats {
            s.street_bet = 0;
            s.acted = false;
        }
        self.current_bet = 0;
        self.min_raise = self.big_blind;
        self.last_raiser = None;
        debug!("{} dealt, board {:?}", street.label(), self.board.as_slice());
        Ok(())
    }

    /// Pay out the pot and record the outcome.
    fn settle(&mut self) -> Result<(), EvalError> {
        let live = self.live_seats();
        let mut payouts = vec![0u64; self.seats.len()];
        let verb = match live.as_slice() {
            [] => {
                for (p, s) in payouts.iter_mut().zip(&self.seats) {
                    *p = s.contributed;
                }
                HistoryVerb::Refund
            }
            [only] => {
                payouts[*only] = self.pot;
                HistoryVerb::Win
            }
            _ => {
                self.street = Street::Showdown;
                payouts = self.side_pot_payouts(&live)?;
                HistoryVerb::Win
            }
        };
        let paid_to = payouts.iter().filter(|&&p| p > 0).count();
        for (i, &amount) in payouts.iter().enumerate() {
            if amount == 0 {
                continue;
            }
            self.seats[i].stack += amount;
            let verb = if verb == HistoryVerb::Win && paid_to > 1 { HistoryVerb::Split } else { verb };
            self.record(i, verb, Some(amount));
        }
        self.pot = 0;
        self.awaiting_raise = None;
        self.street = Street::Showdown;

        let paid: Vec<PlayerId> = (0..payouts.len())
            .filter(|&i| payouts[i] > 0 && verb != HistoryVerb::Refund)
            .map(|i| self.seats[i].player.clone())
            .collect();
        let outcome = match win::evaluate(&*self, &self.win_conditions)? {
            // side pots can pay hands that lost the main pot
            Some(mut o) if live.len() > 1 && o.reason == WinReason::HandCompare => {
                if paid.len() > o.winners.len() {
                    o.message = format!("{}, side pots to {}", o.message, paid.len() - o.winners.len());
                }
                o.winners = paid;
                o
            }
            Some(o) => o,
            None => WinOutcome {
                winners: paid,
                team: None,
                reason: if live.len() > 1 { WinReason::HandCompare } else { WinReason::LastStanding },
                hand_name: None,
                message: "hand complete".to_string(),
            },
        };
        info!("hand over: {} ({:?})", outcome.message, outcome.winners);
        self.result = Some(HandResult {
            payouts: payouts
                .iter()
                .enumerate()
                .filter(|(_, a)| **a > 0)
                .map(|(i, &a)| (self.seats[i].player.clone(), a))
                .collect(),
        });
        self.outcome = Some(outcome);
        Ok(())
    }

    /// Split each contribution level among the best live hands that reached it.
    /// Odd chips go to the earliest seats.
    fn side_pot_payouts(&self, live: &[usize]) -> Result<Vec<u64>, EvalError> {
        let n = self.seats.len();
        let mut evals: Vec<Option<Evaluation>> = vec![None; n];
        for &i in live {
            let mut cards = self.seats[i].hole.clone();
            cards.extend_from_slice(self.board.as_slice());
            evals[i] = Some(best_hand(&cards)?);
        }

        let mut levels: Vec<u64> = self.seats.iter().map(|s| s.contributed).filter(|&c| c > 0).collect();
        levels.sort_unstable();
        levels.dedup();

        let mut payouts = vec![0u64; n];
        let mut prev = 0u64;
        for lvl in levels {
            let contributors = self.seats.iter().filter(|s| s.contributed >= lvl).count() as u64;
            let amount = (lvl - prev) * contributors;
            prev = lvl;
            let mut eligible: Vec<usize> =
                live.iter().copied().filter(|&i| self.seats[i].contributed >= lvl).collect();
            if eligible.is_empty() {
                eligible = live.to_vec();
            }
            let best = eligible.iter().filter_map(|&i| evals[i]).max();
            let winners: Vec<usize> = eligible.into_iter().filter(|&i| evals[i] == best).collect();
            if winners.is_empty() {
                continue;
            }
            let share = amount / winners.len() as u64;
            let odd = (amount % winners.len() as u64) as usize;
            for (k, &i) in winners.iter().enumerate() {
                payouts[i] += share + u64::from(k < odd);
            }
        }
        Ok(payouts)
    }
}

impl WinView for BettingState {
    fn roster(&self) -> &[PlayerId] {
        &self.roster
    }

    fn is_out(&self, player: &PlayerId) -> bool {
        self.seats.iter().any(|s| &s.player == player && s.folded)
    }

    fn showdown_hands(&self) -> Vec<(PlayerId, Vec<Card>)> {
        self.seats.iter().filter(|s| !s.folded).map(|s| (s.player.clone(), s.hole.clone())).collect()
    }

    fn community(&self) -> &[Card] {
        self.board.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::roster;

    fn holdem(ids: &[&str], stack: u64, seed: &str) -> BettingState {
        let stacks: Vec<(PlayerId, u64)> = roster(ids.iter().copied()).into_iter().map(|p| (p, stack)).collect();
        BettingState::start(&GameConfiguration::texas_holdem(), &stacks, &Seed::from(seed)).unwrap()
    }

    fn play(state: &BettingState, player: &str, action: &str) -> BettingState {
        state.apply(&Submission::new(player, action.parse().unwrap())).unwrap()
    }

    #[test]
    fn blinds_and_first_to_act() {
        let s = holdem(&["a", "b"], 500, "s1");
        assert_eq!((s.seats[0].street_bet, s.seats[1].street_bet), (10, 20));
        assert_eq!(s.to_act().map(PlayerId::as_str), Some("a"));
        assert_eq!(s.pot(), 30);

        let s = holdem(&["a", "b", "c", "d"], 500, "s1");
        assert_eq!(s.to_act().map(PlayerId::as_str), Some("c"));
        assert_eq!(s.current_bet(), 20);
        assert_eq!(s.min_raise(), 20);
    }

    #[test]
    fn lone_player_posts_small_blind_only() {
        let s = holdem(&["solo"], 500, "s1");
        assert_eq!(s.pot(), 10);
        assert_eq!(s.history().len(), 1);
        let s = play(&s, "solo", "check");
        assert_eq!(s.outcome().unwrap().winners, roster(["solo"]));
        assert_eq!(s.seats[0].stack, 500);
        assert_eq!(s.board().len(), 5);
    }

    #[test]
    fn out_of_turn_and_illegal_checks_are_refused() {
        let s = holdem(&["a", "b"], 500, "s2");
        let err = s.apply(&Submission::new("b", Action::Call)).unwrap_err();
        assert_eq!(err, ActionError::NotYourTurn("b".into()));
        let err = s.apply(&Submission::new("a", Action::Check)).unwrap_err();
        assert_eq!(err, ActionError::CannotCheck { to_call: 10 });
        let err = s.apply(&Submission::new("zed", Action::Fold)).unwrap_err();
        assert_eq!(err, ActionError::UnknownPlayer("zed".into()));
    }

    #[test]
    fn big_blind_gets_the_option() {
        let s = holdem(&["a", "b"], 500, "s3");
        let s = play(&s, "a", "call");
        assert_eq!(s.street(), Street::PreFlop);
        assert_eq!(s.to_act().map(PlayerId::as_str), Some("b"));
        let s = play(&s, "b", "check");
        assert_eq!(s.street(), Street::Flop);
        assert_eq!(s.board().len(), 3);
        assert_eq!(s.to_act().map(PlayerId::as_str), Some("a"));
    }

    #[test]
    fn two_step_raise_asks_for_an_amount() {
        let s = holdem(&["a", "b"], 500, "s4");
        let s = play(&s, "a", "raise");
        let pending = s.pending().unwrap();
        assert_eq!(pending.kind, crate::pending::PendingKind::Input { min: 40, max: 500, step: 1 });
        assert_eq!(s.apply(&Submission::new("a", Action::Call)).unwrap_err(), ActionError::AmountRequired);
        assert_eq!(
            s.apply(&Submission::new("a", Action::Input { value: 30 })).unwrap_err(),
            ActionError::AmountOutOfRange { min: 40, max: 500, got: 30 }
        );
        let s = play(&s, "a", "input 100");
        assert_eq!(s.current_bet(), 100);
        assert_eq!(s.min_raise(), 80);
        assert_eq!(s.last_raiser().map(PlayerId::as_str), Some("a"));
    }

    #[test]
    fn all_in_call_runs_the_board_out() {
        let s = holdem(&["a", "b"], 200, "s5");
        let s = play(&s, "a", "raise 200");
        let s = play(&s, "b", "call");
        assert!(s.outcome().is_some());
        assert_eq!(s.board().len(), 5);
        assert_eq!(s.pot(), 0);
        assert!(s.chips_conserved());
        assert_eq!(s.cards_in_play(), 52);
        assert_eq!(s.apply(&Submission::new("a", Action::Check)).unwrap_err(), ActionError::GameOver);
    }

    #[test]
    fn select_answers_map_to_betting_actions() {
        let s = holdem(&["a", "b"], 500, "s6");
        let s = s.apply(&Submission::new("a", Action::Select { option: "call".into() })).unwrap();
        assert_eq!(s.to_act().map(PlayerId::as_str), Some("b"));
        let err = s.apply(&Submission::new("b", Action::Select { option: "dance".into() })).unwrap_err();
        assert_eq!(err, ActionError::UnknownOption("dance".into()));
    }

    #[test]
    fn side_pots_split_by_contribution_level() {
        let mut s = holdem(&["a", "b", "c"], 100, "s7");
        // a short stack all-in for 50, b and c put in 100 each
        s.board = Board::try_new(crate::cards::parse_cards("2c 7d 9h Js Kd").unwrap()).unwrap();
        s.seats[0].hole = crate::cards::parse_cards("Ah As").unwrap();
        s.seats[1].hole = crate::cards::parse_cards("Qh Qs").unwrap();
        s.seats[2].hole = crate::cards::parse_cards("3c 4c").unwrap();
        s.seats[0].contributed = 50;
        s.seats[1].contributed = 100;
        s.seats[2].contributed = 100;
        let payouts = s.side_pot_payouts(&[0, 1, 2]).unwrap();
        assert_eq!(payouts, vec![150, 100, 0]);
    }

    #[test]
    fn side_pot_winners_share_the_outcome() {
        let mut s = holdem(&["a", "b", "c"], 100, "s7");
        s.board = Board::try_new(crate::cards::parse_cards("2c 7d 9h Js Kd").unwrap()).unwrap();
        s.seats[0].hole = crate::cards::parse_cards("Ah As").unwrap();
        s.seats[1].hole = crate::cards::parse_cards("Qh Qs").unwrap();
        s.seats[2].hole = crate::cards::parse_cards("3c 4c").unwrap();
        for (seat, put_in) in s.seats.iter_mut().zip([100, 300, 300]) {
            seat.contributed = put_in;
            seat.stack = 0;
        }
        s.pot = 700;
        s.settle().unwrap();
        assert_eq!(s.result().unwrap().payouts, vec![(PlayerId::from("a"), 300), (PlayerId::from("b"), 400)]);
        let outcome = s.outcome().unwrap();
        assert_eq!(outcome.winners, roster(["a", "b"]));
        assert_eq!(outcome.reason, WinReason::HandCompare);
    }
}
