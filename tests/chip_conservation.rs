use proptest::prelude::*;
use tabletop_engine::action::{Action, Submission};
use tabletop_engine::config::GameConfiguration;
use tabletop_engine::engine::{apply_action, start_game, GameMachine, GameState, RoomSetup};
use tabletop_engine::pending::{PendingAction, PendingKind};
use tabletop_engine::player::PlayerId;

/// Turn a random byte into a legal answer to the pending request.
fn answer(pending: &PendingAction, pick: u8) -> Submission {
    let player = pending.targets[0].clone();
    let action = match &pending.kind {
        PendingKind::Select { options, .. } => {
            let option = &options[usize::from(pick) % options.len()];
            Action::Select { option: option.id.clone() }
        }
        PendingKind::Input { min, max, .. } => {
            let span = max - min + 1;
            Action::Input { value: min + u64::from(pick) % span }
        }
        PendingKind::Confirm { .. } | PendingKind::View { .. } => Action::Advance,
    };
    Submission::new(player, action)
}

fn poker(state: &GameState) -> &tabletop_engine::betting::BettingState {
    match state {
        GameState::Poker(s) => s,
        other => panic!("expected poker, got {:?}", other.family()),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn random_hands_conserve_chips_and_cards(
        n in 2usize..=6,
        stacks in prop::collection::vec(25u64..=600, 6),
        seed in any::<u64>(),
        picks in prop::collection::vec(any::<u8>(), 1..120),
    ) {
        let players: Vec<PlayerId> = (0..n).map(|i| PlayerId::from(format!("p{i}"))).collect();
        let mut setup = RoomSetup::new(players.clone(), seed);
        for (p, s) in players.iter().zip(&stacks) {
            setup = setup.with_stack(p.clone(), *s);
        }
        let total: u64 = stacks[..n].iter().sum();

        let mut state = start_game(&GameConfiguration::texas_holdem(), &setup).unwrap().state;
        for pick in picks {
            let Some(pending) = state.pending() else { break };
            let next = apply_action(&state, &answer(&pending, pick));
            prop_assert!(next.is_ok(), "legal answer refused: {:?}", next.err());
            state = next.unwrap().state;

            let table = poker(&state);
            prop_assert!(table.chips_conserved());
            prop_assert_eq!(table.total_chips(), total);
            prop_assert_eq!(table.cards_in_play(), 52);
            prop_assert!(table.board().len() <= 5);
        }

        let table = poker(&state);
        if state.outcome().is_some() {
            prop_assert_eq!(table.pot(), 0);
            let stacks: u64 = table.seats().iter().map(|s| s.stack).sum();
            prop_assert_eq!(stacks, total);
        }
    }
}
