use tabletop_engine::action::{Action, ActionError, Submission};
use tabletop_engine::config::GameConfiguration;
use tabletop_engine::engine::{apply_action, start_game, GameFamily, GameMachine, GameState, RoomSetup, Transition};
use tabletop_engine::pending::PendingKind;
use tabletop_engine::player::roster;
use tabletop_engine::win::{WinCondition, WinReason};

const AUCTION: &str = r#"{
    "game_name": "Moonlight Auction",
    "min_players": 2,
    "max_players": 4,
    "roles": [{"name": "Lot", "count": 10, "skill_summary": "an item for sale"}],
    "initial_items": {"coins": 100},
    "game_schema": {
        "distribution": {"deck_type": "from_roles", "cards_per_player": 1},
        "phase_interactions": [
            {"phase_id": "reveal", "phase_name": "Reveal", "deal_from_deck": 2,
             "transition_trigger": "host_confirm", "transition_target": "bid"},
            {"phase_id": "bid", "phase_name": "Bidding", "in_app_input": true,
             "action_type": "select", "action_target": "all_players",
             "action_options": ["Pass", {"id": "raise", "label": "Raise the bid"}],
             "transition_target": "vote"},
            {"phase_id": "vote", "phase_name": "Vote", "in_app_input": true,
             "action_type": "vote", "action_target": "all_players",
             "action_options": ["Accuse"]}
        ],
        "win_conditions": [{"type": "vote_majority"}]
    }
}"#;

fn submit(t: &Transition, player: &str, action: Action) -> Transition {
    apply_action(&t.state, &Submission::new(player, action)).unwrap()
}

#[test]
fn legacy_interactions_run_as_a_phase_graph() {
    let config = GameConfiguration::from_json(AUCTION).unwrap();
    assert_eq!(GameFamily::detect(&config), Some(GameFamily::Generic));

    let t = start_game(&config, &RoomSetup::new(roster(["ann", "bo", "cy"]), "auction")).unwrap();
    let GameState::Generic(s) = &t.state else { panic!("expected the generic family") };
    assert_eq!(s.phase_id(), "reveal");
    assert_eq!(s.table().len(), 2);
    assert_eq!(s.hand("bo").unwrap().len(), 1);
    assert!(matches!(t.pending.as_ref().unwrap().kind, PendingKind::Confirm { .. }));

    let t = submit(&t, "ann", Action::Advance);
    let pending = t.pending.clone().unwrap();
    assert!(pending.has_option("Pass"));
    assert!(pending.has_option("raise"));
    assert_eq!(pending.targets, roster(["ann", "bo", "cy"]));

    let refused = apply_action(&t.state, &Submission::new("bo", Action::Select { option: "Raise the bid".into() }))
        .unwrap_err();
    assert_eq!(refused.error, ActionError::UnknownOption("Raise the bid".into()));
    assert_eq!(refused.pending.unwrap().note.as_deref(), Some("unknown option 'Raise the bid'"));

    let mut t = t;
    for p in ["ann", "bo", "cy"] {
        t = submit(&t, p, Action::Select { option: "raise".into() });
    }
    let GameState::Generic(s) = &t.state else { panic!("expected the generic family") };
    assert_eq!(s.phase_id(), "vote");

    t = submit(&t, "ann", Action::Vote { target: "cy".into() });
    t = submit(&t, "bo", Action::Vote { target: "cy".into() });
    t = submit(&t, "cy", Action::Vote { target: "ann".into() });
    let outcome = t.outcome.clone().unwrap();
    assert_eq!(outcome.reason, WinReason::VoteMajority);
    assert_eq!(outcome.winners, roster(["cy"]));
    assert!(t.state.pending().is_none());
}

#[test]
fn score_threshold_reads_initial_items() {
    let mut config = GameConfiguration::from_json(AUCTION).unwrap();
    config.game_schema.win_conditions =
        vec![WinCondition::ScoreThreshold { threshold: 150, resource: "coins".to_string() }];
    let t = start_game(&config, &RoomSetup::new(roster(["ann", "bo"]), "auction")).unwrap();
    let GameState::Generic(s) = t.state else { panic!("expected the generic family") };
    let s = s.record_score(&"bo".into(), "coins", 149).unwrap();
    assert!(s.outcome().is_none());
    let s = s.record_score(&"ann".into(), "coins", 150).unwrap();
    assert_eq!(s.outcome().unwrap().winners, roster(["ann"]));
}

#[test]
fn win_conditions_parse_from_rule_parser_json() {
    let parsed: Vec<WinCondition> = serde_json::from_str(
        r#"[
            {"type": "last_standing"},
            {"type": "role_elimination", "params": {"civilians": "crew"}},
            {"type": "score_threshold", "params": {"score": "12"}},
            {"type": "treasure_hunt", "params": {"item": "map"}}
        ]"#,
    )
    .unwrap();
    assert_eq!(parsed[0], WinCondition::LastStanding);
    assert_eq!(
        parsed[1],
        WinCondition::RoleElimination { civilians: "crew".to_string(), spies: "spy".to_string() }
    );
    assert_eq!(parsed[2], WinCondition::ScoreThreshold { threshold: 12, resource: "score".to_string() });
    assert!(matches!(&parsed[3], WinCondition::Custom { kind, .. } if kind == "treasure_hunt"));

    let bad = serde_json::from_str::<WinCondition>(r#"{"type": "score_threshold"}"#);
    assert!(bad.is_err());
}
