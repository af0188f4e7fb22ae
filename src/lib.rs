//! tabletop-engine: deterministic rules engine for room-based tabletop games
//!
//! The engine covers:
//! - Seeded dealing: the same seed always produces the same hands
//! - Texas Hold'em betting with side pots and a 5-7 card hand evaluator
//! - Social-deduction rounds with secret words, voting and elimination
//! - A generic walker for phase graphs declared in a game configuration
//!
//! Every transition is a pure function from the old state and one player
//! action to a new state plus the next pending request.
//!
//! ## Quick start: a heads-up hand
//! ```
//! use tabletop_engine::action::{Action, Submission};
//! use tabletop_engine::config::GameConfiguration;
//! use tabletop_engine::engine::{apply_action, start_game, RoomSetup};
//! use tabletop_engine::player::roster;
//!
//! let config = GameConfiguration::texas_holdem();
//! let setup = RoomSetup::new(roster(["alice", "bob"]), "room-42");
//! let start = start_game(&config, &setup).unwrap();
//!
//! let next = apply_action(&start.state, &Submission::new("alice", Action::Raise { amount: Some(60) })).unwrap();
//! let next = apply_action(&next.state, &Submission::new("bob", Action::Call)).unwrap();
//! assert!(next.outcome.is_none());
//! ```
//!
//! ## CLI
//! Replay a scripted room with:
//! ```sh
//! cargo run --bin tabletop-room -- --preset holdem --players alice,bob --seed room-42
//! ```

pub mod action;
pub mod betting;
pub mod cards;
pub mod config;
pub mod deal;
pub mod deck;
pub mod elimination;
pub mod engine;
pub mod evaluator;
pub mod hand;
pub mod pending;
pub mod phases;
pub mod player;
pub mod presets;
pub mod shuffle;
pub mod win;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
