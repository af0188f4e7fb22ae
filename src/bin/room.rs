//! Replays a scripted room against the engine and prints every request as JSON.

use clap::Parser;
use log::{info, warn};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use tabletop_engine::action::{Action, Submission};
use tabletop_engine::config::GameConfiguration;
use tabletop_engine::engine::{apply_action, start_game, RoomSetup, Transition};
use tabletop_engine::player::PlayerId;

#[derive(Parser)]
#[command(name = "tabletop-room")]
#[command(about = "Run a deterministic tabletop game from a configuration and an action script")]
#[command(version)]
struct Cli {
    /// Game configuration as JSON
    #[arg(short, long, conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Built-in game: holdem, undercover or neon-heist
    #[arg(short, long, default_value = "holdem")]
    preset: String,

    /// Comma-separated player ids in seat order
    #[arg(long, value_delimiter = ',', required = true)]
    players: Vec<String>,

    /// Deal seed
    #[arg(short, long, default_value = "0")]
    seed: String,

    /// Starting chips for every seat
    #[arg(long)]
    stack: Option<u64>,

    /// Lines of `player action [arg]`; `#` starts a comment
    #[arg(long)]
    script: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> Result<GameConfiguration, Box<dyn Error>> {
    match &cli.config {
        Some(path) => Ok(GameConfiguration::from_json(&fs::read_to_string(path)?)?),
        None => GameConfiguration::preset(&cli.preset).ok_or_else(|| format!("unknown preset '{}'", cli.preset).into()),
    }
}

fn parse_line(line: &str) -> Result<Option<Submission>, Box<dyn Error>> {
    let line = line.split('#').next().unwrap_or_default().trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (player, action) = line.split_once(char::is_whitespace).ok_or_else(|| format!("missing action: '{line}'"))?;
    let action: Action = action.trim().parse()?;
    Ok(Some(Submission::new(player, action)))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    let players: Vec<PlayerId> = cli.players.iter().map(|p| PlayerId::from(p.trim())).collect();
    let mut setup = RoomSetup::new(players.clone(), cli.seed.as_str());
    if let Some(chips) = cli.stack {
        for p in players {
            setup = setup.with_stack(p, chips);
        }
    }

    let Transition { mut state, pending, outcome } = start_game(&config, &setup)?;
    info!("room started with seed {}", setup.seed);
    print_json(&pending)?;

    let script = match &cli.script {
        Some(path) => fs::read_to_string(path)?,
        None => String::new(),
    };
    let mut outcome = outcome;
    for (n, line) in script.lines().enumerate() {
        let Some(submission) = parse_line(line).map_err(|e| format!("line {}: {e}", n + 1))? else {
            continue;
        };
        match apply_action(&state, &submission) {
            Ok(next) => {
                print_json(&next.pending)?;
                state = next.state;
                outcome = next.outcome;
            }
            Err(rejection) => {
                warn!("line {}: {}", n + 1, rejection.error);
                print_json(&rejection)?;
            }
        }
        if outcome.is_some() {
            break;
        }
    }
    print_json(&outcome)?;
    Ok(())
}
