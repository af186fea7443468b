//! Scripted self-play.
//!
//! Drives whole games through the public engine API with random decision
//! sources: solicit, validate, retry on rejection, fall back once the
//! invalid-proposal budget runs out, and route chat outside the game state.
//! Multiple games run in parallel with rayon; each owns an independent
//! state and random stream, so runs are reproducible from the seed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::board::map::MapGraph;
use crate::decision::{ChatMessage, DecisionSource, RandomSource};
use crate::engine::{ApplyOutcome, EngineConfig, EngineError, SetupError, TurnController};
use crate::event::{EventSink, NullSink};

/// Seat colors handed out in order.
const COLORS: [&str; 6] = ["Red", "Blue", "Green", "Yellow", "Magenta", "Cyan"];

/// Self-play run configuration.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    pub num_games: usize,
    /// Seats per game; 2 selects the 2-player variant.
    pub players: usize,
    /// Master seed; 0 draws one from entropy.
    pub seed: u64,
    pub threads: usize,
    pub engine: EngineConfig,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            players: 3,
            seed: 0,
            threads: 1,
            engine: EngineConfig::default(),
        }
    }
}

/// Errors surfaced by a self-play run.
#[derive(Debug, thiserror::Error)]
pub enum SelfPlayError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Summary of one completed game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub index: usize,
    pub winner: Option<String>,
    pub turns: u32,
    pub actions_applied: usize,
    pub proposals_rejected: usize,
    pub events: usize,
}

/// Plays one game to completion and returns its record.
///
/// Events are offered to `sink` as they happen; the full history also stays
/// on the final state, which is where `events` is counted from.
pub fn play_game(
    map: &MapGraph,
    config: &SelfPlayConfig,
    index: usize,
    seed: u64,
    sink: &mut dyn EventSink,
) -> Result<GameRecord, SelfPlayError> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let seats: Vec<(String, &str)> = (0..config.players)
        .map(|i| (format!("Player {}", i + 1), COLORS[i % COLORS.len()]))
        .collect();
    let seat_refs: Vec<(&str, &str)> = seats.iter().map(|(n, c)| (n.as_str(), *c)).collect();

    let mut controller = TurnController::new(map, &seat_refs, config.engine, &mut rng)?;
    // One source per seat, including the Neutral seat in the 2-player
    // variant (it is never asked for a move, only indexed past).
    let mut sources: Vec<RandomSource> = (0..controller.state().players.len())
        .map(|_| RandomSource::new(rng.gen()))
        .collect();
    let mut chat_log: Vec<ChatMessage> = Vec::new();

    let mut actions_applied = 0usize;
    let mut proposals_rejected = 0usize;

    while controller.state().phase != crate::board::state::Phase::GameOver {
        let actor = controller.state().acting_player();
        let templates = controller.legal_templates();
        if templates.is_empty() {
            break;
        }
        let snapshot = controller.snapshot();

        // Solicit, tolerating a bounded number of invalid proposals before
        // the engine picks for the seat.
        let mut action = None;
        for _ in 0..controller.config().max_invalid_proposals {
            let proposal = sources[actor.0 as usize].propose_action(&snapshot, &templates);
            match controller.check(&proposal) {
                Ok(valid) => {
                    action = Some(valid);
                    break;
                }
                Err(_) => proposals_rejected += 1,
            }
        }
        let action = match action.or_else(|| controller.fallback_action()) {
            Some(action) => action,
            None => break,
        };

        let defense_dice = controller.defense_choice(&action).map(|(chooser, t, max)| {
            sources[chooser.0 as usize].choose_defense_dice(&snapshot, map.name(t), max)
        });

        match controller.apply(&action, defense_dice, &mut rng, sink)? {
            ApplyOutcome::Continue => {}
            ApplyOutcome::GameOver { .. } => break,
            ApplyOutcome::GlobalChat { message } => {
                chat_log.push(ChatMessage {
                    from: controller.state().player(actor).name.clone(),
                    to: None,
                    text: message,
                });
            }
            ApplyOutcome::PrivateChat { target, message } => {
                let from = controller.state().player(actor).name.clone();
                let to = controller.state().player(target).name.clone();
                chat_log.push(ChatMessage {
                    from: from.clone(),
                    to: Some(to.clone()),
                    text: message,
                });
                let reply = sources[target.0 as usize].private_chat(&chat_log, &from);
                chat_log.push(ChatMessage {
                    from: to,
                    to: Some(from),
                    text: reply,
                });
            }
        }
        actions_applied += 1;
    }

    let state = controller.state();
    let winner = state
        .history
        .iter()
        .rev()
        .find_map(|e| match e {
            crate::event::GameEvent::GameOver { winner, .. } => Some(winner.clone()),
            _ => None,
        })
        .flatten();

    Ok(GameRecord {
        index,
        winner,
        turns: state.turn,
        actions_applied,
        proposals_rejected,
        events: state.history.len(),
    })
}

/// Runs the configured number of games, in parallel when `threads > 1`.
/// Per-game seeds derive from the master seed, so a fixed seed reproduces
/// the same set of games regardless of thread count.
pub fn run_games(map: &MapGraph, config: &SelfPlayConfig) -> Vec<Result<GameRecord, SelfPlayError>> {
    let master = if config.seed != 0 {
        config.seed
    } else {
        rand::random()
    };

    if config.threads > 1 {
        use rayon::prelude::*;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build();
        match pool {
            Ok(pool) => pool.install(|| {
                (0..config.num_games)
                    .into_par_iter()
                    .map(|i| {
                        let mut sink = NullSink;
                        play_game(map, config, i, master.wrapping_add(i as u64), &mut sink)
                    })
                    .collect()
            }),
            Err(_) => run_sequential(map, config, master),
        }
    } else {
        run_sequential(map, config, master)
    }
}

fn run_sequential(
    map: &MapGraph,
    config: &SelfPlayConfig,
    master: u64,
) -> Vec<Result<GameRecord, SelfPlayError>> {
    (0..config.num_games)
        .map(|i| {
            let mut sink = NullSink;
            play_game(map, config, i, master.wrapping_add(i as u64), &mut sink)
        })
        .collect()
}
