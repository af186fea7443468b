//! Hegemon -- scripted Risk games from the command line.
//!
//! Loads a map document (the bundled classic board by default), plays games
//! between random decision sources, and prints per-game results. With
//! `--events` the full event log of each game is printed as JSON lines.
//!
//! Usage:
//!   hegemon [OPTIONS]
//!
//! Options:
//!   --games N       Number of games to play (default: 10)
//!   --players N     Seats per game, 2 selects the 2-player variant (default: 3)
//!   --seed N        Master seed, 0 for entropy (default: 0)
//!   --threads N     Parallel games (default: 1)
//!   --max-turns N   Round cap before a draw (default: 200)
//!   --retries N     Invalid proposals tolerated per solicitation (default: 5)
//!   --map FILE      Map document path (default: bundled classic map)
//!   --events        Print every game event as a JSON line

use std::collections::HashMap;
use std::env;
use std::fs;
use std::process;

use hegemon::board::map::MapGraph;
use hegemon::event::{EventSink, GameEvent};
use hegemon::selfplay::{play_game, run_games, SelfPlayConfig};

/// Writes each event as one JSON line on stdout.
struct JsonLineSink;

impl EventSink for JsonLineSink {
    fn emit(&mut self, event: &GameEvent) {
        if let Ok(line) = serde_json::to_string(event) {
            println!("{}", line);
        }
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut config = SelfPlayConfig::default();
    let mut map_path: Option<String> = None;
    let mut print_events = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                i += 1;
                config.num_games = args[i].parse().expect("invalid --games value");
            }
            "--players" => {
                i += 1;
                config.players = args[i].parse().expect("invalid --players value");
            }
            "--seed" => {
                i += 1;
                config.seed = args[i].parse().expect("invalid --seed value");
            }
            "--threads" => {
                i += 1;
                config.threads = args[i].parse().expect("invalid --threads value");
            }
            "--max-turns" => {
                i += 1;
                config.engine.max_turns = args[i].parse().expect("invalid --max-turns value");
            }
            "--retries" => {
                i += 1;
                config.engine.max_invalid_proposals =
                    args[i].parse().expect("invalid --retries value");
            }
            "--map" => {
                i += 1;
                map_path = Some(args[i].clone());
            }
            "--events" => {
                print_events = true;
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let map_json = match &map_path {
        Some(path) => match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("failed to read {}: {}", path, e);
                process::exit(1);
            }
        },
        None => include_str!("../maps/classic.json").to_string(),
    };
    let map = match MapGraph::from_json(&map_json) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("invalid map document: {}", e);
            process::exit(1);
        }
    };

    if print_events {
        // Event printing runs games one at a time so the log stays ordered.
        let master = if config.seed != 0 { config.seed } else { rand::random() };
        let mut wins: HashMap<String, usize> = HashMap::new();
        let mut draws = 0usize;
        for i in 0..config.num_games {
            let mut sink = JsonLineSink;
            match play_game(&map, &config, i, master.wrapping_add(i as u64), &mut sink) {
                Ok(record) => {
                    report_game(i, config.num_games, &record.winner, record.turns);
                    match record.winner {
                        Some(name) => *wins.entry(name).or_insert(0) += 1,
                        None => draws += 1,
                    }
                }
                Err(e) => {
                    eprintln!("game {} aborted: {}", i + 1, e);
                    process::exit(1);
                }
            }
        }
        report_summary(&wins, draws);
        return;
    }

    let mut wins: HashMap<String, usize> = HashMap::new();
    let mut draws = 0usize;
    for result in run_games(&map, &config) {
        match result {
            Ok(record) => {
                report_game(record.index, config.num_games, &record.winner, record.turns);
                match record.winner {
                    Some(name) => *wins.entry(name).or_insert(0) += 1,
                    None => draws += 1,
                }
            }
            Err(e) => {
                eprintln!("game aborted: {}", e);
                process::exit(1);
            }
        }
    }
    report_summary(&wins, draws);
}

fn report_game(index: usize, total: usize, winner: &Option<String>, turns: u32) {
    let outcome = match winner {
        Some(name) => format!("{} wins", name),
        None => "draw".to_string(),
    };
    eprintln!("Game {}/{}: {} in {} turns", index + 1, total, outcome, turns);
}

fn report_summary(wins: &HashMap<String, usize>, draws: usize) {
    let mut names: Vec<&String> = wins.keys().collect();
    names.sort();
    for name in names {
        eprintln!("{}: {} wins", name, wins[name]);
    }
    if draws > 0 {
        eprintln!("draws: {}", draws);
    }
}

fn print_usage() {
    eprintln!("Usage: hegemon [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N       Number of games to play (default: 10)");
    eprintln!("  --players N     Seats per game, 2 selects the 2-player variant (default: 3)");
    eprintln!("  --seed N        Master seed, 0 for entropy (default: 0)");
    eprintln!("  --threads N     Parallel games (default: 1)");
    eprintln!("  --max-turns N   Round cap before a draw (default: 200)");
    eprintln!("  --retries N     Invalid proposals tolerated per solicitation (default: 5)");
    eprintln!("  --map FILE      Map document path (default: bundled classic map)");
    eprintln!("  --events        Print every game event as a JSON line");
}
