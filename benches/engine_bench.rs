use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rand::rngs::SmallRng;
use rand::SeedableRng;

use hegemon::actions::legal_templates;
use hegemon::board::map::MapGraph;
use hegemon::engine::{EngineConfig, TurnController};
use hegemon::event::NullSink;
use hegemon::selfplay::{play_game, SelfPlayConfig};

const CLASSIC_MAP: &str = include_str!("../maps/classic.json");

/// A controller advanced past setup into the first REINFORCE phase.
fn mid_game_controller(map: &MapGraph) -> TurnController<'_> {
    let mut rng = SmallRng::seed_from_u64(42);
    let seats = [("P1", "Red"), ("P2", "Blue"), ("P3", "Green")];
    let mut controller =
        TurnController::new(map, &seats, EngineConfig::default(), &mut rng).unwrap();
    let mut sink = NullSink;
    while controller.state().phase.is_setup() {
        let action = controller.fallback_action().unwrap();
        controller.apply(&action, None, &mut rng, &mut sink).unwrap();
    }
    controller
}

fn bench_map_load(c: &mut Criterion) {
    c.bench_function("map_load_classic", |b| {
        b.iter(|| MapGraph::from_json(black_box(CLASSIC_MAP)).unwrap())
    });
}

fn bench_template_generation(c: &mut Criterion) {
    let map = MapGraph::from_json(CLASSIC_MAP).unwrap();
    let controller = mid_game_controller(&map);
    c.bench_function("legal_templates_reinforce", |b| {
        b.iter(|| legal_templates(black_box(&map), black_box(controller.state())))
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let map = MapGraph::from_json(CLASSIC_MAP).unwrap();
    let controller = mid_game_controller(&map);
    c.bench_function("state_snapshot", |b| b.iter(|| controller.snapshot()));
}

fn bench_full_game(c: &mut Criterion) {
    let map = MapGraph::from_json(CLASSIC_MAP).unwrap();
    let config = SelfPlayConfig {
        num_games: 1,
        players: 3,
        seed: 1,
        threads: 1,
        engine: EngineConfig {
            max_invalid_proposals: 5,
            max_turns: 20,
        },
    };
    c.bench_function("full_game_20_turn_cap", |b| {
        b.iter(|| {
            let mut sink = NullSink;
            play_game(black_box(&map), &config, 0, 7, &mut sink).unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_map_load,
    bench_template_generation,
    bench_snapshot,
    bench_full_game,
);
criterion_main!(benches);
