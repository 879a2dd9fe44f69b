//! Performance benchmarks for the rules engine
//!
//! Measures the three hot paths a game server hits on every click:
//!
//! 1. **Legality** - `meets_requirements` for a menu refresh
//! 2. **Activation** - a full noon action from legality to the resolved event
//! 3. **Trigger window** - collecting and resolving forced triggers for one event

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use dtr_engine::{
    catalog,
    core::{AbilityBuilder, CardType, PlayerId},
    game::{Engine, EventData, EventName, GameState, Phase, PlayWindow, VerbosityLevel},
    zones::Location,
};

fn noon_engine() -> (Engine, PlayerId, catalog::SampleCard) {
    let mut state = GameState::new_two_player("Player 1", "Player 2", 10);
    state.logger.set_verbosity(VerbosityLevel::Silent);
    state.round.phase = Phase::HighNoon;
    state.round.play_window = Some(PlayWindow::Noon);
    let p1 = state.players[0].id;
    let mut engine = Engine::new(state);
    let allie = catalog::allie_hensman(&mut engine, p1, Location::PlayArea)
        .expect("Failed to create sample card");
    (engine, p1, allie)
}

fn bench_legality(c: &mut Criterion) {
    let (engine, p1, allie) = noon_engine();
    let p2 = engine.state.players[1].id;

    let mut group = c.benchmark_group("legality");
    group.bench_function("meets_requirements/legal", |b| {
        b.iter(|| engine.meets_requirements(black_box(allie.ability()), black_box(p1)))
    });
    group.bench_function("meets_requirements/wrong_player", |b| {
        b.iter(|| engine.meets_requirements(black_box(allie.ability()), black_box(p2)))
    });
    group.finish();
}

fn bench_activation(c: &mut Criterion) {
    c.bench_function("activation/noon_action", |b| {
        b.iter_batched(
            noon_engine,
            |(mut engine, p1, allie)| {
                engine
                    .execute(allie.ability(), p1)
                    .expect("Activation should not error")
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_trigger_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("trigger_window");

    for count in [1usize, 8, 32] {
        let make = move || {
            let mut state = GameState::new_two_player("Player 1", "Player 2", 0);
            state.logger.set_verbosity(VerbosityLevel::Silent);
            let players: Vec<_> = state.players.iter().map(|p| p.id).collect();
            let mut engine = Engine::new(state);
            for i in 0..count {
                let owner = players[i % players.len()];
                let card = engine
                    .state
                    .create_card(owner, format!("Deed {i}"), CardType::Deed, Location::PlayArea);
                engine
                    .add_ability(
                        card,
                        AbilityBuilder::forced()
                            .when(EventName::PhaseStarted, |_, _| true)
                            .handler(|engine, ctx| engine.state.gain_ghost_rock(ctx.player, 1)),
                    )
                    .expect("Failed to add trigger");
            }
            engine
        };

        group.bench_with_input(BenchmarkId::new("forced", count), &count, |b, _| {
            b.iter_batched(
                make,
                |mut engine| {
                    engine
                        .raise_event(EventData::PhaseStarted {
                            phase: Phase::Upkeep,
                        })
                        .expect("Window should resolve")
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_legality, bench_activation, bench_trigger_window);
criterion_main!(benches);
