//! Simulator throughput benchmarks: headless combats per second.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use scrapfall::data::registry::GameData;
use scrapfall::data::run_state::RunState;
use scrapfall::sim::engine::CombatConfig;
use scrapfall::sim::headless::run_headless;

fn bench_headless(c: &mut Criterion) {
    let data = GameData::builtin();

    let mut group = c.benchmark_group("simulator");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("headless_stage_1", |b| {
        b.iter(|| {
            let replay = run_headless(
                data.clone(),
                CombatConfig {
                    seed: black_box(7),
                    ..CombatConfig::default()
                },
                RunState::new(150),
                3000,
            )
            .expect("builtin pilot");
            black_box(replay.final_stats.ticks)
        })
    });

    group.bench_function("headless_boss_stage_5", |b| {
        b.iter(|| {
            let replay = run_headless(
                data.clone(),
                CombatConfig {
                    stage: black_box(5),
                    seed: black_box(7),
                    ..CombatConfig::default()
                },
                RunState::new(150),
                6000,
            )
            .expect("builtin pilot");
            black_box(replay.final_stats.ticks)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_headless);
criterion_main!(benches);
