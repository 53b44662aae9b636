use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gemfall::core::{detect_all, has_any_legal_move, Engine, EngineConfig, Grid};

fn bench_detect_all(c: &mut Criterion) {
    let engine = Engine::new(8, 12345).unwrap();
    let grid = engine.grid().clone();

    c.bench_function("detect_all_8x8", |b| {
        b.iter(|| detect_all(black_box(&grid)))
    });
}

fn bench_legal_move_scan(c: &mut Criterion) {
    let engine = Engine::initialize(EngineConfig::new(16, 6), 12345).unwrap();
    let grid = engine.grid().clone();

    c.bench_function("has_any_legal_move_16x16", |b| {
        b.iter(|| has_any_legal_move(black_box(&grid)))
    });

    // Worst case: every swap is tried
    let deadlocked = Grid::parse(&[
        "ABCABC", //
        "BCABCA", //
        "CABCAB", //
        "ABCABC", //
        "BCABCA", //
        "CABCAB",
    ])
    .unwrap();
    c.bench_function("has_any_legal_move_deadlocked", |b| {
        b.iter(|| has_any_legal_move(black_box(&deadlocked)))
    });
}

fn bench_autoplay_action(c: &mut Criterion) {
    let mut engine = Engine::new(8, 12345).unwrap();

    c.bench_function("autoplay_action", |b| {
        b.iter(|| {
            if let Some((from, to)) = engine.find_legal_move() {
                let _ = black_box(engine.swap(from, to));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_detect_all,
    bench_legal_move_scan,
    bench_autoplay_action
);
criterion_main!(benches);
