use criterion::{black_box, criterion_group, criterion_main, Criterion};

use reviewxp::progression::{level_for, LevelCurve};

fn bench_level_for(c: &mut Criterion) {
    c.bench_function("level_for early game", |b| {
        b.iter(|| level_for(black_box(1_500)))
    });

    c.bench_function("level_for at cap", |b| {
        b.iter(|| level_for(black_box(i64::MAX)))
    });

    let steep = LevelCurve { factor: 2.0, ..LevelCurve::default() };
    c.bench_function("steep curve", |b| {
        b.iter(|| steep.progress(black_box(1_000_000)))
    });
}

criterion_group!(benches, bench_level_for);
criterion_main!(benches);
