#![allow(clippy::unwrap_used)]
//! Benchmarks for exposure calculation and sensor simulation

#![allow(missing_docs)]

use criterion::{Criterion, criterion_group, criterion_main};
use lightmeter::exposure::{MeteringMode, compute};
use lightmeter::simulation::SimulationModel;
use std::hint::black_box;

fn bench_compute_per_mode(c: &mut Criterion) {
    let mut model = SimulationModel::from_seed(1);
    let grid = model.generate(MeteringMode::Matrix);

    for mode in MeteringMode::ALL {
        c.bench_function(&format!("compute_{mode}"), |b| {
            b.iter(|| {
                let result = compute(black_box(&grid), mode, 400, 128.0).unwrap();
                black_box(result);
            });
        });
    }
}

fn bench_simulation_generate(c: &mut Criterion) {
    let mut model = SimulationModel::from_seed(1);

    c.bench_function("simulation_generate", |b| {
        b.iter(|| {
            let grid = model.generate(black_box(MeteringMode::Highlight));
            black_box(grid);
        });
    });
}

fn bench_simulated_measurement(c: &mut Criterion) {
    let mut model = SimulationModel::from_seed(1);

    c.bench_function("simulated_measurement", |b| {
        b.iter(|| {
            let grid = model.generate(MeteringMode::Center);
            let result = compute(&grid, MeteringMode::Center, 100, 128.0).unwrap();
            black_box(result);
        });
    });
}

criterion_group!(
    benches,
    bench_compute_per_mode,
    bench_simulation_generate,
    bench_simulated_measurement
);
criterion_main!(benches);
