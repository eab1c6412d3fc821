use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use watbal::prelude::*;

pub fn aggregate_benchmark(c: &mut Criterion) {
    let mut cell = CellWater::default();
    cell.soil_moisture = 0.4;
    cell.precipitation = 0.01;
    let cells = vec![cell; 10_000];
    let mask = vec![true; 10_000];
    c.bench_function("aggregate_10k", |b| {
        b.iter(|| aggregate(black_box(&cells), black_box(&mask)))
    });
}

pub fn step_benchmark(c: &mut Criterion) {
    let mut totals = BasinTotals::default();
    totals.precipitation = 0.01;
    totals.evapotranspiration = 0.002;
    totals.soil_moisture = 0.4;
    let when = NaiveDate::from_ymd_opt(2020, 10, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    c.bench_function("balance_year", |b| {
        b.iter(|| {
            let mut mass = MassBalance::new(0.4);
            for _ in 0..365 {
                mass.step(black_box(when), &totals);
            }
            mass.summary()
        })
    });
}

criterion_group!(benches, aggregate_benchmark, step_benchmark);
criterion_main!(benches);
