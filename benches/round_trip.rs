use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use massive_encoding::{from_slice, to_vec};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
struct Reading {
    sensor: u32,
    value: f64,
    flagged: bool,
    note: Option<String>,
}

fn readings(count: usize) -> Vec<Reading> {
    let mut rng = rand::rng();
    (0..count)
        .map(|i| Reading {
            sensor: rng.random(),
            value: rng.random(),
            flagged: rng.random(),
            note: (i % 4 == 0).then(|| format!("note-{}", i)),
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("serde_round_trip");
    for count in [10usize, 1_000] {
        let values = readings(count);
        let bytes = to_vec(&values).unwrap();

        group.bench_with_input(BenchmarkId::new("to_vec", count), &values, |b, values| {
            b.iter(|| black_box(to_vec(values).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("from_slice", count), &bytes, |b, bytes| {
            b.iter(|| black_box(from_slice::<Vec<Reading>>(bytes).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
