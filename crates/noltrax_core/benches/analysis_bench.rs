//! Benchmarks for session normalization and the full analysis pipeline
//!
//! Run with: cargo bench -p noltrax_core --bench analysis_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use noltrax_core::{analyze, normalize_session, AnalysisConfig};
use serde_json::{json, Value};

const ACTIONS: [&str; 6] = ["Pass", "Pressing", "Shot", "Tackle", "Cross", "Build-up"];

/// Match-export document with `count` events spread over 90 minutes
fn generate_session(count: usize) -> Value {
    let timeline: Vec<Value> = (0..count)
        .map(|i| {
            let t = (i * 5400 / count.max(1)) as u64;
            json!({
                "actionType": ACTIONS[(i * 7) % ACTIONS.len()],
                "minute": t / 60,
                "second": t % 60
            })
        })
        .collect();

    let players: Vec<Value> = (0..11)
        .map(|i| {
            let y = if i == 0 { 4.0 } else { 20.0 + 30.0 * ((i - 1) / 4) as f64 };
            json!({"number": (i + 1).to_string(), "x": 10.0 + 8.0 * i as f64, "y": y})
        })
        .collect();

    json!({
        "meta": {"matchName": "Benchmark", "matchDate": "2024-01-01"},
        "timeline": timeline,
        "pitchData": {
            "pitch1": {"players": players.clone(), "arrows": []},
            "pitch2": {"players": players, "arrows": []}
        },
        "strategyNotes": {"controlNotes": "Keep the ball on the left side"}
    })
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_session");

    for size in [100, 1_000, 10_000].iter() {
        let doc = generate_session(*size);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| normalize_session(black_box(&doc)));
        });
    }

    group.finish();
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");

    for (name, config) in [
        ("fixed", AnalysisConfig::default()),
        ("legacy", AnalysisConfig::legacy()),
    ] {
        for size in [100, 1_000, 10_000].iter() {
            let session = normalize_session(&generate_session(*size));

            group.throughput(Throughput::Elements(*size as u64));
            group.bench_with_input(BenchmarkId::new(name, size), size, |b, _| {
                b.iter(|| analyze(black_box(&session), &config));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_analyze);
criterion_main!(benches);
