//! Criterion benchmarks for the exchange response adapters

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::path::PathBuf;

use pricewatch::services::synthetic::SyntheticGenerator;
use pricewatch::sources::{SourceAdapter, SourceRegistry};
use pricewatch::types::SourceId;

fn fixture(source: SourceId) -> Vec<u8> {
    let name = match source {
        SourceId::Binance => "binance.json",
        SourceId::Coinbase => "coinbase.json",
        SourceId::CoinGecko => "coingecko.json",
        SourceId::CryptoCompare => "cryptocompare.json",
        SourceId::Bitstamp => "bitstamp.json",
        _ => return Vec::new(),
    };
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read(&path).unwrap_or_default()
}

fn bench_parse_response(c: &mut Criterion) {
    let registry = SourceRegistry::new();
    let mut group = c.benchmark_group("adapter");

    for adapter in registry.adapters() {
        let body = fixture(adapter.id());
        if body.is_empty() {
            eprintln!("Warning: no fixture for {}", adapter.id());
            continue;
        }

        group.throughput(Throughput::Bytes(body.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("parse", adapter.id().name()),
            &body,
            |b, body| {
                b.iter(|| {
                    // simd-json parses in place, so every iteration needs a fresh copy
                    let mut copy = body.clone();
                    adapter.parse(black_box(&mut copy))
                });
            },
        );
    }

    group.finish();
}

fn bench_synthetic(c: &mut Criterion) {
    let generator = SyntheticGenerator::new();
    c.bench_function("synthetic_generate", |b| b.iter(|| generator.generate()));
}

criterion_group!(benches, bench_parse_response, bench_synthetic);
criterion_main!(benches);
