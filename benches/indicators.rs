#[path = "../tests/fixtures/mod.rs"]
mod fixtures;

use crate::fixtures::{load_price_bars, load_reference_bars};

use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use std::{hint::black_box, num::NonZero, time::Duration};
use ta_verdict::{
    Ema, EmaConfig, IndicatorEngine, Macd, MacdConfig, Rsi, RsiConfig, SignalScorer, Sma,
    SmaConfig, export,
};

fn nz(n: usize) -> NonZero<usize> {
    NonZero::new(n).expect("non zero value")
}

fn stream_benchmarks(c: &mut Criterion) {
    let bars = load_reference_bars();
    let mut group = c.benchmark_group("stream");
    group.throughput(Throughput::Elements(bars.len() as u64));
    group.warm_up_time(Duration::from_secs(3));
    group.measurement_time(Duration::from_secs(5));

    macro_rules! stream_bench {
        ($name:expr, $ind_type:ty, $config:expr) => {
            group.bench_function($name, |b| {
                b.iter_batched(
                    || <$ind_type>::new($config),
                    |mut ind| {
                        for bar in &bars {
                            black_box(ind.compute(bar));
                        }
                    },
                    BatchSize::SmallInput,
                );
            });
        };
    }

    stream_bench!("sma50", Sma, SmaConfig::new(nz(50)));
    stream_bench!("sma200", Sma, SmaConfig::new(nz(200)));
    stream_bench!("ema12", Ema, EmaConfig::new(nz(12)));
    stream_bench!("rsi14", Rsi, RsiConfig::new(nz(14)));
    stream_bench!("macd", Macd, MacdConfig::default());

    group.finish();
}

fn engine_benchmarks(c: &mut Criterion) {
    let bars = load_price_bars();
    let engine = IndicatorEngine::default();
    let rows = engine.compute(&bars).expect("fixture is valid");
    let scorer = SignalScorer::default();

    let mut group = c.benchmark_group("engine");
    group.throughput(Throughput::Elements(bars.len() as u64));
    group.warm_up_time(Duration::from_secs(3));
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("compute", |b| {
        b.iter(|| black_box(engine.compute(black_box(&bars))));
    });

    group.bench_function("export_csv", |b| {
        b.iter(|| black_box(export::to_csv_string(black_box(&rows))));
    });

    group.finish();

    let last = rows.last().expect("fixture has rows");
    c.bench_function("score", |b| {
        b.iter(|| black_box(scorer.score(black_box(last))));
    });
}

criterion_group!(benches, stream_benchmarks, engine_benchmarks);
criterion_main!(benches);
