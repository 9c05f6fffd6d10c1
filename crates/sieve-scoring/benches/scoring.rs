use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sieve_scoring::{
    MetricTable, MinMaxNormalizer, Normalizer, Polarity, RankResolver, ScoringConfig,
    ScoringEngine, WeightSpec,
};

const METRICS: [(&str, Polarity, f64); 10] = [
    ("ev_to_fcf", Polarity::LowerIsBetter, 0.12),
    ("revenue_cagr", Polarity::HigherIsBetter, 0.12),
    ("operating_margin", Polarity::HigherIsBetter, 0.15),
    ("fcf_margin", Polarity::HigherIsBetter, 0.12),
    ("gross_margin", Polarity::HigherIsBetter, 0.08),
    ("net_debt_to_ebitda", Polarity::LowerIsBetter, 0.08),
    ("interest_coverage", Polarity::HigherIsBetter, 0.08),
    ("roic", Polarity::HigherIsBetter, 0.10),
    ("capex_intensity", Polarity::LowerIsBetter, 0.08),
    ("inventory_turnover", Polarity::HigherIsBetter, 0.07),
];

fn spec() -> WeightSpec {
    let mut builder = WeightSpec::builder("bench");
    for (metric, polarity, weight) in METRICS {
        builder = builder.metric(metric, sieve_scoring::MetricWeight::new(polarity, weight));
    }
    builder.build().unwrap()
}

fn table(companies: usize) -> MetricTable {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut table = MetricTable::new();
    for i in 0..companies {
        let ticker = format!("C{i:05}");
        for (metric, _, _) in METRICS {
            let value = (rng.gen_range(0..10) != 0).then(|| rng.gen_range(-20.0..80.0));
            table.insert(ticker.clone(), metric, value);
        }
    }
    table
}

fn bench_normalize(c: &mut Criterion) {
    let table = table(5_000);
    let values = table.present_values("roic");

    c.bench_function("min_max_normalize_5000", |b| {
        b.iter(|| MinMaxNormalizer.normalize(black_box(&values), Polarity::HigherIsBetter));
    });
}

fn bench_rank(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let tickers: Vec<String> = (0..5_000).map(|i| format!("C{i:05}")).collect();
    // coarse grid so that ties actually occur
    let composites: Vec<Option<f64>> = tickers
        .iter()
        .map(|_| (rng.gen_range(0..20) != 0).then(|| f64::from(rng.gen_range(0..100u8)) / 100.0))
        .collect();
    let resolver = RankResolver::default();

    c.bench_function("rank_resolve_5000", |b| {
        b.iter(|| {
            resolver.resolve(
                tickers
                    .iter()
                    .zip(&composites)
                    .map(|(t, c)| (t.as_str(), *c)),
            )
        });
    });
}

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_score");
    for companies in [100, 1_000, 10_000] {
        let table = table(companies);
        for parallel in [false, true] {
            let engine = ScoringEngine::new(spec())
                .with_config(ScoringConfig {
                    parallel,
                    ..ScoringConfig::default()
                })
                .expect("default tie epsilon is valid");
            let label = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(label, companies), &table, |b, table| {
                b.iter(|| engine.score(black_box(table)));
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_normalize, bench_rank, bench_engine);
criterion_main!(benches);
