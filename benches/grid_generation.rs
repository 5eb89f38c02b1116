use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use greeksurf::surface::GridBuilder;
use greeksurf::{BlackScholes, OptionParameters, OptionType, SurfaceMetric};

fn base() -> OptionParameters {
    OptionParameters::new(100.0, 100.0, 0.5, 0.2, 0.01, 0.0, OptionType::Call)
}

fn bench_pricing(c: &mut Criterion) {
    let mut group = c.benchmark_group("pricing");
    let p = base();

    group.bench_function("price_only", |b| {
        b.iter(|| BlackScholes::new(black_box(&p)).price())
    });

    group.bench_function("price_and_greeks", |b| {
        b.iter(|| {
            let bs = BlackScholes::new(black_box(&p));
            (bs.price(), bs.greeks())
        })
    });

    group.finish();
}

fn bench_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid");
    let p = base();

    for steps in [20_usize, 40, 100, 200] {
        group.bench_with_input(BenchmarkId::new("price", steps), &steps, |b, &n| {
            b.iter(|| {
                GridBuilder::new()
                    .steps(n, n)
                    .build(black_box(&p))
                    .expect("benchmark grid should build")
            })
        });
    }

    for metric in SurfaceMetric::ALL {
        group.bench_with_input(BenchmarkId::new("metric_40", metric), &metric, |b, &m| {
            b.iter(|| {
                GridBuilder::new()
                    .metric(m)
                    .build(black_box(&p))
                    .expect("benchmark grid should build")
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pricing, bench_grid);
criterion_main!(benches);
