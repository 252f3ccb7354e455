use core::hint::black_box;
use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use uniswap_v4_migrator::prelude::*;

fn generate_tick_inputs() -> Vec<i32> {
    let mut inputs = (-128..=128).map(|i| i * 6_931).collect::<Vec<_>>();

    // Add edge cases
    inputs.extend([MIN_TICK, MAX_TICK, 0, 200_311, -201_335]);

    inputs
}

fn price_tick_round_trip(c: &mut Criterion) {
    let inputs = generate_tick_inputs();
    let mut group = c.benchmark_group("price_tick_round_trip");
    group.throughput(Throughput::Elements(inputs.len() as u64));

    group.bench_function("tick_to_price", |b| {
        b.iter(|| {
            for tick in &inputs {
                let _ = black_box(tick_to_price(*tick));
            }
        })
    });

    let prices: Vec<_> = inputs.iter().map(|tick| tick_to_price(*tick)).collect();
    group.bench_function("price_to_tick", |b| {
        b.iter(|| {
            for price in &prices {
                let _ = black_box(price_to_tick(*price, 60, false));
            }
        })
    });

    group.bench_function("display_price_to_tick", |b| {
        let adjustment = decimals_adjustment(6, 18);
        b.iter(|| {
            let _ = black_box(display_price_to_tick("2000.5", adjustment, false, 10, true));
        })
    });

    group.finish();
}

fn compute_range_presets(c: &mut Criterion) {
    let inputs = generate_tick_inputs();
    let mut group = c.benchmark_group("compute_range");
    group.throughput(Throughput::Elements(inputs.len() as u64));

    for (label, selector) in RangeSelector::PRESETS {
        group.bench_function(label, |b| {
            b.iter(|| {
                for tick in &inputs {
                    let _ = black_box(compute_range(selector, Some(*tick), 60));
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, price_tick_round_trip, compute_range_presets);
criterion_main!(benches);
