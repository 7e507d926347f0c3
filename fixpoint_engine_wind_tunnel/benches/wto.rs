// Copyright 2026 the Fixpoint Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wind-tunnel benchmarks for WTO construction.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use fixpoint_engine::Wto;
use fixpoint_engine_wind_tunnel::{build_chain, build_diamond_ladder, build_loop_nest};

fn bench_wto(c: &mut Criterion) {
    bench_chain(c);
    bench_loop_nest(c);
    bench_diamond_ladder(c);
}

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("wto_chain");
    for len in [64_usize, 512, 4096] {
        let g = build_chain(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &g, |b, g| {
            b.iter(|| Wto::new(black_box(g)));
        });
    }
    group.finish();
}

fn bench_loop_nest(c: &mut Criterion) {
    let mut group = c.benchmark_group("wto_loop_nest");
    for depth in [2_usize, 8, 32] {
        let g = build_loop_nest(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &g, |b, g| {
            b.iter(|| Wto::new(black_box(g)));
        });
    }
    group.finish();
}

fn bench_diamond_ladder(c: &mut Criterion) {
    let mut group = c.benchmark_group("wto_diamond_ladder");
    for rungs in [16_usize, 128, 1024] {
        let g = build_diamond_ladder(rungs);
        group.bench_with_input(BenchmarkId::from_parameter(rungs), &g, |b, g| {
            b.iter(|| Wto::new(black_box(g)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_wto);
criterion_main!(benches);
