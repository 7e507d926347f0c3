// Copyright 2026 the Fixpoint Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wind-tunnel benchmarks for full fixpoint runs.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use fixpoint_engine::{
    AbstractDomain, AdjacencyGraph, Analyzer, ControlFlowGraph, InterleavedFixpointIterator,
    NodeId,
};
use fixpoint_engine_wind_tunnel::{build_chain, build_loop_nest};

/// Saturating step counter: joins keep the maximum, widening jumps straight
/// to the cap so loops stabilize in one extrapolation.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Steps(u64);

impl AbstractDomain for Steps {
    fn bottom() -> Self {
        Steps(0)
    }

    fn leq(&self, other: &Self) -> bool {
        self.0 <= other.0
    }

    fn join_with(&mut self, other: Self) {
        self.0 = self.0.max(other.0);
    }

    fn widen_with(&mut self, other: Self) {
        if other.0 > self.0 {
            self.0 = u64::MAX;
        }
    }

    fn narrow_with(&mut self, other: Self) {
        if self.0 == u64::MAX {
            self.0 = other.0;
        }
    }
}

/// Counts edge traversals; every edge adds one step.
struct StepCount;

impl Analyzer<AdjacencyGraph> for StepCount {
    type Domain = Steps;

    fn analyze_node(&mut self, _node: NodeId, pre: Steps) -> Steps {
        pre
    }

    fn analyze_edge(&mut self, _src: NodeId, _dst: NodeId, post: Steps) -> Steps {
        Steps(post.0.saturating_add(1))
    }
}

fn run_to_fixpoint(g: &AdjacencyGraph) -> Steps {
    let mut it = InterleavedFixpointIterator::new(g);
    it.run(&mut StepCount, Steps(0));
    it.post(g.entry()).clone()
}

fn bench_fixpoint(c: &mut Criterion) {
    bench_chain_run(c);
    bench_loop_nest_run(c);
}

fn bench_chain_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixpoint_chain");
    for len in [64_usize, 512, 4096] {
        let g = build_chain(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &g, |b, g| {
            b.iter(|| run_to_fixpoint(black_box(g)));
        });
    }
    group.finish();
}

fn bench_loop_nest_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixpoint_loop_nest");
    for depth in [2_usize, 8, 32] {
        let g = build_loop_nest(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &g, |b, g| {
            b.iter(|| run_to_fixpoint(black_box(g)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fixpoint);
criterion_main!(benches);
