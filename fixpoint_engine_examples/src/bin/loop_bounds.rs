// Copyright 2026 the Fixpoint Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interval analysis of a counting loop.
//!
//! Builds the CFG of `let mut i = 0; while i < N { i += 1; }` and runs the
//! interleaved fixpoint over an interval domain: widening first drives the
//! loop head to `[0, +inf)`, narrowing then pulls the bound back to
//! `[0, N]`, and the exit edge filter pins `i` to exactly `N`.
//!
//! Usage: `loop_bounds [N]` (default 10).

use std::fmt;

use anyhow::{Context, Result};
use fixpoint_engine::{
    AbstractDomain, AdjacencyGraph, Analyzer, InterleavedFixpointIterator, NodeId,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Bound {
    NegInf,
    Int(i64),
    PosInf,
}

impl Bound {
    fn plus(self, delta: i64) -> Bound {
        match self {
            Bound::Int(v) => Bound::Int(v + delta),
            inf => inf,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::NegInf => write!(f, "-inf"),
            Bound::Int(v) => write!(f, "{v}"),
            Bound::PosInf => write!(f, "+inf"),
        }
    }
}

/// Interval lattice over the loop counter.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Interval {
    Bottom,
    Range(Bound, Bound),
}

impl Interval {
    fn singleton(value: i64) -> Interval {
        Interval::Range(Bound::Int(value), Bound::Int(value))
    }

    fn meet(&self, other: &Interval) -> Interval {
        match (self, other) {
            (Interval::Bottom, _) | (_, Interval::Bottom) => Interval::Bottom,
            (Interval::Range(a, b), Interval::Range(c, d)) => {
                let lo = (*a).max(*c);
                let hi = (*b).min(*d);
                if lo > hi {
                    Interval::Bottom
                } else {
                    Interval::Range(lo, hi)
                }
            }
        }
    }

    fn shift(&self, delta: i64) -> Interval {
        match self {
            Interval::Bottom => Interval::Bottom,
            Interval::Range(lo, hi) => Interval::Range(lo.plus(delta), hi.plus(delta)),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interval::Bottom => write!(f, "_|_"),
            Interval::Range(lo, hi) => write!(f, "[{lo}, {hi}]"),
        }
    }
}

impl AbstractDomain for Interval {
    fn bottom() -> Self {
        Interval::Bottom
    }

    fn leq(&self, other: &Self) -> bool {
        match (self, other) {
            (Interval::Bottom, _) => true,
            (_, Interval::Bottom) => false,
            (Interval::Range(a, b), Interval::Range(c, d)) => c <= a && b <= d,
        }
    }

    fn join_with(&mut self, other: Self) {
        match (&mut *self, other) {
            (_, Interval::Bottom) => {}
            (this @ Interval::Bottom, rest) => *this = rest,
            (Interval::Range(a, b), Interval::Range(c, d)) => {
                *a = (*a).min(c);
                *b = (*b).max(d);
            }
        }
    }

    fn widen_with(&mut self, other: Self) {
        match (&mut *self, other) {
            (_, Interval::Bottom) => {}
            (this @ Interval::Bottom, rest) => *this = rest,
            (Interval::Range(a, b), Interval::Range(c, d)) => {
                if c < *a {
                    *a = Bound::NegInf;
                }
                if d > *b {
                    *b = Bound::PosInf;
                }
            }
        }
    }

    fn narrow_with(&mut self, other: Self) {
        match (&mut *self, other) {
            (Interval::Bottom, _) => {}
            (this, Interval::Bottom) => *this = Interval::Bottom,
            (Interval::Range(a, b), Interval::Range(c, d)) => {
                if *a == Bound::NegInf {
                    *a = c;
                }
                if *b == Bound::PosInf {
                    *b = d;
                }
            }
        }
    }
}

/// The loop under analysis, plus printable node names for the result walk.
struct CountingLoop {
    entry: NodeId,
    head: NodeId,
    body: NodeId,
    exit: NodeId,
    bound: i64,
}

impl CountingLoop {
    fn name(&self, node: NodeId) -> &'static str {
        if node == self.entry {
            "entry"
        } else if node == self.head {
            "head"
        } else if node == self.body {
            "body"
        } else {
            "exit"
        }
    }
}

impl Analyzer<AdjacencyGraph> for CountingLoop {
    type Domain = Interval;

    fn analyze_node(&mut self, node: NodeId, pre: Interval) -> Interval {
        if node == self.entry {
            // i = 0
            Interval::singleton(0)
        } else {
            pre
        }
    }

    fn analyze_edge(&mut self, src: NodeId, dst: NodeId, post: Interval) -> Interval {
        if (src, dst) == (self.body, self.head) {
            // i += 1
            post.shift(1)
        } else if (src, dst) == (self.head, self.body) {
            // i < N
            post.meet(&Interval::Range(Bound::NegInf, Bound::Int(self.bound - 1)))
        } else if (src, dst) == (self.head, self.exit) {
            // i >= N
            post.meet(&Interval::Range(Bound::Int(self.bound), Bound::PosInf))
        } else {
            post
        }
    }

    fn process_pre(&mut self, node: NodeId, pre: &Interval) {
        println!("{:>5}: pre  = {pre}", self.name(node));
    }

    fn process_post(&mut self, node: NodeId, post: &Interval) {
        println!("{:>5}: post = {post}", self.name(node));
    }
}

fn main() -> Result<()> {
    let bound = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<i64>()
            .context("loop bound must be an integer")?,
        None => 10,
    };

    let mut graph = AdjacencyGraph::new();
    let entry = graph.add_node();
    let head = graph.add_node();
    let body = graph.add_node();
    let exit = graph.add_node();
    graph.add_edge(entry, head);
    graph.add_edge(head, body);
    graph.add_edge(body, head);
    graph.add_edge(head, exit);

    let mut analyzer = CountingLoop {
        entry,
        head,
        body,
        exit,
        bound,
    };

    let mut iterator = InterleavedFixpointIterator::new(&graph);
    println!("wto: {}", iterator.wto());
    iterator.run(&mut analyzer, Interval::Bottom);

    println!();
    println!("loop head settles at {}", iterator.pre(head));
    println!("after the loop, i is {}", iterator.pre(exit));
    Ok(())
}
