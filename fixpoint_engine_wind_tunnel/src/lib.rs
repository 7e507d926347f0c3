// Copyright 2026 the Fixpoint Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared CFG builders for the wind-tunnel benchmarks.

use fixpoint_engine::{AdjacencyGraph, NodeId};

/// Straight-line chain of `len` nodes.
#[must_use]
pub fn build_chain(len: usize) -> AdjacencyGraph {
    let mut g = AdjacencyGraph::new();
    let nodes: Vec<NodeId> = (0..len).map(|_| g.add_node()).collect();
    for pair in nodes.windows(2) {
        g.add_edge(pair[0], pair[1]);
    }
    g
}

/// `depth` nested loops around a single innermost body node.
///
/// Shape: entry, a chain of loop heads, the body, then one latch per head on
/// the way back out, and a final exit node.
#[must_use]
pub fn build_loop_nest(depth: usize) -> AdjacencyGraph {
    let mut g = AdjacencyGraph::new();
    let entry = g.add_node();
    let mut heads = Vec::new();
    let mut prev = entry;
    for _ in 0..depth {
        let head = g.add_node();
        g.add_edge(prev, head);
        heads.push(head);
        prev = head;
    }
    let body = g.add_node();
    g.add_edge(prev, body);
    let mut tail = body;
    for &head in heads.iter().rev() {
        let latch = g.add_node();
        g.add_edge(tail, latch);
        g.add_edge(latch, head);
        tail = latch;
    }
    let exit = g.add_node();
    g.add_edge(tail, exit);
    g
}

/// A ladder of `rungs` if/else diamonds back to back.
#[must_use]
pub fn build_diamond_ladder(rungs: usize) -> AdjacencyGraph {
    let mut g = AdjacencyGraph::new();
    let mut join = g.add_node();
    for _ in 0..rungs {
        let left = g.add_node();
        let right = g.add_node();
        let next = g.add_node();
        g.add_edge(join, left);
        g.add_edge(join, right);
        g.add_edge(left, next);
        g.add_edge(right, next);
        join = next;
    }
    g
}
