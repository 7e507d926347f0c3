// Copyright 2026 the Fixpoint Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Control-flow graph view and a simple adjacency-list graph.

use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

/// Read-only view of a forward control-flow graph with a unique entry node.
///
/// Nodes are cheap-to-copy handles (indices, ids, references) with equality
/// and a hash. The engine borrows the graph for the duration of a run and
/// never relies on node identity beyond `Eq` and `Hash`.
pub trait ControlFlowGraph {
    /// Node handle.
    type Node: Copy + Eq + Hash;

    /// The unique entry node.
    ///
    /// Calling this on a graph without nodes is a precondition violation.
    fn entry(&self) -> Self::Node;

    /// Nodes reached by an edge out of `node`.
    ///
    /// The enumeration order is part of the input: it determines the weak
    /// topological order and thereby the exact visit sequence.
    fn successors(&self, node: Self::Node) -> impl Iterator<Item = Self::Node>;

    /// Nodes with an edge into `node`.
    fn predecessors(&self, node: Self::Node) -> impl Iterator<Item = Self::Node>;
}

/// Node id of an [`AdjacencyGraph`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Returns the raw index.
    #[must_use]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A growable adjacency-list CFG.
///
/// This is the graph the test suite, the benchmarks and the examples build
/// on; the engine itself only ever sees [`ControlFlowGraph`]. The first node
/// added becomes the entry unless [`AdjacencyGraph::set_entry`] says
/// otherwise.
#[derive(Clone, Debug, Default)]
pub struct AdjacencyGraph {
    succs: Vec<Vec<NodeId>>,
    preds: Vec<Vec<NodeId>>,
    entry: Option<NodeId>,
}

impl AdjacencyGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its id.
    pub fn add_node(&mut self) -> NodeId {
        let id = NodeId(u32::try_from(self.succs.len()).expect("node count fits in u32"));
        self.succs.push(Vec::new());
        self.preds.push(Vec::new());
        if self.entry.is_none() {
            self.entry = Some(id);
        }
        id
    }

    /// Adds the directed edge `src -> dst`.
    ///
    /// Parallel edges are kept and contribute to joins once each; most
    /// callers do not want them.
    pub fn add_edge(&mut self, src: NodeId, dst: NodeId) {
        assert!(src.index() < self.succs.len(), "edge source out of range");
        assert!(dst.index() < self.succs.len(), "edge target out of range");
        self.succs[src.index()].push(dst);
        self.preds[dst.index()].push(src);
    }

    /// Overrides the entry node.
    pub fn set_entry(&mut self, entry: NodeId) {
        assert!(entry.index() < self.succs.len(), "entry out of range");
        self.entry = Some(entry);
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.succs.len()
    }

    /// All node ids, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        // add_node keeps the count within u32.
        (0..self.succs.len()).map(|i| NodeId(i as u32))
    }
}

impl ControlFlowGraph for AdjacencyGraph {
    type Node = NodeId;

    fn entry(&self) -> NodeId {
        self.entry.expect("graph has no entry node")
    }

    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.succs[node.index()].iter().copied()
    }

    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.preds[node.index()].iter().copied()
    }
}
