// Copyright 2026 the Fixpoint Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Weak topological order (WTO) of a control-flow graph.
//!
//! A WTO is a hierarchical ordering of the nodes reachable from the entry: a
//! sequence of components, each either a plain vertex or a cycle headed by
//! the node through which the depth-first search entered its strongly
//! connected region, with the rest of the region decomposed recursively.
//! Fixpoint iteration that follows this order and stabilizes every cycle
//! before moving past it converges on cyclic graphs. The construction is
//! Bourdoncle's recursive decomposition.

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::graph::ControlFlowGraph;

/// One element of a weak topological order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WtoComponent<N> {
    /// A node outside any cycle at this nesting level.
    Vertex(N),
    /// A strongly connected region.
    Cycle(WtoCycle<N>),
}

/// A cycle component: the head plus the ordered decomposition of the rest of
/// its strongly connected region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WtoCycle<N> {
    head: N,
    components: Vec<WtoComponent<N>>,
}

impl<N: Copy> WtoCycle<N> {
    /// The node through which the search entered the region; the only node
    /// of the cycle where widening and narrowing are applied.
    #[must_use]
    pub fn head(&self) -> N {
        self.head
    }

    /// Inner components in order, the head excluded.
    #[must_use]
    pub fn components(&self) -> &[WtoComponent<N>] {
        &self.components
    }
}

/// Chain of cycle heads enclosing a node, outermost first.
///
/// Nestings are partially ordered by strict prefix extension: a node deeper
/// inside a cycle compares greater than the cycle's own nesting, and
/// nestings of unrelated branches are unordered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nesting<N> {
    heads: Vec<N>,
}

impl<N: Copy + Eq> Nesting<N> {
    /// Enclosing cycle heads, outermost to innermost.
    #[must_use]
    pub fn heads(&self) -> &[N] {
        &self.heads
    }
}

impl<N: Eq> PartialOrd for Nesting<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.heads.len().cmp(&other.heads.len()) {
            Ordering::Equal => (self.heads == other.heads).then_some(Ordering::Equal),
            Ordering::Less => {
                (other.heads[..self.heads.len()] == self.heads[..]).then_some(Ordering::Less)
            }
            Ordering::Greater => {
                (self.heads[..other.heads.len()] == other.heads[..]).then_some(Ordering::Greater)
            }
        }
    }
}

/// A weak topological order of the nodes reachable from a graph's entry.
#[derive(Clone, Debug)]
pub struct Wto<N> {
    components: Vec<WtoComponent<N>>,
    nesting: HashMap<N, Nesting<N>>,
}

impl<N: Copy + Eq + Hash> Wto<N> {
    /// Builds the order for `graph`.
    ///
    /// Linear in nodes plus edges. Nodes unreachable from the entry do not
    /// appear in the order and have no nesting.
    pub fn new<G>(graph: &G) -> Self
    where
        G: ControlFlowGraph<Node = N>,
    {
        let mut builder = Builder {
            graph,
            dfn: HashMap::new(),
            stack: Vec::new(),
            num: 0,
        };
        let mut components = Vec::new();
        builder.visit(graph.entry(), &mut components);
        components.reverse();

        let mut nesting = HashMap::new();
        let mut chain = Vec::new();
        collect_nesting(&components, &mut chain, &mut nesting);

        Self {
            components,
            nesting,
        }
    }

    /// Top-level components in order.
    #[must_use]
    pub fn components(&self) -> &[WtoComponent<N>] {
        &self.components
    }

    /// The nesting of `node`, or `None` if the node is unreachable.
    ///
    /// The nesting of a cycle head is the chain of heads strictly enclosing
    /// its cycle; the head itself is not part of it. A predecessor sits on a
    /// back edge into a head exactly when its nesting compares greater than
    /// the head's.
    #[must_use]
    pub fn nesting(&self, node: N) -> Option<&Nesting<N>> {
        self.nesting.get(&node)
    }
}

impl<N: fmt::Display> fmt::Display for WtoComponent<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex(node) => write!(f, "{node}"),
            Self::Cycle(cycle) => write!(f, "{cycle}"),
        }
    }
}

impl<N: fmt::Display> fmt::Display for WtoCycle<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.head)?;
        for component in &self.components {
            write!(f, " {component}")?;
        }
        write!(f, ")")
    }
}

impl<N: fmt::Display> fmt::Display for Wto<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for component in &self.components {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            write!(f, "{component}")?;
        }
        Ok(())
    }
}

// Depth-first numbers: UNVISITED marks a node the search has not reached,
// DONE a node whose component is already emitted.
const UNVISITED: u32 = 0;
const DONE: u32 = u32::MAX;

struct Builder<'g, G: ControlFlowGraph> {
    graph: &'g G,
    dfn: HashMap<G::Node, u32>,
    stack: Vec<G::Node>,
    num: u32,
}

impl<G: ControlFlowGraph> Builder<'_, G> {
    fn dfn(&self, node: G::Node) -> u32 {
        self.dfn.get(&node).copied().unwrap_or(UNVISITED)
    }

    /// Bourdoncle's `visit`: returns the smallest depth-first number
    /// reachable from `vertex`. Completed components are pushed onto
    /// `partition` in reverse order; the caller reverses once at the end.
    fn visit(&mut self, vertex: G::Node, partition: &mut Vec<WtoComponent<G::Node>>) -> u32 {
        let graph = self.graph;
        self.stack.push(vertex);
        self.num += 1;
        let number = self.num;
        self.dfn.insert(vertex, number);

        let mut head = number;
        let mut in_loop = false;
        for succ in graph.successors(vertex) {
            let succ_dfn = self.dfn(succ);
            let min = if succ_dfn == UNVISITED {
                self.visit(succ, partition)
            } else {
                succ_dfn
            };
            if min <= head {
                head = min;
                in_loop = true;
            }
        }

        if head == number {
            self.dfn.insert(vertex, DONE);
            let mut element = self.stack.pop().expect("vertex is on the stack");
            if in_loop {
                while element != vertex {
                    // Region nodes restart unvisited so the recursive
                    // decomposition can renumber them.
                    self.dfn.insert(element, UNVISITED);
                    element = self.stack.pop().expect("head is still on the stack");
                }
                partition.push(WtoComponent::Cycle(self.cycle(vertex)));
            } else {
                partition.push(WtoComponent::Vertex(vertex));
            }
        }
        head
    }

    /// Decomposes the strongly connected region entered at `head` into the
    /// cycle's inner order.
    fn cycle(&mut self, head: G::Node) -> WtoCycle<G::Node> {
        let graph = self.graph;
        let mut components = Vec::new();
        for succ in graph.successors(head) {
            if self.dfn(succ) == UNVISITED {
                self.visit(succ, &mut components);
            }
        }
        components.reverse();
        WtoCycle {
            head,
            components,
        }
    }
}

fn collect_nesting<N: Copy + Eq + Hash>(
    components: &[WtoComponent<N>],
    chain: &mut Vec<N>,
    table: &mut HashMap<N, Nesting<N>>,
) {
    for component in components {
        match component {
            WtoComponent::Vertex(node) => {
                table.insert(
                    *node,
                    Nesting {
                        heads: chain.clone(),
                    },
                );
            }
            WtoComponent::Cycle(cycle) => {
                // The head records the nesting of the cycle itself, not its
                // own position inside it.
                table.insert(
                    cycle.head,
                    Nesting {
                        heads: chain.clone(),
                    },
                );
                chain.push(cycle.head);
                collect_nesting(&cycle.components, chain, table);
                chain.pop();
            }
        }
    }
}
