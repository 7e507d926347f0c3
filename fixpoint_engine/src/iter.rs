// Copyright 2026 the Fixpoint Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interleaved widening/narrowing fixpoint iteration over a WTO.
//!
//! Each cycle of the order is stabilized on its own: increasing iterations
//! with widening until a post-fixpoint is reached at the head, then
//! decreasing iterations with narrowing until the refinement stops. Inner
//! cycles run this scheme recursively and settle completely within every
//! iteration of their enclosing cycle, which keeps widening local to the
//! loop that actually needs it.

use crate::domain::AbstractDomain;
use crate::graph::ControlFlowGraph;
use crate::invariants::{InvariantTable, Snapshot};
use crate::wto::{Nesting, Wto, WtoComponent, WtoCycle};

/// Client-supplied analysis: transfer functions, result sinks and the
/// widening/narrowing strategy.
///
/// Only the two transfer functions are required. The sinks default to
/// no-ops, and the strategy hooks default to the standard interleaved
/// scheme: join on the first increasing iteration, widen afterwards,
/// narrow through the decreasing phase.
pub trait Analyzer<G: ControlFlowGraph> {
    /// The abstract domain the analysis runs on.
    type Domain: AbstractDomain;

    /// Forward transfer for `node`: maps the state at node entry to the
    /// state at node exit.
    fn analyze_node(&mut self, node: G::Node, pre: Self::Domain) -> Self::Domain;

    /// Edge transfer for `src -> dst`, typically filtering on the branch
    /// condition guarding the edge.
    fn analyze_edge(&mut self, src: G::Node, dst: G::Node, post: Self::Domain) -> Self::Domain;

    /// Result sink for the `pre` invariant, called once per reachable node
    /// after convergence.
    fn process_pre(&mut self, node: G::Node, pre: &Self::Domain) {
        let _ = (node, pre);
    }

    /// Result sink for the `post` invariant.
    fn process_post(&mut self, node: G::Node, post: &Self::Domain) {
        let _ = (node, post);
    }

    /// Combines the head inputs of two consecutive increasing iterations.
    ///
    /// Overriding this is the place for custom widening strategies:
    /// thresholds, delayed widening, or an iteration cap that saturates to
    /// top to force convergence on a misbehaving domain.
    fn extrapolate(
        &mut self,
        head: G::Node,
        iteration: u32,
        before: Self::Domain,
        after: Self::Domain,
    ) -> Self::Domain {
        let _ = head;
        let mut before = before;
        if iteration <= 1 {
            before.join_iter_with(after);
        } else {
            before.widen_with(after);
        }
        before
    }

    /// Whether the increasing phase reached a post-fixpoint at a head.
    fn is_increasing_iterations_fixpoint(
        &mut self,
        before: &Self::Domain,
        after: &Self::Domain,
    ) -> bool {
        after.leq(before)
    }

    /// Refines the head input between two consecutive decreasing
    /// iterations.
    fn refine(
        &mut self,
        head: G::Node,
        iteration: u32,
        before: Self::Domain,
        after: Self::Domain,
    ) -> Self::Domain {
        let _ = (head, iteration);
        let mut before = before;
        before.narrow_with(after);
        before
    }

    /// Whether the decreasing phase can stop refining.
    fn is_decreasing_iterations_fixpoint(
        &mut self,
        before: &Self::Domain,
        after: &Self::Domain,
    ) -> bool {
        before.leq(after)
    }
}

/// Forward fixpoint iterator over a borrowed control-flow graph.
///
/// Owns the weak topological order of the graph and the two invariant
/// tables. [`Self::run`] populates the tables; they stay readable through
/// [`Self::pre`] / [`Self::post`] until [`Self::clear`]. The iterator is
/// not clonable; an owned copy of the results is available through
/// [`Self::snapshot`].
pub struct InterleavedFixpointIterator<'g, G, D>
where
    G: ControlFlowGraph,
    D: AbstractDomain,
{
    cfg: &'g G,
    wto: Wto<G::Node>,
    pre: InvariantTable<G::Node, D>,
    post: InvariantTable<G::Node, D>,
}

impl<'g, G, D> InterleavedFixpointIterator<'g, G, D>
where
    G: ControlFlowGraph,
    D: AbstractDomain,
{
    /// Creates an iterator for `cfg`, computing its weak topological order.
    pub fn new(cfg: &'g G) -> Self {
        Self {
            cfg,
            wto: Wto::new(cfg),
            pre: InvariantTable::new(),
            post: InvariantTable::new(),
        }
    }

    /// The analyzed graph.
    #[must_use]
    pub fn cfg(&self) -> &'g G {
        self.cfg
    }

    /// The weak topological order driving the iteration.
    #[must_use]
    pub fn wto(&self) -> &Wto<G::Node> {
        &self.wto
    }

    /// The invariant holding at the entry of `node`; bottom for nodes not
    /// (yet) analyzed.
    #[must_use]
    pub fn pre(&self, node: G::Node) -> &D {
        self.pre.get(node)
    }

    /// The invariant holding at the exit of `node`; bottom for nodes not
    /// (yet) analyzed.
    #[must_use]
    pub fn post(&self, node: G::Node) -> &D {
        self.post.get(node)
    }

    /// Computes the fixpoint from `init` at the entry node.
    ///
    /// Walks the order once to convergence, then walks it again feeding
    /// every visited node's invariants to `analyzer`'s `process_pre` /
    /// `process_post` sinks, heads before their cycle bodies. Nodes
    /// unreachable from the entry are neither analyzed nor processed.
    pub fn run<A>(&mut self, analyzer: &mut A, init: D)
    where
        A: Analyzer<G, Domain = D>,
    {
        self.pre.set(self.cfg.entry(), init);
        let mut pass = WtoRun {
            cfg: self.cfg,
            wto: &self.wto,
            pre: &mut self.pre,
            post: &mut self.post,
            analyzer,
        };
        pass.visit_all();
        pass.process_all();
    }

    /// Empties both invariant tables.
    ///
    /// After a run that panicked inside a client hook the tables are
    /// partially updated; this is the only way back to a defined state.
    pub fn clear(&mut self) {
        self.pre.clear();
        self.post.clear();
    }

    /// An owned copy of the current pre/post tables.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<G::Node, D> {
        Snapshot::new(self.pre.clone(), self.post.clone())
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum IterationKind {
    Increasing,
    Decreasing,
}

/// One run over the order: the fixpoint pass (`visit_all`) followed by the
/// result walk (`process_all`), with the tables and the analyzer borrowed
/// for the duration.
struct WtoRun<'it, 'g, G, A>
where
    G: ControlFlowGraph,
    A: Analyzer<G>,
{
    cfg: &'g G,
    wto: &'it Wto<G::Node>,
    pre: &'it mut InvariantTable<G::Node, A::Domain>,
    post: &'it mut InvariantTable<G::Node, A::Domain>,
    analyzer: &'it mut A,
}

impl<G, A> WtoRun<'_, '_, G, A>
where
    G: ControlFlowGraph,
    A: Analyzer<G>,
{
    fn visit_all(&mut self) {
        let wto = self.wto;
        for component in wto.components() {
            self.visit(component);
        }
    }

    fn visit(&mut self, component: &WtoComponent<G::Node>) {
        match component {
            WtoComponent::Vertex(node) => self.visit_vertex(*node),
            WtoComponent::Cycle(cycle) => self.visit_cycle(cycle),
        }
    }

    fn visit_vertex(&mut self, node: G::Node) {
        let cfg = self.cfg;

        // The entry node keeps the initial value installed by `run`.
        let mut pre = if node == cfg.entry() {
            self.pre.get(node).clone()
        } else {
            A::Domain::bottom()
        };

        for pred in cfg.predecessors(node) {
            let incoming = self.post.get(pred).clone();
            pre.join_with(self.analyzer.analyze_edge(pred, node, incoming));
        }

        let post = self.analyzer.analyze_node(node, pre.clone());
        self.pre.set(node, pre);
        self.post.set(node, post);
    }

    fn visit_cycle(&mut self, cycle: &WtoCycle<G::Node>) {
        let head = cycle.head();
        let wto = self.wto;
        let cycle_nesting = wto.nesting(head).expect("cycle heads are reachable");

        // Entry edges only: the posts of back-edge predecessors are still
        // bottom before the first pass over the body.
        let mut pre = self.entry_input(head, cycle_nesting);

        let mut kind = IterationKind::Increasing;
        let mut iteration: u32 = 1;
        loop {
            self.pre.set(head, pre.clone());
            let head_post = self.analyzer.analyze_node(head, pre.clone());
            self.post.set(head, head_post);

            for component in cycle.components() {
                self.visit(component);
            }

            let mut new_pre = self.entry_input(head, cycle_nesting);
            let back = self.back_input(head, cycle_nesting);
            new_pre.join_loop_with(back);

            if kind == IterationKind::Increasing {
                if self
                    .analyzer
                    .is_increasing_iterations_fixpoint(&pre, &new_pre)
                {
                    // Post-fixpoint reached; this pass doubles as the first
                    // decreasing iteration.
                    kind = IterationKind::Decreasing;
                    iteration = 1;
                } else {
                    pre = self.analyzer.extrapolate(head, iteration, pre, new_pre);
                    iteration += 1;
                    continue;
                }
            }

            let refined = self.analyzer.refine(head, iteration, pre.clone(), new_pre);
            if self
                .analyzer
                .is_decreasing_iterations_fixpoint(&pre, &refined)
            {
                self.pre.set(head, refined);
                break;
            }
            pre = refined;
            iteration += 1;
        }
    }

    /// Joined contribution of the head's entry edges: predecessors not
    /// nested strictly inside the cycle.
    fn entry_input(&mut self, head: G::Node, cycle_nesting: &Nesting<G::Node>) -> A::Domain {
        let cfg = self.cfg;
        let mut input = A::Domain::bottom();
        for pred in cfg.predecessors(head) {
            if !self.is_back_edge(pred, cycle_nesting) {
                let incoming = self.post.get(pred).clone();
                input.join_with(self.analyzer.analyze_edge(pred, head, incoming));
            }
        }
        input
    }

    /// Joined contribution of the head's back edges: predecessors nested
    /// strictly inside the cycle.
    fn back_input(&mut self, head: G::Node, cycle_nesting: &Nesting<G::Node>) -> A::Domain {
        let cfg = self.cfg;
        let mut input = A::Domain::bottom();
        for pred in cfg.predecessors(head) {
            if self.is_back_edge(pred, cycle_nesting) {
                let incoming = self.post.get(pred).clone();
                input.join_with(self.analyzer.analyze_edge(pred, head, incoming));
            }
        }
        input
    }

    fn is_back_edge(&self, pred: G::Node, cycle_nesting: &Nesting<G::Node>) -> bool {
        // Unreachable predecessors have no nesting; their posts are bottom
        // and they count as entry edges.
        self.wto
            .nesting(pred)
            .is_some_and(|nesting| nesting > cycle_nesting)
    }

    fn process_all(&mut self) {
        let wto = self.wto;
        for component in wto.components() {
            self.process(component);
        }
    }

    fn process(&mut self, component: &WtoComponent<G::Node>) {
        match component {
            WtoComponent::Vertex(node) => self.process_node(*node),
            WtoComponent::Cycle(cycle) => {
                self.process_node(cycle.head());
                for component in cycle.components() {
                    self.process(component);
                }
            }
        }
    }

    fn process_node(&mut self, node: G::Node) {
        self.analyzer.process_pre(node, self.pre.get(node));
        self.analyzer.process_post(node, self.post.get(node));
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::graph::{AdjacencyGraph, NodeId};

    /// Powerset lattice over node indices: each node contributes its own
    /// bit, so a post value records which nodes the state flowed through.
    #[derive(Clone, Debug, PartialEq, Eq)]
    struct Mask(u64);

    impl AbstractDomain for Mask {
        fn bottom() -> Self {
            Mask(0)
        }

        fn leq(&self, other: &Self) -> bool {
            self.0 & !other.0 == 0
        }

        fn join_with(&mut self, other: Self) {
            self.0 |= other.0;
        }

        fn widen_with(&mut self, other: Self) {
            self.0 |= other.0;
        }

        fn narrow_with(&mut self, _other: Self) {}
    }

    #[derive(Default)]
    struct Trace {
        processed: Vec<NodeId>,
    }

    impl Analyzer<AdjacencyGraph> for Trace {
        type Domain = Mask;

        fn analyze_node(&mut self, node: NodeId, mut pre: Mask) -> Mask {
            pre.0 |= 1 << node.as_u32();
            pre
        }

        fn analyze_edge(&mut self, _src: NodeId, _dst: NodeId, post: Mask) -> Mask {
            post
        }

        fn process_pre(&mut self, node: NodeId, _pre: &Mask) {
            self.processed.push(node);
        }
    }

    #[test]
    fn entry_keeps_the_initial_value() {
        let mut g = AdjacencyGraph::new();
        let a = g.add_node();
        let b = g.add_node();
        g.add_edge(a, b);

        let mut it = InterleavedFixpointIterator::new(&g);
        it.run(&mut Trace::default(), Mask(1 << 63));

        assert_eq!(*it.pre(a), Mask(1 << 63));
        assert_eq!(*it.post(b), Mask(1 << 63 | 0b11));
    }

    #[test]
    fn loop_reaches_a_stable_state() {
        // 0 -> 1 -> 2 -> 1, 2 -> 3.
        let mut g = AdjacencyGraph::new();
        let n: Vec<NodeId> = (0..4).map(|_| g.add_node()).collect();
        g.add_edge(n[0], n[1]);
        g.add_edge(n[1], n[2]);
        g.add_edge(n[2], n[1]);
        g.add_edge(n[2], n[3]);

        let mut it = InterleavedFixpointIterator::new(&g);
        it.run(&mut Trace::default(), Mask(0));

        // Everything that flows around the loop accumulates at its head.
        assert_eq!(*it.pre(n[1]), Mask(0b0111));
        assert_eq!(*it.post(n[3]), Mask(0b1111));
    }

    #[test]
    fn process_follows_wto_order_and_skips_unreachable() {
        // 0 -> 1 -> 2 with an unreachable 3 -> 1 edge.
        let mut g = AdjacencyGraph::new();
        let n: Vec<NodeId> = (0..4).map(|_| g.add_node()).collect();
        g.add_edge(n[0], n[1]);
        g.add_edge(n[1], n[2]);
        g.add_edge(n[3], n[1]);

        let mut analyzer = Trace::default();
        let mut it = InterleavedFixpointIterator::new(&g);
        it.run(&mut analyzer, Mask(0));

        assert_eq!(analyzer.processed, [n[0], n[1], n[2]]);
        assert_eq!(*it.pre(n[3]), Mask(0));
        assert_eq!(*it.post(n[3]), Mask(0));
    }

    #[test]
    fn clear_resets_both_tables() {
        let mut g = AdjacencyGraph::new();
        let a = g.add_node();
        let b = g.add_node();
        g.add_edge(a, b);

        let mut it = InterleavedFixpointIterator::new(&g);
        it.run(&mut Trace::default(), Mask(0));
        assert_ne!(*it.post(b), Mask(0));

        it.clear();
        it.clear();
        assert_eq!(*it.pre(a), Mask(0));
        assert_eq!(*it.post(b), Mask(0));
        assert!(it.snapshot() == InterleavedFixpointIterator::<_, Mask>::new(&g).snapshot());
    }
}
