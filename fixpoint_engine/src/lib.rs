// Copyright 2026 the Fixpoint Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Forward abstract-interpretation fixpoint engine.
//!
//! The engine computes, for every node of a control-flow graph, a `pre` and a
//! `post` abstract value: together an over-approximation of the reachable
//! program states under a client-supplied abstract domain and transfer
//! functions. Cyclic graphs are handled by decomposing them into a weak
//! topological order (WTO) and running increasing (widening) then decreasing
//! (narrowing) iterations at each cycle head. Widening and narrowing are
//! local to each cycle: inner loops stabilize completely between iterations
//! of their enclosing loop, so an outer head never pays extra widening steps
//! for inner churn.
//!
//! Clients bring three things:
//! - a [`ControlFlowGraph`] view of their graph,
//! - an [`AbstractDomain`] of values,
//! - an [`Analyzer`] with the node and edge transfer functions (and,
//!   optionally, custom widening/narrowing strategy and result sinks).
//!
//! ## Example
//!
//! Constant propagation of a single variable over a two-node graph:
//!
//! ```
//! use fixpoint_engine::{
//!     AbstractDomain, AdjacencyGraph, Analyzer, InterleavedFixpointIterator, NodeId,
//! };
//!
//! /// Flat lattice: bottom, a known constant, or unknown.
//! #[derive(Clone, Debug, PartialEq)]
//! enum Const {
//!     Bottom,
//!     Value(i64),
//!     Top,
//! }
//!
//! impl AbstractDomain for Const {
//!     fn bottom() -> Self {
//!         Const::Bottom
//!     }
//!
//!     fn leq(&self, other: &Self) -> bool {
//!         matches!(self, Const::Bottom) || matches!(other, Const::Top) || self == other
//!     }
//!
//!     fn join_with(&mut self, other: Self) {
//!         if matches!(self, Const::Bottom) {
//!             *self = other;
//!         } else if !matches!(other, Const::Bottom) && *self != other {
//!             *self = Const::Top;
//!         }
//!     }
//!
//!     // The lattice is finite, so plain joins already stabilize.
//!     fn widen_with(&mut self, other: Self) {
//!         self.join_with(other);
//!     }
//!
//!     fn narrow_with(&mut self, _other: Self) {}
//! }
//!
//! struct ConstProp {
//!     source: NodeId,
//! }
//!
//! impl Analyzer<AdjacencyGraph> for ConstProp {
//!     type Domain = Const;
//!
//!     fn analyze_node(&mut self, node: NodeId, pre: Const) -> Const {
//!         if node == self.source { Const::Value(5) } else { pre }
//!     }
//!
//!     fn analyze_edge(&mut self, _src: NodeId, _dst: NodeId, post: Const) -> Const {
//!         post
//!     }
//! }
//!
//! let mut graph = AdjacencyGraph::new();
//! let a = graph.add_node();
//! let b = graph.add_node();
//! graph.add_edge(a, b);
//!
//! let mut iterator = InterleavedFixpointIterator::new(&graph);
//! iterator.run(&mut ConstProp { source: a }, Const::Bottom);
//!
//! assert_eq!(*iterator.post(a), Const::Value(5));
//! assert_eq!(*iterator.post(b), Const::Value(5));
//! ```

#![no_std]

extern crate alloc;

mod domain;
mod graph;
mod invariants;
mod iter;
mod wto;

pub use domain::AbstractDomain;
pub use graph::{AdjacencyGraph, ControlFlowGraph, NodeId};
pub use invariants::{InvariantTable, Snapshot};
pub use iter::{Analyzer, InterleavedFixpointIterator};
pub use wto::{Nesting, Wto, WtoComponent, WtoCycle};
