// Copyright 2026 the Fixpoint Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Invariant tables: per-node abstract values, total by convention.

use core::hash::Hash;

use hashbrown::HashMap;

use crate::domain::AbstractDomain;

/// Mapping from CFG nodes to abstract values.
///
/// Lookups of nodes that were never written read as bottom; the table keeps
/// one bottom value around so [`InvariantTable::get`] can hand out a
/// reference without mutating.
#[derive(Clone, Debug)]
pub struct InvariantTable<N, D> {
    values: HashMap<N, D>,
    bottom: D,
}

impl<N, D> InvariantTable<N, D>
where
    N: Copy + Eq + Hash,
    D: AbstractDomain,
{
    pub(crate) fn new() -> Self {
        Self {
            values: HashMap::new(),
            bottom: D::bottom(),
        }
    }

    /// The value for `node`, bottom if never set.
    #[must_use]
    pub fn get(&self, node: N) -> &D {
        self.values.get(&node).unwrap_or(&self.bottom)
    }

    pub(crate) fn set(&mut self, node: N, value: D) {
        self.values.insert(node, value);
    }

    pub(crate) fn clear(&mut self) {
        self.values.clear();
    }

    /// Number of nodes with an explicit entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no node has an explicit entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<N, D> PartialEq for InvariantTable<N, D>
where
    N: Copy + Eq + Hash,
    D: AbstractDomain + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

/// Owned copy of an iterator's pre/post tables, decoupled from it.
///
/// The iterator itself is deliberately not clonable; sharing results across
/// consumers goes through an explicit snapshot.
#[derive(Clone, Debug)]
pub struct Snapshot<N, D> {
    pre: InvariantTable<N, D>,
    post: InvariantTable<N, D>,
}

impl<N, D> Snapshot<N, D>
where
    N: Copy + Eq + Hash,
    D: AbstractDomain,
{
    pub(crate) fn new(pre: InvariantTable<N, D>, post: InvariantTable<N, D>) -> Self {
        Self { pre, post }
    }

    /// The pre invariant of `node`.
    #[must_use]
    pub fn pre(&self, node: N) -> &D {
        self.pre.get(node)
    }

    /// The post invariant of `node`.
    #[must_use]
    pub fn post(&self, node: N) -> &D {
        self.post.get(node)
    }
}

impl<N, D> PartialEq for Snapshot<N, D>
where
    N: Copy + Eq + Hash,
    D: AbstractDomain + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.pre == other.pre && self.post == other.post
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Powerset-of-bits lattice; finite, so joins already stabilize.
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

    #[test]
    fn missing_nodes_read_as_bottom() {
        let table: InvariantTable<u32, Mask> = InvariantTable::new();
        assert_eq!(*table.get(7), Mask(0));
        assert!(table.is_empty());
    }

    #[test]
    fn set_then_clear() {
        let mut table: InvariantTable<u32, Mask> = InvariantTable::new();
        table.set(1, Mask(0b10));
        table.set(2, Mask(0b100));
        assert_eq!(*table.get(1), Mask(0b10));
        assert_eq!(table.len(), 2);

        table.clear();
        assert!(table.is_empty());
        assert_eq!(*table.get(1), Mask(0));
    }

    #[test]
    fn snapshots_compare_by_contents() {
        let mut pre: InvariantTable<u32, Mask> = InvariantTable::new();
        let mut post: InvariantTable<u32, Mask> = InvariantTable::new();
        pre.set(0, Mask(1));
        post.set(0, Mask(3));

        let a = Snapshot::new(pre.clone(), post.clone());
        let b = Snapshot::new(pre, post);
        assert_eq!(a, b);
        assert_eq!(*a.pre(0), Mask(1));
        assert_eq!(*a.post(0), Mask(3));
        assert_eq!(*a.post(9), Mask(0));
    }
}
