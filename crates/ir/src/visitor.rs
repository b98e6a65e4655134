// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Hierarchical traversal
//!
//! [`walk`] drives a [`Visitor`] over a subtree depth first:
//!
//! 1. `before(node)` runs and decides whether to descend;
//! 2. if it returned `true`, every child edge is walked in order;
//! 3. `after(node)` runs, whether or not the children were walked.
//!
//! The child list is read *after* `before` returns, so a visitor may rewrite
//! a node's edges (replace a result column list, say) and the walk follows
//! the new edges.
//!
//! The walker itself keeps no state. A tree that shares a subtree between two
//! parents reaches it once per edge; visitors that must process each node
//! once keep their own visited set (see [`VisitedSet`]). `before` and `after`
//! are still called on every arrival so that paired work (entering and
//! leaving a scope, say) stays balanced.
//!
//! Any error returned by a hook unwinds the whole walk immediately.

use std::collections::HashSet;

use crate::tree::{NodeId, QueryTree};

/// Callbacks invoked by [`walk`]
pub trait Visitor {
    type Error;

    /// Called when the walk arrives at `node`; return `false` to skip its
    /// children
    fn before(&mut self, tree: &mut QueryTree, node: NodeId) -> Result<bool, Self::Error>;

    /// Called when the walk leaves `node`
    fn after(&mut self, tree: &mut QueryTree, node: NodeId) -> Result<(), Self::Error>;
}

/// Walk the subtree under `node`
pub fn walk<V: Visitor + ?Sized>(
    tree: &mut QueryTree,
    node: NodeId,
    visitor: &mut V,
) -> Result<(), V::Error> {
    if visitor.before(tree, node)? {
        let children = tree.get(node).map(|n| n.children()).unwrap_or_default();
        for child in children {
            walk(tree, child, visitor)?;
        }
    }
    visitor.after(tree, node)
}

/// Identity-keyed record of nodes already processed
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    seen: HashSet<NodeId>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `node`; returns `true` on its first arrival
    pub fn first_visit(&mut self, node: NodeId) -> bool {
        self.seen.insert(node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.seen.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }
}
