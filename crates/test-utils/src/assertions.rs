// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Binding-specific test helpers and custom assertions

use std::collections::HashSet;

use sqlbind_ir::{BoundColumn, ColumnBinding, Node, NodeId, QueryTree};

/// Custom assertion helpers for bound trees
pub struct BindAssertions;

impl BindAssertions {
    /// Every node reachable from the root, each once, in pre-order
    pub fn reachable(tree: &QueryTree) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut stack: Vec<NodeId> = tree.root().into_iter().collect();
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            order.push(id);
            if let Some(node) = tree.get(id) {
                stack.extend(node.children().into_iter().rev());
            }
        }
        order
    }

    /// Assert that binding left nothing unresolved: no wildcard, no unbound
    /// column reference, no unbound base table, no unnamed result column
    pub fn assert_fully_bound(tree: &QueryTree) {
        for id in Self::reachable(tree) {
            match &tree[id] {
                Node::AllResultColumn(_) => panic!("wildcard {} survived binding", id),
                Node::ColumnReference(reference) => assert!(
                    reference.binding.is_some(),
                    "column reference {} ({}) is unbound",
                    id,
                    reference.qualified()
                ),
                Node::FromBaseTable(base) => assert!(
                    base.table_name.is_bound(),
                    "table {} ({}) is unbound",
                    id,
                    base.table_name
                ),
                Node::ResultColumn(column) => {
                    assert!(column.name.is_some(), "result column {} has no name", id)
                }
                _ => {}
            }
        }
    }

    /// Assert the names of a query block's result columns, in order
    pub fn assert_result_names(tree: &QueryTree, select: NodeId, expected: &[&str]) {
        let names: Vec<Option<&str>> = tree.result_column_names(select);
        let expected: Vec<Option<&str>> = expected.iter().map(|n| Some(*n)).collect();
        assert_eq!(names, expected, "result column names of {}", select);
    }

    /// Binding of a column reference, panicking if it has none
    pub fn binding(tree: &QueryTree, reference: NodeId) -> &ColumnBinding {
        let Some(reference_node) = tree.column_reference(reference) else {
            panic!("{} is not a column reference", reference);
        };
        match &reference_node.binding {
            Some(binding) => binding,
            None => panic!("column reference {} is unbound", reference),
        }
    }

    /// Assert that a reference is bound to catalog column `column` of the
    /// FROM list entry `from`
    pub fn assert_bound_to_table(tree: &QueryTree, reference: NodeId, from: NodeId, column: &str) {
        let binding = Self::binding(tree, reference);
        assert_eq!(binding.from_table, from, "wrong FROM entry for {}", reference);
        match &binding.column {
            BoundColumn::Table { column: bound, .. } => {
                assert_eq!(bound.name, column, "wrong catalog column for {}", reference)
            }
            other => panic!("expected a catalog column, found {:?}", other),
        }
    }

    /// Assert that a reference is bound to a result column of the derived
    /// table `from`
    pub fn assert_bound_to_derived(
        tree: &QueryTree,
        reference: NodeId,
        from: NodeId,
        result_column: NodeId,
    ) {
        let binding = Self::binding(tree, reference);
        assert_eq!(binding.from_table, from, "wrong FROM entry for {}", reference);
        assert_eq!(
            binding.column,
            BoundColumn::Derived { result_column },
            "wrong derived column for {}",
            reference
        );
    }
}
