// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Statement tree arena
//!
//! A [`QueryTree`] owns every node of one statement in a flat arena and hands
//! out [`NodeId`] handles. Parents refer to children by id, so a subtree may
//! be shared by several parents without aliasing mutable references, and
//! passes can key side tables (visited sets, scopes) by node identity.
//!
//! Nodes are never removed. A pass that replaces part of the tree (wildcard
//! expansion, for instance) allocates new nodes and rewires the parent's
//! edges; the replaced nodes stay in the arena, unreachable.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::node::{
    AllResultColumn, ColumnReference, CursorNode, FromBaseTable, FromSubquery, Node,
    ResultColumn, SelectNode, SubqueryNode,
};

/// Handle of a node inside a [`QueryTree`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Structural problems in a tree handed over by a parser
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Tree has no root node")]
    MissingRoot,

    #[error("Node {parent} refers to missing node {child}")]
    DanglingEdge { parent: NodeId, child: NodeId },

    #[error("Root refers to missing node {0}")]
    DanglingRoot(NodeId),

    #[error("Node {parent} expects a {expected} at {child}, found {found}")]
    UnexpectedNode {
        parent: NodeId,
        child: NodeId,
        expected: &'static str,
        found: &'static str,
    },

    #[error("CASE node {node} has {conditions} WHEN conditions but {results} THEN results")]
    MismatchedCase {
        node: NodeId,
        conditions: usize,
        results: usize,
    },

    #[error("Failed to (de)serialize tree: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Arena holding one statement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryTree {
    nodes: Vec<Node>,
    #[serde(default)]
    root: Option<NodeId>,
    /// Counter behind [`QueryTree::generate_column_name`]
    #[serde(default)]
    generated_names: u32,
}

impl QueryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node and return its handle
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All `(id, node)` pairs, including nodes no longer reachable
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index as u32), node))
    }

    /// Produce a column name that is unique across the whole statement
    pub fn generate_column_name(&mut self, prefix: &str) -> String {
        let name = format!("{}{}", prefix, self.generated_names);
        self.generated_names += 1;
        name
    }

    // -------------------------------------------------------------------------
    // Typed accessors
    // -------------------------------------------------------------------------

    pub fn cursor(&self, id: NodeId) -> Option<&CursorNode> {
        match self.get(id)? {
            Node::Cursor(cursor) => Some(cursor),
            _ => None,
        }
    }

    pub fn select(&self, id: NodeId) -> Option<&SelectNode> {
        match self.get(id)? {
            Node::Select(select) => Some(select),
            _ => None,
        }
    }

    pub fn select_mut(&mut self, id: NodeId) -> Option<&mut SelectNode> {
        match self.get_mut(id)? {
            Node::Select(select) => Some(select),
            _ => None,
        }
    }

    pub fn base_table(&self, id: NodeId) -> Option<&FromBaseTable> {
        match self.get(id)? {
            Node::FromBaseTable(table) => Some(table),
            _ => None,
        }
    }

    pub fn base_table_mut(&mut self, id: NodeId) -> Option<&mut FromBaseTable> {
        match self.get_mut(id)? {
            Node::FromBaseTable(table) => Some(table),
            _ => None,
        }
    }

    pub fn from_subquery(&self, id: NodeId) -> Option<&FromSubquery> {
        match self.get(id)? {
            Node::FromSubquery(subquery) => Some(subquery),
            _ => None,
        }
    }

    pub fn subquery(&self, id: NodeId) -> Option<&SubqueryNode> {
        match self.get(id)? {
            Node::Subquery(subquery) => Some(subquery),
            _ => None,
        }
    }

    pub fn result_column(&self, id: NodeId) -> Option<&ResultColumn> {
        match self.get(id)? {
            Node::ResultColumn(column) => Some(column),
            _ => None,
        }
    }

    pub fn result_column_mut(&mut self, id: NodeId) -> Option<&mut ResultColumn> {
        match self.get_mut(id)? {
            Node::ResultColumn(column) => Some(column),
            _ => None,
        }
    }

    pub fn all_result_column(&self, id: NodeId) -> Option<&AllResultColumn> {
        match self.get(id)? {
            Node::AllResultColumn(column) => Some(column),
            _ => None,
        }
    }

    pub fn column_reference(&self, id: NodeId) -> Option<&ColumnReference> {
        match self.get(id)? {
            Node::ColumnReference(reference) => Some(reference),
            _ => None,
        }
    }

    pub fn column_reference_mut(&mut self, id: NodeId) -> Option<&mut ColumnReference> {
        match self.get_mut(id)? {
            Node::ColumnReference(reference) => Some(reference),
            _ => None,
        }
    }

    /// Look up a result column of a query block by exact name
    ///
    /// Wildcards and unnamed columns never match.
    pub fn get_result_column(&self, select: NodeId, name: &str) -> Option<NodeId> {
        self.select(select)?.result_columns.iter().find(|&id| {
            self.result_column(id)
                .is_some_and(|column| column.name.as_deref() == Some(name))
        })
    }

    /// Names of a query block's result columns (`None` for wildcards and
    /// unnamed columns)
    pub fn result_column_names(&self, select: NodeId) -> Vec<Option<&str>> {
        self.select(select)
            .map(|select| {
                select
                    .result_columns
                    .iter()
                    .map(|id| self.result_column(id).and_then(|c| c.name.as_deref()))
                    .collect()
            })
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Validation and serialization
    // -------------------------------------------------------------------------

    /// Check that the root and every edge point at allocated nodes, that
    /// query-shaped edges point at query blocks, and that every `CASE` pairs
    /// each condition with a result
    pub fn validate(&self) -> Result<(), TreeError> {
        let root = self.root.ok_or(TreeError::MissingRoot)?;
        if self.get(root).is_none() {
            return Err(TreeError::DanglingRoot(root));
        }

        for (parent, node) in self.iter() {
            for child in node.children() {
                if self.get(child).is_none() {
                    return Err(TreeError::DanglingEdge { parent, child });
                }
            }

            let query_edge = match node {
                Node::Cursor(cursor) => Some(cursor.result_set),
                Node::FromSubquery(from) => Some(from.subquery),
                Node::Subquery(subquery) => Some(subquery.result_set),
                _ => None,
            };
            if let Some(child) = query_edge {
                self.expect_kind(parent, child, "Select", |n| matches!(n, Node::Select(_)))?;
            }

            if let Node::Case {
                conditions,
                results,
                ..
            } = node
            {
                if conditions.len() != results.len() {
                    return Err(TreeError::MismatchedCase {
                        node: parent,
                        conditions: conditions.len(),
                        results: results.len(),
                    });
                }
            }

            if let Node::Select(select) = node {
                for child in select.from_list.iter() {
                    self.expect_kind(parent, child, "FROM list entry", Node::is_from_table)?;
                }
                for child in select.result_columns.iter() {
                    self.expect_kind(parent, child, "result column", |n| {
                        matches!(n, Node::ResultColumn(_) | Node::AllResultColumn(_))
                    })?;
                }
            }
        }

        Ok(())
    }

    fn expect_kind(
        &self,
        parent: NodeId,
        child: NodeId,
        expected: &'static str,
        predicate: impl Fn(&Node) -> bool,
    ) -> Result<(), TreeError> {
        match self.get(child) {
            Some(node) if predicate(node) => Ok(()),
            Some(node) => Err(TreeError::UnexpectedNode {
                parent,
                child,
                expected,
                found: node.label(),
            }),
            None => Err(TreeError::DanglingEdge { parent, child }),
        }
    }

    /// Deserialize and validate a tree produced by an external parser
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        let tree: QueryTree = serde_json::from_str(json)?;
        tree.validate()?;
        Ok(tree)
    }

    pub fn to_json_pretty(&self) -> Result<String, TreeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // -------------------------------------------------------------------------
    // Printing
    // -------------------------------------------------------------------------

    /// Indented dump of the subtree under `id`
    ///
    /// A node reached a second time through another edge is printed as a
    /// back-reference instead of being expanded again.
    pub fn tree_print(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut seen = HashSet::new();
        self.print_node(id, 0, &mut seen, &mut out);
        out
    }

    fn print_node(&self, id: NodeId, depth: usize, seen: &mut HashSet<NodeId>, out: &mut String) {
        let indent = "  ".repeat(depth);
        let Some(node) = self.get(id) else {
            let _ = writeln!(out, "{}{} <missing>", indent, id);
            return;
        };

        if !seen.insert(id) {
            let _ = writeln!(out, "{}{} {} (shared)", indent, id, node.label());
            return;
        }

        let _ = writeln!(out, "{}{} {}{}", indent, id, node.label(), describe(node));
        for child in node.children() {
            self.print_node(child, depth + 1, seen, out);
        }
    }
}

/// Non-edge fields worth showing in a dump
fn describe(node: &Node) -> String {
    match node {
        Node::FromBaseTable(table) => {
            let mut text = format!(" table: {}", table.table_name);
            if let Some(alias) = &table.correlation_name {
                let _ = write!(text, " AS {}", alias);
            }
            if table.table_name.is_bound() {
                text.push_str(" [bound]");
            }
            text
        }
        Node::FromSubquery(from) => match &from.correlation_name {
            Some(alias) => format!(" AS {}", alias),
            None => String::new(),
        },
        Node::Subquery(subquery) => format!(" kind: {:?}", subquery.kind),
        Node::ResultColumn(column) => match (&column.name, column.name_generated) {
            (Some(name), true) => format!(" name: {} (generated)", name),
            (Some(name), false) => format!(" name: {}", name),
            (None, _) => String::new(),
        },
        Node::AllResultColumn(all) => match &all.table_name {
            Some(table) => format!(" {}.*", table),
            None => " *".to_string(),
        },
        Node::ColumnReference(reference) => {
            let mut text = format!(" {}", reference.qualified());
            if let Some(binding) = &reference.binding {
                let _ = write!(text, " -> {}", binding.from_table);
            }
            text
        }
        Node::Constant(literal) => format!(" {:?}", literal),
        Node::BinaryOperator { op, .. } => format!(" {:?}", op),
        Node::UnaryOperator { op, .. } => format!(" {:?}", op),
        Node::FunctionCall { name, .. } => format!(" {}", name),
        Node::SpecialFunction(function) => format!(" {}", function.sql_name()),
        Node::OrderByColumn(item) if !item.ascending => " DESC".to_string(),
        _ => String::new(),
    }
}

impl Index<NodeId> for QueryTree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for QueryTree {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }
}
