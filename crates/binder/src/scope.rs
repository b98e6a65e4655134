// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Scope management for binding
//!
//! This module defines the binding contexts that track which FROM list
//! entries are visible while a statement is walked.
//!
//! A context is pushed on entry to every node that opens a scope (cursor,
//! derived table, subquery) and popped when the walk leaves it. A freshly
//! pushed context starts with a snapshot of its parent's correlation names,
//! so a correlated subquery can use an outer alias without re-registering
//! it. Entries registered later in the parent are not seen by the snapshot,
//! and nothing registered in the child leaks back out.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlbind_ir::{Node, NodeId};
use tracing::debug;

use crate::error::{SemanticError, SemanticResult};

/// Kind of node that opened a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScopeType {
    /// Implicit scope around a statement whose root opens none
    Statement,
    /// Statement root
    Cursor,
    /// Derived table in a FROM list
    FromSubquery,
    /// Subquery used as an expression
    Subquery,
}

impl ScopeType {
    /// Scope opened by entering `node`, if any
    pub fn for_node(node: &Node) -> Option<Self> {
        match node {
            Node::Cursor(_) => Some(ScopeType::Cursor),
            Node::FromSubquery(_) => Some(ScopeType::FromSubquery),
            Node::Subquery(_) => Some(ScopeType::Subquery),
            _ => None,
        }
    }
}

/// FROM list entries and correlation names visible at one nesting level
#[derive(Debug, Clone, PartialEq)]
pub struct BindingContext {
    /// Kind of node that opened this context
    pub scope_type: ScopeType,

    /// FROM list entries registered at this level, in FROM order
    tables: Vec<NodeId>,

    /// Correlation names visible here: the parent's snapshot plus our own
    correlation_names: HashMap<String, NodeId>,
}

impl BindingContext {
    /// Create an empty context
    pub fn new(scope_type: ScopeType) -> Self {
        Self {
            scope_type,
            tables: Vec::new(),
            correlation_names: HashMap::new(),
        }
    }

    /// Derive a nested context that inherits this one's correlation names
    pub fn child(&self, scope_type: ScopeType) -> Self {
        Self {
            correlation_names: self.correlation_names.clone(),
            ..Self::new(scope_type)
        }
    }

    /// Register a FROM list entry, with its correlation name if it has one
    ///
    /// The name must not already be visible here, whether registered at
    /// this level or inherited from an enclosing one.
    pub fn add_table(
        &mut self,
        table: NodeId,
        correlation_name: Option<&str>,
    ) -> SemanticResult<()> {
        if let Some(name) = correlation_name {
            if self.correlation_names.contains_key(name) {
                return Err(SemanticError::DuplicateCorrelationName(name.to_string()));
            }
            self.correlation_names.insert(name.to_string(), table);
        }
        self.tables.push(table);
        Ok(())
    }

    /// FROM list entries registered at this level
    pub fn tables(&self) -> &[NodeId] {
        &self.tables
    }

    /// Find a FROM list entry by exact correlation name
    pub fn find_correlation(&self, name: &str) -> Option<NodeId> {
        self.correlation_names.get(name).copied()
    }

    pub fn has_correlation_name(&self, name: &str) -> bool {
        self.correlation_names.contains_key(name)
    }
}

/// Stack of binding contexts, innermost last
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    frames: Vec<BindingContext>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a context derived from the current top
    pub fn push(&mut self, scope_type: ScopeType) {
        let frame = match self.frames.last() {
            Some(parent) => parent.child(scope_type),
            None => BindingContext::new(scope_type),
        };
        self.frames.push(frame);
        debug!(?scope_type, depth = self.frames.len(), "Pushed binding context");
    }

    /// Pop the innermost context
    pub fn pop(&mut self) -> Option<BindingContext> {
        let frame = self.frames.pop();
        if let Some(frame) = &frame {
            debug!(
                scope_type = ?frame.scope_type,
                depth = self.frames.len(),
                "Popped binding context"
            );
        }
        frame
    }

    /// Innermost context
    pub fn current(&self) -> Option<&BindingContext> {
        self.frames.last()
    }

    /// Innermost context, opening a statement-level one if the stack is empty
    pub fn current_mut(&mut self) -> &mut BindingContext {
        if self.frames.is_empty() {
            self.push(ScopeType::Statement);
        }
        let top = self.frames.len() - 1;
        &mut self.frames[top]
    }

    /// All contexts, outermost first
    pub fn iter(&self) -> impl Iterator<Item = &BindingContext> {
        self.frames.iter()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}
