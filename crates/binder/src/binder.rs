// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Binder
//!
//! Walks a statement tree and resolves names against a catalog:
//!
//! 1. every `FromBaseTable` gets the catalog table it names
//! 2. every `ColumnReference` gets a [`ColumnBinding`]
//! 3. every wildcard is replaced by explicit, named result columns
//!
//! ## Ordering
//!
//! The binder is a [`Visitor`]. Semantic work happens in `before`, only on a
//! node's first arrival; scopes are pushed after that work and popped in
//! `after` on every arrival, so the stack stays balanced when a shared node
//! is reached twice.
//!
//! Two consequences of running the work before the push:
//! - the left operand of `x IN (subquery)` binds in the outer scope
//! - a query block walks its own FROM list before registering it, so derived
//!   tables bind before (and never see) their sibling FROM entries
//!
//! An unqualified column name must be supplied by exactly one table across
//! *all* enclosing scopes. A name visible both in a subquery and in its
//! enclosing block is ambiguous rather than resolved to the innermost table.

use std::sync::Arc;

use sqlbind_catalog::{Catalog, TableMetadata};
use sqlbind_ir::{
    BoundColumn, ColumnBinding, Node, NodeId, QueryTree, TableName, VisitedSet, Visitor, walk,
};
use tracing::{debug, instrument};

use crate::config::BinderConfig;
use crate::error::{SemanticError, SemanticResult};
use crate::scope::{ScopeStack, ScopeType};
use crate::wildcard;

/// Resolves table and column names of a statement against a catalog
///
/// A binder is reusable: every call to [`Binder::bind`] starts from an empty
/// scope stack and visited set and leaves them empty again.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use sqlbind_binder::Binder;
/// use sqlbind_catalog::{ColumnMetadata, DataType, MemoryCatalog, TableMetadata};
/// use sqlbind_ir::{SelectNode, TreeBuilder};
///
/// let catalog = MemoryCatalog::new().with_table(
///     TableMetadata::new("t", "app")
///         .with_columns(vec![ColumnMetadata::new("a", DataType::Integer)]),
/// );
///
/// // SELECT * FROM t
/// let mut b = TreeBuilder::new();
/// let star = b.wildcard();
/// let t = b.table("t");
/// let select = b.select(SelectNode::new(vec![star], vec![t]));
/// let mut tree = b.cursor(select);
///
/// let mut binder = Binder::new(Arc::new(catalog), "app");
/// binder.bind(&mut tree).unwrap();
/// assert_eq!(tree.result_column_names(select), vec![Some("A")]);
/// ```
pub struct Binder {
    catalog: Arc<dyn Catalog>,
    config: BinderConfig,
    scopes: ScopeStack,
    visited: VisitedSet,
}

impl Binder {
    /// Create a binder resolving unqualified tables in `default_schema`
    pub fn new(catalog: Arc<dyn Catalog>, default_schema: impl Into<String>) -> Self {
        Self::with_config(catalog, BinderConfig::new(default_schema))
    }

    pub fn with_config(catalog: Arc<dyn Catalog>, config: BinderConfig) -> Self {
        Self {
            catalog,
            config,
            scopes: ScopeStack::new(),
            visited: VisitedSet::new(),
        }
    }

    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    /// Bind `tree` in place
    ///
    /// On error the tree may be partially annotated.
    #[instrument(skip(self, tree), fields(default_schema = %self.config.default_schema))]
    pub fn bind(&mut self, tree: &mut QueryTree) -> SemanticResult<()> {
        self.reset();
        let Some(root) = tree.root() else {
            debug!("Statement has no root, nothing to bind");
            return Ok(());
        };

        let result = self.bind_root(tree, root);
        self.reset();
        match &result {
            Ok(()) => debug!(nodes = tree.len(), "Bound statement"),
            Err(err) => debug!(error = %err, "Binding failed"),
        }
        result
    }

    fn bind_root(&mut self, tree: &mut QueryTree, root: NodeId) -> SemanticResult<()> {
        let opens_scope = tree.get(root).is_some_and(Node::opens_scope);
        if !opens_scope {
            self.scopes.push(ScopeType::Statement);
        }
        walk(tree, root, self)?;
        if !opens_scope {
            self.scopes.pop();
        }
        Ok(())
    }

    /// Clear the scope stack and visited set
    pub fn reset(&mut self) {
        self.scopes.clear();
        self.visited.clear();
    }

    /// Number of binding contexts currently pushed
    pub fn scope_depth(&self) -> usize {
        self.scopes.depth()
    }

    // -------------------------------------------------------------------------
    // Query blocks
    // -------------------------------------------------------------------------

    fn select_node(&mut self, tree: &mut QueryTree, select: NodeId) -> SemanticResult<()> {
        let Some(from_list) = tree.select(select).map(|s| s.from_list.clone()) else {
            return Ok(());
        };

        // Derived tables in the FROM list bind before this block's own
        // entries are registered.
        for from in from_list.iter() {
            walk(tree, from, self)?;
        }

        for from in from_list.iter() {
            if tree.base_table(from).is_some() {
                self.from_base_table(tree, from)?;
            }
        }

        let scope = self.scopes.current_mut();
        for from in from_list.iter() {
            let correlation_name = tree.get(from).and_then(Node::correlation_name);
            scope.add_table(from, correlation_name)?;
        }

        wildcard::expand_alls_and_name_columns(
            tree,
            select,
            &from_list,
            &self.config.generated_column_prefix,
        )
    }

    fn from_base_table(&self, tree: &mut QueryTree, from: NodeId) -> SemanticResult<()> {
        let Some(base) = tree.base_table(from) else {
            return Ok(());
        };
        if base.table_name.is_bound() {
            return Ok(());
        }

        let table = self.lookup_table_name(&base.table_name)?;
        if let Some(base) = tree.base_table_mut(from) {
            base.table_name.binding = Some(table);
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Table resolution
    // -------------------------------------------------------------------------

    /// Find the catalog table a FROM list name refers to
    ///
    /// The table part is lowercased before the lookup; an unqualified name
    /// uses the default schema.
    pub fn lookup_table_name(&self, name: &TableName) -> SemanticResult<Arc<TableMetadata>> {
        let schema = name
            .schema
            .as_deref()
            .unwrap_or(&self.config.default_schema);
        let table = name.table.to_lowercase();

        match self.catalog.find_table(schema, &table) {
            Some(found) => {
                debug!(name = %name, resolved = %found.qualified_name(), "Resolved table");
                Ok(found)
            }
            None => Err(SemanticError::TableNotFound(name.full_name())),
        }
    }

    /// Find the FROM list entry a column qualifier refers to
    fn find_from_table(&self, tree: &QueryTree, qualifier: &TableName) -> SemanticResult<NodeId> {
        if qualifier.schema.is_none() {
            if let Some(from) = self
                .scopes
                .current()
                .and_then(|scope| scope.find_correlation(&qualifier.table))
            {
                return Ok(from);
            }
        }

        let schema = qualifier
            .schema
            .as_deref()
            .unwrap_or(&self.config.default_schema);

        let mut result = None;
        for scope in self.scopes.iter() {
            for &from in scope.tables() {
                // An aliased table is only reachable through its alias.
                let Some(base) = tree.base_table(from) else {
                    continue;
                };
                if base.correlation_name.is_some() {
                    continue;
                }
                let Some(table) = &base.table_name.binding else {
                    continue;
                };

                if table.schema.eq_ignore_ascii_case(schema)
                    && table.name.eq_ignore_ascii_case(&qualifier.table)
                {
                    if result.is_some() {
                        return Err(SemanticError::AmbiguousTable(qualifier.table.clone()));
                    }
                    result = Some(from);
                }
            }
        }

        result.ok_or_else(|| SemanticError::TableNotFound(qualifier.full_name()))
    }

    // -------------------------------------------------------------------------
    // Column resolution
    // -------------------------------------------------------------------------

    fn column_reference(&self, tree: &mut QueryTree, id: NodeId) -> SemanticResult<()> {
        let Some(reference) = tree.column_reference(id) else {
            return Ok(());
        };
        if reference.binding.is_some() {
            return Ok(());
        }
        let column_name = reference.column_name.clone();
        let qualifier = reference.table_name.clone();

        let binding = match qualifier {
            Some(qualifier) => {
                let from = self.find_from_table(tree, &qualifier)?;
                column_binding(tree, from, &column_name).ok_or_else(|| {
                    SemanticError::ColumnNotFound {
                        column: column_name.clone(),
                        context: exposed_name(tree, from),
                    }
                })?
            }
            None => {
                let mut found = None;
                for scope in self.scopes.iter() {
                    for &from in scope.tables() {
                        if let Some(candidate) = column_binding(tree, from, &column_name) {
                            if found.is_some() {
                                return Err(SemanticError::AmbiguousColumn(column_name));
                            }
                            found = Some(candidate);
                        }
                    }
                }
                found.ok_or_else(|| SemanticError::ColumnNotFound {
                    column: column_name.clone(),
                    context: None,
                })?
            }
        };

        debug!(column = %column_name, from_table = %binding.from_table, "Bound column");
        if let Some(reference) = tree.column_reference_mut(id) {
            reference.binding = Some(binding);
        }
        Ok(())
    }
}

/// Binding for `name` supplied by the FROM list entry `from`, if it has one
///
/// Catalog columns match exactly; a derived table matches its query's result
/// column names exactly.
pub fn column_binding(tree: &QueryTree, from: NodeId, name: &str) -> Option<ColumnBinding> {
    let column = match tree.get(from)? {
        Node::FromBaseTable(base) => {
            let table = base.table_name.binding.as_ref()?;
            let (position, column) = table.get_column(name)?;
            BoundColumn::Table {
                position,
                column: column.clone(),
            }
        }
        Node::FromSubquery(derived) => BoundColumn::Derived {
            result_column: tree.get_result_column(derived.subquery, name)?,
        },
        _ => return None,
    };

    Some(ColumnBinding {
        from_table: from,
        column,
    })
}

fn exposed_name(tree: &QueryTree, from: NodeId) -> Option<String> {
    match tree.get(from)? {
        Node::FromBaseTable(base) => Some(base.exposed_name()),
        Node::FromSubquery(derived) => derived.exposed_name().map(str::to_string),
        _ => None,
    }
}

impl Visitor for Binder {
    type Error = SemanticError;

    fn before(&mut self, tree: &mut QueryTree, node: NodeId) -> SemanticResult<bool> {
        let first = self.visited.first_visit(node);
        let Some(current) = tree.get(node) else {
            return Ok(false);
        };
        let scope_type = ScopeType::for_node(current);

        if first {
            match current {
                Node::Subquery(subquery) => {
                    if let Some(operand) = subquery.left_operand {
                        walk(tree, operand, self)?;
                    }
                }
                Node::Select(_) => self.select_node(tree, node)?,
                Node::ColumnReference(_) => self.column_reference(tree, node)?,
                _ => {}
            }
        }

        if let Some(scope_type) = scope_type {
            self.scopes.push(scope_type);
        }
        Ok(first)
    }

    fn after(&mut self, tree: &mut QueryTree, node: NodeId) -> SemanticResult<()> {
        if tree.get(node).and_then(ScopeType::for_node).is_some() {
            self.scopes.pop();
        }
        Ok(())
    }
}

/// Bind `tree` against `catalog`, resolving unqualified tables in
/// `default_schema`
pub fn bind(
    tree: &mut QueryTree,
    catalog: Arc<dyn Catalog>,
    default_schema: &str,
) -> SemanticResult<()> {
    Binder::new(catalog, default_schema).bind(tree)
}
