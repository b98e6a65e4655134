// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Statement nodes
//!
//! This module defines the node kinds stored in a [`QueryTree`](crate::QueryTree).
//!
//! ## Design
//!
//! Nodes never own their children. Every child edge is a [`NodeId`] into the
//! tree's arena, which lets one subtree be reachable from more than one parent
//! edge. The subquery left operand is the case that matters:
//!
//! ```text
//! Subquery { result_set: #7, left_operand: Some(#3) }
//!                                           |
//!        #3 is both the left operand edge and a regular child edge
//! ```
//!
//! The set of node kinds is closed. Code that dispatches on [`Node`] matches
//! it exhaustively (or names the kinds it ignores with a wildcard arm).
//!
//! ## Query blocks
//!
//! - [`CursorNode`]: the statement root wrapping a result set, with its own
//!   `ORDER BY`, `OFFSET` and `FETCH FIRST`
//! - [`SelectNode`]: one `SELECT` block (result columns, FROM list, WHERE,
//!   GROUP BY, HAVING)
//! - [`SubqueryNode`]: a query used as an expression (`IN`, `EXISTS`, scalar)
//!
//! ## FROM list entries
//!
//! - [`FromBaseTable`]: a catalog table, optionally aliased
//! - [`FromSubquery`]: a derived table whose "columns" are its query's result
//!   columns
//!
//! ## Result columns
//!
//! - [`ResultColumn`]: a named (or yet unnamed) output expression
//! - [`AllResultColumn`]: a `*` or `alias.*` placeholder, replaced during binding

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::metadata::{ColumnMetadata, TableMetadata};
use crate::tree::NodeId;

/// Ordered list of child nodes (result columns, FROM entries, GROUP BY items)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeList(Vec<NodeId>);

impl NodeList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn push(&mut self, id: NodeId) {
        self.0.push(id);
    }

    pub fn extend(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        self.0.extend(ids);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.0.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.0
    }
}

impl From<Vec<NodeId>> for NodeList {
    fn from(ids: Vec<NodeId>) -> Self {
        Self(ids)
    }
}

impl FromIterator<NodeId> for NodeList {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a NodeList {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

/// A possibly schema-qualified table name
///
/// Once resolved, `binding` holds the catalog table it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableName {
    /// Optional schema qualifier
    pub schema: Option<String>,
    /// Table name (or correlation name, when used as a qualifier)
    pub table: String,
    /// Catalog table this name resolved to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding: Option<Arc<TableMetadata>>,
}

impl TableName {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            schema: None,
            table: table.into(),
            binding: None,
        }
    }

    pub fn qualified(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            table: table.into(),
            binding: None,
        }
    }

    /// `schema.table`, or just `table` when unqualified
    pub fn full_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema, self.table),
            None => self.table.clone(),
        }
    }

    /// Whether this name refers to the same table as `other`
    ///
    /// When either side lacks a schema only the table parts are compared;
    /// otherwise both parts must match. Comparison is exact.
    pub fn matches(&self, other: &TableName) -> bool {
        match (&self.schema, &other.schema) {
            (Some(schema), Some(other_schema)) => {
                schema == other_schema && self.table == other.table
            }
            _ => self.table == other.table,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

/// The column a [`ColumnReference`] resolved to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoundColumn {
    /// A catalog column of a `FromBaseTable`
    Table {
        /// Position in the table's catalog column order
        position: usize,
        column: ColumnMetadata,
    },
    /// A result column of a `FromSubquery`'s query
    Derived { result_column: NodeId },
}

/// Resolved metadata attached to a column reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnBinding {
    /// The FROM list entry that supplies the column
    pub from_table: NodeId,
    pub column: BoundColumn,
}

/// Statement root: a result set plus statement-level ordering and paging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorNode {
    pub result_set: NodeId,
    #[serde(default)]
    pub order_by: NodeList,
    #[serde(default)]
    pub offset: Option<NodeId>,
    #[serde(default)]
    pub fetch_first: Option<NodeId>,
}

impl CursorNode {
    pub fn new(result_set: NodeId) -> Self {
        Self {
            result_set,
            order_by: NodeList::new(),
            offset: None,
            fetch_first: None,
        }
    }
}

/// One `SELECT` query block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectNode {
    #[serde(default)]
    pub distinct: bool,
    pub result_columns: NodeList,
    #[serde(default)]
    pub from_list: NodeList,
    #[serde(default)]
    pub where_clause: Option<NodeId>,
    #[serde(default)]
    pub group_by: NodeList,
    #[serde(default)]
    pub having: Option<NodeId>,
}

impl SelectNode {
    pub fn new(result_columns: impl Into<NodeList>, from_list: impl Into<NodeList>) -> Self {
        Self {
            result_columns: result_columns.into(),
            from_list: from_list.into(),
            ..Default::default()
        }
    }

    pub fn with_where(mut self, predicate: NodeId) -> Self {
        self.where_clause = Some(predicate);
        self
    }

    pub fn with_group_by(mut self, group_by: impl Into<NodeList>) -> Self {
        self.group_by = group_by.into();
        self
    }

    pub fn with_having(mut self, predicate: NodeId) -> Self {
        self.having = Some(predicate);
        self
    }

    pub fn with_distinct(mut self) -> Self {
        self.distinct = true;
        self
    }
}

/// A catalog table in a FROM list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FromBaseTable {
    pub table_name: TableName,
    #[serde(default)]
    pub correlation_name: Option<String>,
}

impl FromBaseTable {
    /// Name other clauses must use: the alias if present, else the table name
    pub fn exposed_name(&self) -> String {
        match &self.correlation_name {
            Some(alias) => alias.clone(),
            None => self.table_name.full_name(),
        }
    }

    /// Exposed name as an (unbound) [`TableName`]
    pub fn exposed_table_name(&self) -> TableName {
        match &self.correlation_name {
            Some(alias) => TableName::new(alias.clone()),
            None => TableName {
                binding: None,
                ..self.table_name.clone()
            },
        }
    }
}

/// A derived table in a FROM list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FromSubquery {
    pub subquery: NodeId,
    #[serde(default)]
    pub correlation_name: Option<String>,
    #[serde(default)]
    pub order_by: NodeList,
    #[serde(default)]
    pub offset: Option<NodeId>,
    #[serde(default)]
    pub fetch_first: Option<NodeId>,
}

impl FromSubquery {
    /// A derived table is only reachable through its alias
    pub fn exposed_name(&self) -> Option<&str> {
        self.correlation_name.as_deref()
    }
}

/// How a subquery is used as an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubqueryKind {
    /// Scalar subquery
    Expression,
    In,
    NotIn,
    Exists,
    NotExists,
    EqAny,
    EqAll,
    NeAny,
    NeAll,
    GtAny,
    GtAll,
    GeAny,
    GeAll,
    LtAny,
    LtAll,
    LeAny,
    LeAll,
}

impl SubqueryKind {
    /// Whether this kind compares a left operand against the subquery rows
    pub fn takes_left_operand(self) -> bool {
        !matches!(
            self,
            SubqueryKind::Expression | SubqueryKind::Exists | SubqueryKind::NotExists
        )
    }
}

/// A query used inside an expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubqueryNode {
    pub result_set: NodeId,
    pub kind: SubqueryKind,
    /// Left side of `x IN (...)`, `x = ANY (...)`; bound in the outer scope
    #[serde(default)]
    pub left_operand: Option<NodeId>,
    #[serde(default)]
    pub order_by: NodeList,
    #[serde(default)]
    pub offset: Option<NodeId>,
    #[serde(default)]
    pub fetch_first: Option<NodeId>,
}

impl SubqueryNode {
    pub fn new(result_set: NodeId, kind: SubqueryKind) -> Self {
        Self {
            result_set,
            kind,
            left_operand: None,
            order_by: NodeList::new(),
            offset: None,
            fetch_first: None,
        }
    }

    pub fn with_left_operand(mut self, operand: NodeId) -> Self {
        self.left_operand = Some(operand);
        self
    }
}

/// One output column of a query block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultColumn {
    #[serde(default)]
    pub name: Option<String>,
    pub expression: NodeId,
    /// Set when `name` was synthesized rather than written by the user
    #[serde(default)]
    pub name_generated: bool,
}

/// `*` or `alias.*` in a result column list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllResultColumn {
    #[serde(default)]
    pub table_name: Option<TableName>,
}

/// A (possibly qualified) column name inside an expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnReference {
    pub column_name: String,
    #[serde(default)]
    pub table_name: Option<TableName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding: Option<ColumnBinding>,
}

impl ColumnReference {
    pub fn new(column_name: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            table_name: None,
            binding: None,
        }
    }

    pub fn with_table(mut self, table_name: TableName) -> Self {
        self.table_name = Some(table_name);
        self
    }

    /// `table.column` or `column`
    pub fn qualified(&self) -> String {
        match &self.table_name {
            Some(table) => format!("{}.{}", table.full_name(), self.column_name),
            None => self.column_name.clone(),
        }
    }
}

/// Constant value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    /// Character constant
    String(String),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Concat,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,

    // String
    Like,
    NotLike,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Not,
    IsNull,
    IsNotNull,
}

/// Argument-less SQL functions evaluated against the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialFunction {
    User,
    CurrentUser,
    CurrentRole,
    SessionUser,
    SystemUser,
    CurrentSchema,
    CurrentIsolation,
    IdentityValLocal,
}

impl SpecialFunction {
    pub fn sql_name(self) -> &'static str {
        match self {
            SpecialFunction::User => "USER",
            SpecialFunction::CurrentUser => "CURRENT_USER",
            SpecialFunction::CurrentRole => "CURRENT_ROLE",
            SpecialFunction::SessionUser => "SESSION_USER",
            SpecialFunction::SystemUser => "SYSTEM_USER",
            SpecialFunction::CurrentSchema => "CURRENT SCHEMA",
            SpecialFunction::CurrentIsolation => "CURRENT ISOLATION",
            SpecialFunction::IdentityValLocal => "IDENTITY_VAL_LOCAL",
        }
    }
}

/// One `ORDER BY` item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByColumn {
    pub expression: NodeId,
    #[serde(default = "default_ascending")]
    pub ascending: bool,
}

fn default_ascending() -> bool {
    true
}

/// A node in the statement tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Cursor(CursorNode),
    Select(SelectNode),
    FromBaseTable(FromBaseTable),
    FromSubquery(FromSubquery),
    Subquery(SubqueryNode),
    ResultColumn(ResultColumn),
    AllResultColumn(AllResultColumn),
    ColumnReference(ColumnReference),
    OrderByColumn(OrderByColumn),
    Constant(Literal),
    BinaryOperator {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    UnaryOperator {
        op: UnaryOp,
        operand: NodeId,
    },
    /// `left IS [NOT] right` for boolean truth tests
    Is {
        left: NodeId,
        right: NodeId,
        negated: bool,
    },
    FunctionCall {
        name: String,
        args: NodeList,
        #[serde(default)]
        distinct: bool,
    },
    SpecialFunction(SpecialFunction),
    /// `operand [NOT] IN (v1, v2, ...)`
    InList {
        operand: NodeId,
        list: NodeList,
        #[serde(default)]
        negated: bool,
    },
    Case {
        #[serde(default)]
        operand: Option<NodeId>,
        conditions: NodeList,
        results: NodeList,
        #[serde(default)]
        else_result: Option<NodeId>,
    },
}

impl Node {
    /// Short label used by tree dumps and log lines
    pub fn label(&self) -> &'static str {
        match self {
            Node::Cursor(_) => "Cursor",
            Node::Select(_) => "Select",
            Node::FromBaseTable(_) => "FromBaseTable",
            Node::FromSubquery(_) => "FromSubquery",
            Node::Subquery(_) => "Subquery",
            Node::ResultColumn(_) => "ResultColumn",
            Node::AllResultColumn(_) => "AllResultColumn",
            Node::ColumnReference(_) => "ColumnReference",
            Node::OrderByColumn(_) => "OrderByColumn",
            Node::Constant(_) => "Constant",
            Node::BinaryOperator { .. } => "BinaryOperator",
            Node::UnaryOperator { .. } => "UnaryOperator",
            Node::Is { .. } => "Is",
            Node::FunctionCall { .. } => "FunctionCall",
            Node::SpecialFunction(_) => "SpecialFunction",
            Node::InList { .. } => "InList",
            Node::Case { .. } => "Case",
        }
    }

    /// Whether entering this node starts a new name-resolution scope
    pub fn opens_scope(&self) -> bool {
        matches!(
            self,
            Node::Cursor(_) | Node::FromSubquery(_) | Node::Subquery(_)
        )
    }

    /// Whether this node is a FROM list entry
    pub fn is_from_table(&self) -> bool {
        matches!(self, Node::FromBaseTable(_) | Node::FromSubquery(_))
    }

    /// Correlation name of a FROM list entry
    pub fn correlation_name(&self) -> Option<&str> {
        match self {
            Node::FromBaseTable(table) => table.correlation_name.as_deref(),
            Node::FromSubquery(subquery) => subquery.correlation_name.as_deref(),
            _ => None,
        }
    }

    /// Child edges in traversal order
    ///
    /// A shared node shows up once per edge that reaches it.
    pub fn children(&self) -> Vec<NodeId> {
        let mut children = Vec::new();
        match self {
            Node::Cursor(cursor) => {
                children.push(cursor.result_set);
                children.extend(cursor.order_by.iter());
                children.extend(cursor.offset);
                children.extend(cursor.fetch_first);
            }
            Node::Select(select) => {
                children.extend(select.result_columns.iter());
                children.extend(select.from_list.iter());
                children.extend(select.where_clause);
                children.extend(select.group_by.iter());
                children.extend(select.having);
            }
            Node::FromSubquery(from) => {
                children.push(from.subquery);
                children.extend(from.order_by.iter());
                children.extend(from.offset);
                children.extend(from.fetch_first);
            }
            Node::Subquery(subquery) => {
                children.push(subquery.result_set);
                children.extend(subquery.left_operand);
                children.extend(subquery.order_by.iter());
                children.extend(subquery.offset);
                children.extend(subquery.fetch_first);
            }
            Node::ResultColumn(column) => children.push(column.expression),
            Node::OrderByColumn(item) => children.push(item.expression),
            Node::BinaryOperator { left, right, .. } | Node::Is { left, right, .. } => {
                children.push(*left);
                children.push(*right);
            }
            Node::UnaryOperator { operand, .. } => children.push(*operand),
            Node::FunctionCall { args, .. } => children.extend(args.iter()),
            Node::InList { operand, list, .. } => {
                children.push(*operand);
                children.extend(list.iter());
            }
            Node::Case {
                operand,
                conditions,
                results,
                else_result,
            } => {
                children.extend(*operand);
                // Unpaired entries are still walked; `validate` reports them.
                for index in 0..conditions.len().max(results.len()) {
                    children.extend(conditions.get(index));
                    children.extend(results.get(index));
                }
                children.extend(*else_result);
            }
            Node::FromBaseTable(_)
            | Node::AllResultColumn(_)
            | Node::ColumnReference(_)
            | Node::Constant(_)
            | Node::SpecialFunction(_) => {}
        }
        children
    }
}
