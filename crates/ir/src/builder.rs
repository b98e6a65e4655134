// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Tree builder
//!
//! Convenience constructors standing in for a parser front end. Every method
//! allocates one node and returns its id; [`TreeBuilder::finish`] installs the
//! root and hands the tree over.
//!
//! ```
//! use sqlbind_ir::{SelectNode, TreeBuilder};
//!
//! // SELECT a, * FROM test.t AS x
//! let mut b = TreeBuilder::new();
//! let a = b.column("a");
//! let a = b.result(a);
//! let star = b.wildcard();
//! let from = b.qualified_table_as("test", "t", "x");
//! let select = b.select(SelectNode::new(vec![a, star], vec![from]));
//! let tree = b.cursor(select);
//!
//! assert!(tree.validate().is_ok());
//! ```

use crate::node::{
    AllResultColumn, BinaryOp, ColumnReference, CursorNode, FromBaseTable, FromSubquery, Literal,
    Node, NodeList, OrderByColumn, ResultColumn, SelectNode, SpecialFunction, SubqueryKind,
    SubqueryNode, TableName, UnaryOp,
};
use crate::tree::{NodeId, QueryTree};

/// Incremental constructor for a [`QueryTree`]
#[derive(Debug, Default)]
pub struct TreeBuilder {
    tree: QueryTree,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&mut self, node: Node) -> NodeId {
        self.tree.alloc(node)
    }

    // -------------------------------------------------------------------------
    // FROM list entries
    // -------------------------------------------------------------------------

    pub fn table(&mut self, table: &str) -> NodeId {
        self.from_base_table(TableName::new(table), None)
    }

    pub fn table_as(&mut self, table: &str, alias: &str) -> NodeId {
        self.from_base_table(TableName::new(table), Some(alias))
    }

    pub fn qualified_table(&mut self, schema: &str, table: &str) -> NodeId {
        self.from_base_table(TableName::qualified(schema, table), None)
    }

    pub fn qualified_table_as(&mut self, schema: &str, table: &str, alias: &str) -> NodeId {
        self.from_base_table(TableName::qualified(schema, table), Some(alias))
    }

    fn from_base_table(&mut self, table_name: TableName, alias: Option<&str>) -> NodeId {
        self.node(Node::FromBaseTable(FromBaseTable {
            table_name,
            correlation_name: alias.map(str::to_string),
        }))
    }

    /// Derived table `(select) AS alias`
    pub fn derived_table(&mut self, select: NodeId, alias: Option<&str>) -> NodeId {
        self.node(Node::FromSubquery(FromSubquery {
            subquery: select,
            correlation_name: alias.map(str::to_string),
            order_by: NodeList::new(),
            offset: None,
            fetch_first: None,
        }))
    }

    // -------------------------------------------------------------------------
    // Result columns
    // -------------------------------------------------------------------------

    /// Result column without an `AS` clause
    ///
    /// A bare column reference names the column after itself, as a parser
    /// would; any other expression leaves it unnamed.
    pub fn result(&mut self, expression: NodeId) -> NodeId {
        let name = self
            .tree
            .column_reference(expression)
            .map(|reference| reference.column_name.clone());
        self.node(Node::ResultColumn(ResultColumn {
            name,
            expression,
            name_generated: false,
        }))
    }

    /// `expression AS name`
    pub fn named_result(&mut self, expression: NodeId, name: &str) -> NodeId {
        self.node(Node::ResultColumn(ResultColumn {
            name: Some(name.to_string()),
            expression,
            name_generated: false,
        }))
    }

    /// `*`
    pub fn wildcard(&mut self) -> NodeId {
        self.node(Node::AllResultColumn(AllResultColumn { table_name: None }))
    }

    /// `table.*`
    pub fn qualified_wildcard(&mut self, table: &str) -> NodeId {
        self.node(Node::AllResultColumn(AllResultColumn {
            table_name: Some(TableName::new(table)),
        }))
    }

    /// `schema.table.*`
    pub fn schema_qualified_wildcard(&mut self, schema: &str, table: &str) -> NodeId {
        self.node(Node::AllResultColumn(AllResultColumn {
            table_name: Some(TableName::qualified(schema, table)),
        }))
    }

    // -------------------------------------------------------------------------
    // Expressions
    // -------------------------------------------------------------------------

    pub fn column(&mut self, column: &str) -> NodeId {
        self.node(Node::ColumnReference(ColumnReference::new(column)))
    }

    /// `table.column`
    pub fn qualified_column(&mut self, table: &str, column: &str) -> NodeId {
        self.node(Node::ColumnReference(
            ColumnReference::new(column).with_table(TableName::new(table)),
        ))
    }

    /// `schema.table.column`
    pub fn schema_qualified_column(&mut self, schema: &str, table: &str, column: &str) -> NodeId {
        self.node(Node::ColumnReference(
            ColumnReference::new(column).with_table(TableName::qualified(schema, table)),
        ))
    }

    pub fn integer(&mut self, value: i64) -> NodeId {
        self.node(Node::Constant(Literal::Integer(value)))
    }

    pub fn string(&mut self, value: &str) -> NodeId {
        self.node(Node::Constant(Literal::String(value.to_string())))
    }

    pub fn null(&mut self) -> NodeId {
        self.node(Node::Constant(Literal::Null))
    }

    pub fn binary(&mut self, op: BinaryOp, left: NodeId, right: NodeId) -> NodeId {
        self.node(Node::BinaryOperator { op, left, right })
    }

    pub fn unary(&mut self, op: UnaryOp, operand: NodeId) -> NodeId {
        self.node(Node::UnaryOperator { op, operand })
    }

    pub fn function(&mut self, name: &str, args: Vec<NodeId>) -> NodeId {
        self.node(Node::FunctionCall {
            name: name.to_string(),
            args: args.into(),
            distinct: false,
        })
    }

    pub fn special_function(&mut self, function: SpecialFunction) -> NodeId {
        self.node(Node::SpecialFunction(function))
    }

    pub fn in_list(&mut self, operand: NodeId, list: Vec<NodeId>) -> NodeId {
        self.node(Node::InList {
            operand,
            list: list.into(),
            negated: false,
        })
    }

    pub fn order_by(&mut self, expression: NodeId, ascending: bool) -> NodeId {
        self.node(Node::OrderByColumn(OrderByColumn {
            expression,
            ascending,
        }))
    }

    // -------------------------------------------------------------------------
    // Query blocks
    // -------------------------------------------------------------------------

    pub fn select(&mut self, select: SelectNode) -> NodeId {
        self.node(Node::Select(select))
    }

    /// Subquery used as an expression
    pub fn subquery(
        &mut self,
        select: NodeId,
        kind: SubqueryKind,
        left_operand: Option<NodeId>,
    ) -> NodeId {
        let mut subquery = SubqueryNode::new(select, kind);
        subquery.left_operand = left_operand;
        self.node(Node::Subquery(subquery))
    }

    /// Wrap `select` in a cursor, make it the root and return the tree
    pub fn cursor(mut self, select: NodeId) -> QueryTree {
        let cursor = self.node(Node::Cursor(CursorNode::new(select)));
        self.finish(cursor)
    }

    /// Wrap `select` in a cursor with an `ORDER BY` list
    pub fn cursor_with_order_by(mut self, select: NodeId, order_by: Vec<NodeId>) -> QueryTree {
        let mut cursor = CursorNode::new(select);
        cursor.order_by = order_by.into();
        let cursor = self.node(Node::Cursor(cursor));
        self.finish(cursor)
    }

    /// Install `root` and return the tree
    pub fn finish(mut self, root: NodeId) -> QueryTree {
        self.tree.set_root(root);
        self.tree
    }

    /// Access the tree under construction
    pub fn tree(&self) -> &QueryTree {
        &self.tree
    }
}
