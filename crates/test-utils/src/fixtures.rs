// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Statement tree fixtures
//!
//! Each fixture builds the tree a parser would hand over for the SQL shown in
//! its doc comment, against the standard mock schema. Interesting nodes are
//! reachable by name through [`Fixture::node`].

use std::collections::HashMap;

use sqlbind_ir::{BinaryOp, NodeId, QueryTree, SelectNode, SubqueryKind, TreeBuilder};

/// A statement tree plus handles to its interesting nodes
#[derive(Debug, Clone)]
pub struct Fixture {
    pub tree: QueryTree,
    nodes: HashMap<&'static str, NodeId>,
}

impl Fixture {
    fn new(tree: QueryTree, nodes: &[(&'static str, NodeId)]) -> Self {
        Self {
            tree,
            nodes: nodes.iter().copied().collect(),
        }
    }

    /// Handle registered under `name`
    ///
    /// Panics if the fixture has no such node.
    pub fn node(&self, name: &str) -> NodeId {
        match self.nodes.get(name) {
            Some(id) => *id,
            None => panic!("fixture has no node named '{}'", name),
        }
    }
}

/// Sample statements for binding tests
pub struct TreeFixtures;

impl TreeFixtures {
    // ===== Wildcards =====

    /// `SELECT * FROM t`
    pub fn select_star() -> Fixture {
        let mut b = TreeBuilder::new();
        let star = b.wildcard();
        let t = b.table("t");
        let select = b.select(SelectNode::new(vec![star], vec![t]));
        Fixture::new(b.cursor(select), &[("select", select), ("t", t)])
    }

    /// `SELECT 1, *, 2 FROM t, s`
    pub fn star_between_constants() -> Fixture {
        let mut b = TreeBuilder::new();
        let one = b.integer(1);
        let one = b.result(one);
        let star = b.wildcard();
        let two = b.integer(2);
        let two = b.result(two);
        let t = b.table("t");
        let s = b.table("s");
        let select = b.select(SelectNode::new(vec![one, star, two], vec![t, s]));
        Fixture::new(
            b.cursor(select),
            &[("select", select), ("t", t), ("s", s), ("one", one), ("two", two)],
        )
    }

    /// `SELECT u.* FROM t AS u, s AS v`
    pub fn qualified_star() -> Fixture {
        let mut b = TreeBuilder::new();
        let star = b.qualified_wildcard("u");
        let u = b.table_as("t", "u");
        let v = b.table_as("s", "v");
        let select = b.select(SelectNode::new(vec![star], vec![u, v]));
        Fixture::new(b.cursor(select), &[("select", select), ("u", u), ("v", v)])
    }

    // ===== Column resolution =====

    /// `SELECT id FROM users, orders`
    pub fn ambiguous_column() -> Fixture {
        let mut b = TreeBuilder::new();
        let id = b.column("id");
        let result = b.result(id);
        let users = b.table("users");
        let orders = b.table("orders");
        let select = b.select(SelectNode::new(vec![result], vec![users, orders]));
        Fixture::new(b.cursor(select), &[("select", select), ("id", id)])
    }

    /// `SELECT users.id FROM users, orders`
    pub fn qualified_column() -> Fixture {
        let mut b = TreeBuilder::new();
        let id = b.qualified_column("users", "id");
        let result = b.result(id);
        let users = b.table("users");
        let orders = b.table("orders");
        let select = b.select(SelectNode::new(vec![result], vec![users, orders]));
        Fixture::new(
            b.cursor(select),
            &[("select", select), ("id", id), ("users", users), ("orders", orders)],
        )
    }

    /// `SELECT u.name FROM users AS u`
    pub fn alias_reference() -> Fixture {
        let mut b = TreeBuilder::new();
        let name = b.qualified_column("u", "name");
        let result = b.result(name);
        let u = b.table_as("users", "u");
        let select = b.select(SelectNode::new(vec![result], vec![u]));
        Fixture::new(b.cursor(select), &[("select", select), ("name", name), ("u", u)])
    }

    /// `SELECT users.name FROM users AS u`
    pub fn base_name_of_aliased_table() -> Fixture {
        let mut b = TreeBuilder::new();
        let name = b.qualified_column("users", "name");
        let result = b.result(name);
        let u = b.table_as("users", "u");
        let select = b.select(SelectNode::new(vec![result], vec![u]));
        Fixture::new(b.cursor(select), &[("select", select), ("name", name)])
    }

    /// `SELECT 1 FROM t AS a, s AS a`
    pub fn duplicate_alias() -> Fixture {
        let mut b = TreeBuilder::new();
        let one = b.integer(1);
        let one = b.result(one);
        let first = b.table_as("t", "a");
        let second = b.table_as("s", "a");
        let select = b.select(SelectNode::new(vec![one], vec![first, second]));
        Fixture::new(b.cursor(select), &[("select", select)])
    }

    /// `SELECT 1, 2, 1 + 1 FROM t`
    pub fn unnamed_columns() -> Fixture {
        let mut b = TreeBuilder::new();
        let one = b.integer(1);
        let first = b.result(one);
        let two = b.integer(2);
        let second = b.result(two);
        let left = b.integer(1);
        let right = b.integer(1);
        let sum = b.binary(BinaryOp::Add, left, right);
        let third = b.result(sum);
        let t = b.table("t");
        let select = b.select(SelectNode::new(vec![first, second, third], vec![t]));
        Fixture::new(
            b.cursor(select),
            &[
                ("select", select),
                ("first", first),
                ("second", second),
                ("third", third),
            ],
        )
    }

    // ===== Nesting =====

    /// `SELECT name FROM users WHERE id IN (SELECT user_id FROM orders WHERE total > 10)`
    pub fn in_subquery() -> Fixture {
        let mut b = TreeBuilder::new();
        let user_id = b.column("user_id");
        let inner_result = b.result(user_id);
        let orders = b.table("orders");
        let total = b.column("total");
        let ten = b.integer(10);
        let filter = b.binary(BinaryOp::Gt, total, ten);
        let inner = b.select(SelectNode::new(vec![inner_result], vec![orders]).with_where(filter));

        let id = b.column("id");
        let subquery = b.subquery(inner, SubqueryKind::In, Some(id));

        let name = b.column("name");
        let outer_result = b.result(name);
        let users = b.table("users");
        let outer = b.select(SelectNode::new(vec![outer_result], vec![users]).with_where(subquery));

        Fixture::new(
            b.cursor(outer),
            &[
                ("outer", outer),
                ("inner", inner),
                ("users", users),
                ("orders", orders),
                ("id", id),
                ("user_id", user_id),
                ("total", total),
                ("name", name),
                ("subquery", subquery),
            ],
        )
    }

    /// `SELECT name FROM users WHERE EXISTS (SELECT id FROM orders)`
    ///
    /// `id` is supplied by both nesting levels.
    pub fn id_visible_at_two_levels() -> Fixture {
        let mut b = TreeBuilder::new();
        let id = b.column("id");
        let inner_result = b.result(id);
        let orders = b.table("orders");
        let inner = b.select(SelectNode::new(vec![inner_result], vec![orders]));
        let exists = b.subquery(inner, SubqueryKind::Exists, None);

        let name = b.column("name");
        let outer_result = b.result(name);
        let users = b.table("users");
        let outer = b.select(SelectNode::new(vec![outer_result], vec![users]).with_where(exists));
        Fixture::new(b.cursor(outer), &[("outer", outer), ("id", id)])
    }

    /// `SELECT x.A, x.total FROM (SELECT t.*, total FROM t, orders) AS x`
    ///
    /// Derived table columns are the inner block's result names, so the
    /// expanded ones are uppercase.
    pub fn derived_table() -> Fixture {
        let mut b = TreeBuilder::new();
        let star = b.qualified_wildcard("t");
        let total = b.column("total");
        let total_result = b.result(total);
        let t = b.table("t");
        let orders = b.table("orders");
        let inner = b.select(SelectNode::new(vec![star, total_result], vec![t, orders]));
        let x = b.derived_table(inner, Some("x"));

        let a = b.qualified_column("x", "A");
        let a_result = b.result(a);
        let outer_total = b.qualified_column("x", "total");
        let outer_total_result = b.result(outer_total);
        let outer = b.select(SelectNode::new(vec![a_result, outer_total_result], vec![x]));

        Fixture::new(
            b.cursor(outer),
            &[
                ("outer", outer),
                ("inner", inner),
                ("x", x),
                ("a", a),
                ("outer_total", outer_total),
                ("total_result", total_result),
            ],
        )
    }
}
