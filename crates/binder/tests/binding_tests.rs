// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Integration tests for statement binding

use std::sync::Arc;

use sqlbind_binder::{Binder, BinderConfig, SemanticError, bind};
use sqlbind_catalog::Catalog;
use sqlbind_ir::{
    BinaryOp, BoundColumn, Node, QueryTree, SelectNode, SpecialFunction, SubqueryKind,
    TreeBuilder, UnaryOp,
};
use sqlbind_test_utils::{BindAssertions, MockCatalog, MockCatalogBuilder, STANDARD_SCHEMA, TreeFixtures};

fn catalog() -> Arc<MockCatalog> {
    MockCatalogBuilder::new().with_standard_schema().build_shared()
}

fn binder() -> Binder {
    Binder::new(catalog(), STANDARD_SCHEMA)
}

// ===== Wildcard expansion =====

#[test]
fn test_star_expands_in_catalog_order_uppercased() {
    let mut fixture = TreeFixtures::select_star();
    binder().bind(&mut fixture.tree).unwrap();

    let select = fixture.node("select");
    BindAssertions::assert_result_names(&fixture.tree, select, &["A", "B", "C"]);
    BindAssertions::assert_fully_bound(&fixture.tree);

    let columns = fixture.tree.select(select).unwrap().result_columns.clone();
    for (position, (column, catalog_name)) in columns.iter().zip(["a", "b", "c"]).enumerate() {
        let result = fixture.tree.result_column(column).unwrap();
        assert!(!result.name_generated);

        let reference = fixture.tree.column_reference(result.expression).unwrap();
        assert_eq!(reference.table_name.as_ref().unwrap().table, "t");
        let binding = reference.binding.as_ref().unwrap();
        assert_eq!(binding.from_table, fixture.node("t"));
        match &binding.column {
            BoundColumn::Table { position: p, column } => {
                assert_eq!(*p, position);
                assert_eq!(column.name, catalog_name);
            }
            other => panic!("expected catalog column, got {:?}", other),
        }
    }
}

#[test]
fn test_star_keeps_position_between_other_columns() {
    let mut fixture = TreeFixtures::star_between_constants();
    binder().bind(&mut fixture.tree).unwrap();

    let select = fixture.node("select");
    BindAssertions::assert_result_names(
        &fixture.tree,
        select,
        &["SQLCol0", "A", "B", "C", "A", "D", "SQLCol1"],
    );
    let columns = &fixture.tree.select(select).unwrap().result_columns;
    assert_eq!(columns.get(0), Some(fixture.node("one")));
    assert_eq!(columns.get(6), Some(fixture.node("two")));
}

#[test]
fn test_qualified_star_expands_only_its_table() {
    let mut fixture = TreeFixtures::qualified_star();
    binder().bind(&mut fixture.tree).unwrap();

    let select = fixture.node("select");
    BindAssertions::assert_result_names(&fixture.tree, select, &["A", "B", "C"]);

    let first = fixture.tree.select(select).unwrap().result_columns.get(0).unwrap();
    let expression = fixture.tree.result_column(first).unwrap().expression;
    let reference = fixture.tree.column_reference(expression).unwrap();
    // Fabricated references are qualified by the exposed (alias) name.
    assert_eq!(reference.qualified(), "u.A");
    BindAssertions::assert_bound_to_table(&fixture.tree, expression, fixture.node("u"), "a");
}

#[test]
fn test_qualified_star_by_base_name_of_aliased_table_fails() {
    // SELECT t.* FROM t AS u
    let mut b = TreeBuilder::new();
    let star = b.qualified_wildcard("t");
    let u = b.table_as("t", "u");
    let select = b.select(SelectNode::new(vec![star], vec![u]));
    let mut tree = b.cursor(select);

    assert_eq!(
        binder().bind(&mut tree),
        Err(SemanticError::TableNotFound("t".to_string()))
    );
}

#[test]
fn test_schema_qualified_star_matches_unqualified_from_entry() {
    // SELECT test.t.* FROM t
    let mut b = TreeBuilder::new();
    let star = b.schema_qualified_wildcard(STANDARD_SCHEMA, "t");
    let t = b.table("t");
    let select = b.select(SelectNode::new(vec![star], vec![t]));
    let mut tree = b.cursor(select);

    binder().bind(&mut tree).unwrap();
    BindAssertions::assert_result_names(&tree, select, &["A", "B", "C"]);
}

#[test]
fn test_star_without_from_list_fails() {
    // SELECT *
    let mut b = TreeBuilder::new();
    let star = b.wildcard();
    let select = b.select(SelectNode::new(vec![star], vec![]));
    let mut tree = b.cursor(select);

    assert_eq!(
        binder().bind(&mut tree),
        Err(SemanticError::TableNotFound("*".to_string()))
    );
}

// ===== Column resolution =====

#[test]
fn test_unqualified_column_in_two_tables_is_ambiguous() {
    let mut fixture = TreeFixtures::ambiguous_column();
    assert_eq!(
        binder().bind(&mut fixture.tree),
        Err(SemanticError::AmbiguousColumn("id".to_string()))
    );
}

#[test]
fn test_qualified_column_resolves_ambiguity() {
    let mut fixture = TreeFixtures::qualified_column();
    binder().bind(&mut fixture.tree).unwrap();

    BindAssertions::assert_bound_to_table(
        &fixture.tree,
        fixture.node("id"),
        fixture.node("users"),
        "id",
    );
    BindAssertions::assert_fully_bound(&fixture.tree);
}

#[test]
fn test_alias_resolves_and_base_name_does_not() {
    let mut fixture = TreeFixtures::alias_reference();
    binder().bind(&mut fixture.tree).unwrap();
    BindAssertions::assert_bound_to_table(
        &fixture.tree,
        fixture.node("name"),
        fixture.node("u"),
        "name",
    );

    let mut fixture = TreeFixtures::base_name_of_aliased_table();
    assert_eq!(
        binder().bind(&mut fixture.tree),
        Err(SemanticError::TableNotFound("users".to_string()))
    );
}

#[test]
fn test_qualifier_matches_table_case_insensitively() {
    // SELECT USERS.id FROM users
    let mut b = TreeBuilder::new();
    let id = b.qualified_column("USERS", "id");
    let result = b.result(id);
    let users = b.table("users");
    let select = b.select(SelectNode::new(vec![result], vec![users]));
    let mut tree = b.cursor(select);

    binder().bind(&mut tree).unwrap();
    BindAssertions::assert_bound_to_table(&tree, id, users, "id");
}

#[test]
fn test_same_table_twice_without_alias_is_ambiguous() {
    // SELECT t.a FROM t, test.t
    let mut b = TreeBuilder::new();
    let a = b.qualified_column("t", "a");
    let result = b.result(a);
    let first = b.table("t");
    let second = b.qualified_table(STANDARD_SCHEMA, "t");
    let select = b.select(SelectNode::new(vec![result], vec![first, second]));
    let mut tree = b.cursor(select);

    assert_eq!(
        binder().bind(&mut tree),
        Err(SemanticError::AmbiguousTable("t".to_string()))
    );
}

#[test]
fn test_missing_column_names_its_table() {
    // SELECT u.nope FROM users AS u
    let mut b = TreeBuilder::new();
    let nope = b.qualified_column("u", "nope");
    let result = b.result(nope);
    let u = b.table_as("users", "u");
    let select = b.select(SelectNode::new(vec![result], vec![u]));
    let mut tree = b.cursor(select);

    assert_eq!(
        binder().bind(&mut tree),
        Err(SemanticError::ColumnNotFound {
            column: "nope".to_string(),
            context: Some("u".to_string()),
        })
    );
}

#[test]
fn test_missing_unqualified_column() {
    // SELECT nope FROM users
    let mut b = TreeBuilder::new();
    let nope = b.column("nope");
    let result = b.result(nope);
    let users = b.table("users");
    let select = b.select(SelectNode::new(vec![result], vec![users]));
    let mut tree = b.cursor(select);

    assert_eq!(
        binder().bind(&mut tree),
        Err(SemanticError::ColumnNotFound {
            column: "nope".to_string(),
            context: None,
        })
    );
}

#[test]
fn test_catalog_column_lookup_is_exact() {
    // SELECT ID FROM users
    let mut b = TreeBuilder::new();
    let id = b.column("ID");
    let result = b.result(id);
    let users = b.table("users");
    let select = b.select(SelectNode::new(vec![result], vec![users]));
    let mut tree = b.cursor(select);

    assert!(matches!(
        binder().bind(&mut tree),
        Err(SemanticError::ColumnNotFound { .. })
    ));
}

#[test]
fn test_where_group_by_having_and_order_by_are_bound() {
    // SELECT total FROM orders WHERE user_id = 1 GROUP BY total HAVING total > 0 ORDER BY id
    let mut b = TreeBuilder::new();
    let total = b.column("total");
    let result = b.result(total);
    let orders = b.table("orders");
    let user_id = b.column("user_id");
    let one = b.integer(1);
    let filter = b.binary(BinaryOp::Eq, user_id, one);
    let group_total = b.column("total");
    let having_total = b.column("total");
    let zero = b.integer(0);
    let having = b.binary(BinaryOp::Gt, having_total, zero);
    let select = b.select(
        SelectNode::new(vec![result], vec![orders])
            .with_where(filter)
            .with_group_by(vec![group_total])
            .with_having(having),
    );
    let id = b.column("id");
    let order_by = b.order_by(id, false);
    let mut tree = b.cursor_with_order_by(select, vec![order_by]);

    binder().bind(&mut tree).unwrap();
    BindAssertions::assert_fully_bound(&tree);
    for reference in [user_id, group_total, having_total, id] {
        assert_eq!(BindAssertions::binding(&tree, reference).from_table, orders);
    }
}

#[test]
fn test_expression_nodes_are_traversed() {
    // SELECT CASE WHEN a IS NULL THEN UPPER(b) ELSE CURRENT_USER END
    // FROM t WHERE c IN (1, 2)
    let mut b = TreeBuilder::new();
    let a = b.column("a");
    let is_null = b.unary(UnaryOp::IsNull, a);
    let col_b = b.column("b");
    let upper = b.function("UPPER", vec![col_b]);
    let user = b.special_function(SpecialFunction::CurrentUser);
    let case = b.node(Node::Case {
        operand: None,
        conditions: vec![is_null].into(),
        results: vec![upper].into(),
        else_result: Some(user),
    });
    let result = b.named_result(case, "label");
    let t = b.table("t");
    let c = b.column("c");
    let one = b.integer(1);
    let two = b.integer(2);
    let filter = b.in_list(c, vec![one, two]);
    let select = b.select(SelectNode::new(vec![result], vec![t]).with_where(filter));
    let mut tree = b.cursor(select);

    binder().bind(&mut tree).unwrap();
    BindAssertions::assert_fully_bound(&tree);
    BindAssertions::assert_bound_to_table(&tree, col_b, t, "b");
    BindAssertions::assert_result_names(&tree, select, &["label"]);
}

#[test]
fn test_unpaired_case_result_is_still_bound() {
    // CASE WHEN a IS NULL THEN b <nope> END, with one result left unpaired
    let mut b = TreeBuilder::new();
    let a = b.column("a");
    let is_null = b.unary(UnaryOp::IsNull, a);
    let col_b = b.column("b");
    let nope = b.column("nope");
    let case = b.node(Node::Case {
        operand: None,
        conditions: vec![is_null].into(),
        results: vec![col_b, nope].into(),
        else_result: None,
    });
    let result = b.named_result(case, "label");
    let t = b.table("t");
    let select = b.select(SelectNode::new(vec![result], vec![t]));
    let mut tree = b.cursor(select);

    assert!(matches!(
        QueryTree::from_json(&tree.to_json_pretty().unwrap()),
        Err(sqlbind_ir::TreeError::MismatchedCase { conditions: 1, results: 2, .. })
    ));
    assert_eq!(
        binder().bind(&mut tree),
        Err(SemanticError::ColumnNotFound {
            column: "nope".to_string(),
            context: None,
        })
    );
}

// ===== Naming =====

#[test]
fn test_unnamed_columns_get_distinct_generated_names() {
    let mut fixture = TreeFixtures::unnamed_columns();
    binder().bind(&mut fixture.tree).unwrap();

    let mut names = Vec::new();
    for handle in ["first", "second", "third"] {
        let column = fixture.tree.result_column(fixture.node(handle)).unwrap();
        assert!(column.name_generated);
        names.push(column.name.clone().unwrap());
    }
    assert_eq!(names, vec!["SQLCol0", "SQLCol1", "SQLCol2"]);
}

#[test]
fn test_generated_names_are_unique_across_blocks() {
    // SELECT 1 FROM t WHERE EXISTS (SELECT 2 FROM s)
    let mut b = TreeBuilder::new();
    let two = b.integer(2);
    let inner_result = b.result(two);
    let s = b.table("s");
    let inner = b.select(SelectNode::new(vec![inner_result], vec![s]));
    let exists = b.subquery(inner, SubqueryKind::Exists, None);
    let one = b.integer(1);
    let outer_result = b.result(one);
    let t = b.table("t");
    let outer = b.select(SelectNode::new(vec![outer_result], vec![t]).with_where(exists));
    let mut tree = b.cursor(outer);

    binder().bind(&mut tree).unwrap();
    let outer_name = tree.result_column(outer_result).unwrap().name.clone();
    let inner_name = tree.result_column(inner_result).unwrap().name.clone();
    assert_eq!(outer_name.as_deref(), Some("SQLCol0"));
    assert_eq!(inner_name.as_deref(), Some("SQLCol1"));
}

#[test]
fn test_configured_prefix_is_used() {
    let mut fixture = TreeFixtures::unnamed_columns();
    let config = BinderConfig::new(STANDARD_SCHEMA).with_generated_column_prefix("EXPR_");
    Binder::with_config(catalog(), config)
        .bind(&mut fixture.tree)
        .unwrap();

    BindAssertions::assert_result_names(
        &fixture.tree,
        fixture.node("select"),
        &["EXPR_0", "EXPR_1", "EXPR_2"],
    );
}

// ===== Scopes =====

#[test]
fn test_duplicate_correlation_name() {
    let mut fixture = TreeFixtures::duplicate_alias();
    assert_eq!(
        binder().bind(&mut fixture.tree),
        Err(SemanticError::DuplicateCorrelationName("a".to_string()))
    );
}

#[test]
fn test_inner_block_may_not_reuse_outer_alias() {
    // SELECT 1 FROM t AS a WHERE EXISTS (SELECT 2 FROM s AS a)
    let mut b = TreeBuilder::new();
    let two = b.integer(2);
    let inner_result = b.result(two);
    let inner_a = b.table_as("s", "a");
    let inner = b.select(SelectNode::new(vec![inner_result], vec![inner_a]));
    let exists = b.subquery(inner, SubqueryKind::Exists, None);
    let one = b.integer(1);
    let outer_result = b.result(one);
    let outer_a = b.table_as("t", "a");
    let outer = b.select(SelectNode::new(vec![outer_result], vec![outer_a]).with_where(exists));
    let mut tree = b.cursor(outer);

    let mut binder = binder();
    assert_eq!(
        binder.bind(&mut tree),
        Err(SemanticError::DuplicateCorrelationName("a".to_string()))
    );
    assert_eq!(binder.scope_depth(), 0);
}

#[test]
fn test_sibling_blocks_may_reuse_an_alias() {
    // SELECT 1 FROM t WHERE EXISTS (SELECT 2 FROM s AS a) AND EXISTS (SELECT 3 FROM s AS a)
    let mut b = TreeBuilder::new();
    let mut exists = Vec::new();
    for value in [2, 3] {
        let constant = b.integer(value);
        let result = b.result(constant);
        let a = b.table_as("s", "a");
        let select = b.select(SelectNode::new(vec![result], vec![a]));
        exists.push(b.subquery(select, SubqueryKind::Exists, None));
    }
    let both = b.binary(BinaryOp::And, exists[0], exists[1]);
    let one = b.integer(1);
    let outer_result = b.result(one);
    let t = b.table("t");
    let outer = b.select(SelectNode::new(vec![outer_result], vec![t]).with_where(both));
    let mut tree = b.cursor(outer);

    assert!(binder().bind(&mut tree).is_ok());
}

#[test]
fn test_subquery_left_operand_binds_in_outer_scope() {
    let mut fixture = TreeFixtures::in_subquery();
    binder().bind(&mut fixture.tree).unwrap();

    // `id` would be ambiguous (users.id, orders.id) inside the subquery.
    BindAssertions::assert_bound_to_table(
        &fixture.tree,
        fixture.node("id"),
        fixture.node("users"),
        "id",
    );
    BindAssertions::assert_bound_to_table(
        &fixture.tree,
        fixture.node("user_id"),
        fixture.node("orders"),
        "user_id",
    );
    BindAssertions::assert_fully_bound(&fixture.tree);
}

#[test]
fn test_correlated_reference_to_outer_alias() {
    // SELECT name FROM users AS u WHERE EXISTS (SELECT total FROM orders WHERE user_id = u.id)
    let mut b = TreeBuilder::new();
    let total = b.column("total");
    let inner_result = b.result(total);
    let orders = b.table("orders");
    let user_id = b.column("user_id");
    let outer_id = b.qualified_column("u", "id");
    let filter = b.binary(BinaryOp::Eq, user_id, outer_id);
    let inner = b.select(SelectNode::new(vec![inner_result], vec![orders]).with_where(filter));
    let exists = b.subquery(inner, SubqueryKind::Exists, None);
    let name = b.column("name");
    let outer_result = b.result(name);
    let u = b.table_as("users", "u");
    let outer = b.select(SelectNode::new(vec![outer_result], vec![u]).with_where(exists));
    let mut tree = b.cursor(outer);

    binder().bind(&mut tree).unwrap();
    BindAssertions::assert_bound_to_table(&tree, outer_id, u, "id");
}

#[test]
fn test_name_visible_at_two_levels_is_ambiguous() {
    let mut fixture = TreeFixtures::id_visible_at_two_levels();
    assert_eq!(
        binder().bind(&mut fixture.tree),
        Err(SemanticError::AmbiguousColumn("id".to_string()))
    );
}

#[test]
fn test_from_entries_do_not_see_each_other() {
    // SELECT 1 FROM users AS u, (SELECT * FROM orders WHERE user_id = u.id) AS o
    let mut b = TreeBuilder::new();
    let star = b.wildcard();
    let orders = b.table("orders");
    let user_id = b.column("user_id");
    let outer_id = b.qualified_column("u", "id");
    let filter = b.binary(BinaryOp::Eq, user_id, outer_id);
    let inner = b.select(SelectNode::new(vec![star], vec![orders]).with_where(filter));
    let o = b.derived_table(inner, Some("o"));
    let one = b.integer(1);
    let result = b.result(one);
    let u = b.table_as("users", "u");
    let outer = b.select(SelectNode::new(vec![result], vec![u, o]));
    let mut tree = b.cursor(outer);

    assert_eq!(
        binder().bind(&mut tree),
        Err(SemanticError::TableNotFound("u".to_string()))
    );
}

// ===== Derived tables =====

#[test]
fn test_derived_table_columns_are_inner_result_names() {
    let mut fixture = TreeFixtures::derived_table();
    binder().bind(&mut fixture.tree).unwrap();

    let inner = fixture.node("inner");
    BindAssertions::assert_result_names(&fixture.tree, inner, &["A", "B", "C", "total"]);
    let inner_a = fixture.tree.get_result_column(inner, "A").unwrap();

    BindAssertions::assert_bound_to_derived(&fixture.tree, fixture.node("a"), fixture.node("x"), inner_a);
    BindAssertions::assert_bound_to_derived(
        &fixture.tree,
        fixture.node("outer_total"),
        fixture.node("x"),
        fixture.node("total_result"),
    );
    BindAssertions::assert_fully_bound(&fixture.tree);
}

#[test]
fn test_derived_column_lookup_is_exact() {
    // SELECT x.a FROM (SELECT * FROM t) AS x
    let mut b = TreeBuilder::new();
    let star = b.wildcard();
    let t = b.table("t");
    let inner = b.select(SelectNode::new(vec![star], vec![t]));
    let x = b.derived_table(inner, Some("x"));
    let a = b.qualified_column("x", "a");
    let result = b.result(a);
    let outer = b.select(SelectNode::new(vec![result], vec![x]));
    let mut tree = b.cursor(outer);

    assert_eq!(
        binder().bind(&mut tree),
        Err(SemanticError::ColumnNotFound {
            column: "a".to_string(),
            context: Some("x".to_string()),
        })
    );
}

#[test]
fn test_star_over_derived_table() {
    // SELECT * FROM (SELECT a AS k, b + 1 FROM t) AS x, s
    let mut b = TreeBuilder::new();
    let a = b.column("a");
    let k = b.named_result(a, "k");
    let col_b = b.column("b");
    let one = b.integer(1);
    let sum = b.binary(BinaryOp::Add, col_b, one);
    let unnamed = b.result(sum);
    let t = b.table("t");
    let inner = b.select(SelectNode::new(vec![k, unnamed], vec![t]));
    let x = b.derived_table(inner, Some("x"));
    let s = b.table("s");
    let star = b.wildcard();
    let outer = b.select(SelectNode::new(vec![star], vec![x, s]));
    let mut tree = b.cursor(outer);

    binder().bind(&mut tree).unwrap();
    BindAssertions::assert_result_names(&tree, outer, &["k", "SQLCol0", "A", "D"]);
    BindAssertions::assert_fully_bound(&tree);

    let first = tree.select(outer).unwrap().result_columns.get(0).unwrap();
    let expression = tree.result_column(first).unwrap().expression;
    BindAssertions::assert_bound_to_derived(&tree, expression, x, k);

    let second = tree.select(outer).unwrap().result_columns.get(1).unwrap();
    assert!(tree.result_column(second).unwrap().name_generated);
}

#[test]
fn test_qualified_star_over_derived_table() {
    // SELECT x.* FROM s, (SELECT a AS k FROM t) AS x
    let mut b = TreeBuilder::new();
    let a = b.column("a");
    let k = b.named_result(a, "k");
    let t = b.table("t");
    let inner = b.select(SelectNode::new(vec![k], vec![t]));
    let x = b.derived_table(inner, Some("x"));
    let s = b.table("s");
    let star = b.qualified_wildcard("x");
    let outer = b.select(SelectNode::new(vec![star], vec![s, x]));
    let mut tree = b.cursor(outer);

    binder().bind(&mut tree).unwrap();
    BindAssertions::assert_result_names(&tree, outer, &["k"]);
}

// ===== Binder lifecycle =====

#[test]
fn test_rebinding_a_bound_tree_changes_nothing() {
    let mut fixture = TreeFixtures::in_subquery();
    let mut binder = binder();
    binder.bind(&mut fixture.tree).unwrap();
    let bound = fixture.tree.clone();

    binder.bind(&mut fixture.tree).unwrap();
    assert_eq!(fixture.tree, bound);
}

#[test]
fn test_table_resolution_is_cached_on_the_tree() {
    let catalog = catalog();
    let mut fixture = TreeFixtures::qualified_column();
    let mut binder = Binder::new(catalog.clone(), STANDARD_SCHEMA);

    binder.bind(&mut fixture.tree).unwrap();
    assert_eq!(catalog.lookup_count(), 2);
    assert_eq!(
        catalog.lookups()[0],
        (STANDARD_SCHEMA.to_string(), "users".to_string())
    );

    binder.bind(&mut fixture.tree).unwrap();
    assert_eq!(catalog.lookup_count(), 2);
}

#[test]
fn test_table_name_is_lowercased_for_catalog() {
    // SELECT * FROM Test.USERS
    let catalog = catalog();
    let mut b = TreeBuilder::new();
    let star = b.wildcard();
    let users = b.qualified_table(STANDARD_SCHEMA, "USERS");
    let select = b.select(SelectNode::new(vec![star], vec![users]));
    let mut tree = b.cursor(select);

    bind(&mut tree, catalog.clone(), "elsewhere").unwrap();
    assert_eq!(
        catalog.lookups(),
        vec![(STANDARD_SCHEMA.to_string(), "users".to_string())]
    );
}

#[test]
fn test_unknown_table_reports_full_name() {
    // SELECT 1 FROM other.t
    let mut b = TreeBuilder::new();
    let one = b.integer(1);
    let result = b.result(one);
    let t = b.qualified_table("other", "t");
    let select = b.select(SelectNode::new(vec![result], vec![t]));
    let mut tree = b.cursor(select);

    assert_eq!(
        binder().bind(&mut tree),
        Err(SemanticError::TableNotFound("other.t".to_string()))
    );
}

#[test]
fn test_scope_stack_is_empty_after_success_and_failure() {
    let mut binder = binder();

    let mut ok = TreeFixtures::in_subquery();
    binder.bind(&mut ok.tree).unwrap();
    assert_eq!(binder.scope_depth(), 0);

    let mut failing = TreeFixtures::id_visible_at_two_levels();
    assert!(binder.bind(&mut failing.tree).is_err());
    assert_eq!(binder.scope_depth(), 0);

    // The same binder keeps working after a failure.
    let mut again = TreeFixtures::select_star();
    binder.bind(&mut again.tree).unwrap();
    assert_eq!(binder.scope_depth(), 0);
}

#[test]
fn test_bound_tree_survives_json() {
    let mut fixture = TreeFixtures::derived_table();
    binder().bind(&mut fixture.tree).unwrap();

    let json = fixture.tree.to_json_pretty().unwrap();
    let restored = QueryTree::from_json(&json).unwrap();
    assert_eq!(restored, fixture.tree);
    BindAssertions::assert_fully_bound(&restored);
}

#[test]
fn test_catalog_shared_across_threads() {
    let catalog: Arc<dyn Catalog> = catalog();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let catalog = Arc::clone(&catalog);
            std::thread::spawn(move || {
                let mut fixture = TreeFixtures::derived_table();
                bind(&mut fixture.tree, catalog, STANDARD_SCHEMA)
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap().is_ok());
    }
}
