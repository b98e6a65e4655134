// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Wildcard expansion
//!
//! Replaces every `*` and `alias.*` in a query block's result column list
//! with explicit columns, and names every column that is still unnamed.
//!
//! The replacement list is built separately and swapped in once, so the
//! positions of the surrounding columns never shift mid-iteration. The
//! column references fabricated here are bound on the spot.

use sqlbind_ir::{
    BoundColumn, ColumnBinding, ColumnReference, Node, NodeId, NodeList, QueryTree, ResultColumn,
    TableName,
};
use tracing::debug;

use crate::error::{SemanticError, SemanticResult};

/// Expand the wildcards of `select` against `from_list` and guarantee every
/// result column a name
pub fn expand_alls_and_name_columns(
    tree: &mut QueryTree,
    select: NodeId,
    from_list: &NodeList,
    prefix: &str,
) -> SemanticResult<()> {
    let Some(block) = tree.select(select) else {
        return Ok(());
    };
    let columns = block.result_columns.clone();

    let mut expanded = NodeList::with_capacity(columns.len());
    let mut changed = false;
    for column in columns.iter() {
        match tree.all_result_column(column) {
            Some(all) => {
                let qualifier = all.table_name.clone();
                let expansion = expand_all(tree, qualifier.as_ref(), from_list)?;
                debug!(
                    qualifier = ?qualifier.as_ref().map(TableName::full_name),
                    columns = expansion.len(),
                    "Expanded wildcard"
                );
                for &result_column in &expansion {
                    guarantee_column_name(tree, result_column, prefix);
                }
                expanded.extend(expansion);
                changed = true;
            }
            None => {
                guarantee_column_name(tree, column, prefix);
                expanded.push(column);
            }
        }
    }

    if changed {
        if let Some(block) = tree.select_mut(select) {
            block.result_columns = expanded;
        }
    }
    Ok(())
}

/// Give an unnamed result column a statement-unique generated name
pub fn guarantee_column_name(tree: &mut QueryTree, result_column: NodeId, prefix: &str) {
    let unnamed = tree
        .result_column(result_column)
        .is_some_and(|column| column.name.is_none());
    if !unnamed {
        return;
    }

    let name = tree.generate_column_name(prefix);
    if let Some(column) = tree.result_column_mut(result_column) {
        debug!(name = %name, "Generated result column name");
        column.name = Some(name);
        column.name_generated = true;
    }
}

/// Expansion of one wildcard over a FROM list
///
/// An unqualified wildcard concatenates every entry's columns in FROM order.
/// A qualified one stops at the first entry whose exposed name matches.
pub fn expand_all(
    tree: &mut QueryTree,
    qualifier: Option<&TableName>,
    from_list: &NodeList,
) -> SemanticResult<Vec<NodeId>> {
    let mut result: Option<Vec<NodeId>> = None;

    for from in from_list.iter() {
        let Some(columns) = all_result_columns(tree, qualifier, from) else {
            continue;
        };
        result.get_or_insert_with(Vec::new).extend(columns);

        if qualifier.is_some() {
            break;
        }
    }

    result.ok_or_else(|| {
        SemanticError::TableNotFound(
            qualifier
                .map(TableName::full_name)
                .unwrap_or_else(|| "*".to_string()),
        )
    })
}

/// Columns `from` contributes to a wildcard, or `None` if the qualifier
/// names another entry
fn all_result_columns(
    tree: &mut QueryTree,
    qualifier: Option<&TableName>,
    from: NodeId,
) -> Option<Vec<NodeId>> {
    match tree.get(from)? {
        Node::FromBaseTable(_) => base_table_columns(tree, qualifier, from),
        Node::FromSubquery(_) => derived_table_columns(tree, qualifier, from),
        _ => None,
    }
}

fn base_table_columns(
    tree: &mut QueryTree,
    qualifier: Option<&TableName>,
    from: NodeId,
) -> Option<Vec<NodeId>> {
    let base = tree.base_table(from)?;
    let exposed = base.exposed_table_name();
    if qualifier.is_some_and(|q| !q.matches(&exposed)) {
        return None;
    }
    let table = base.table_name.binding.clone()?;

    let mut columns = Vec::with_capacity(table.columns.len());
    for (position, column) in table.columns.iter().enumerate() {
        let name = column.name.to_uppercase();
        let reference = tree.alloc(Node::ColumnReference(ColumnReference {
            column_name: name.clone(),
            table_name: Some(exposed.clone()),
            binding: Some(ColumnBinding {
                from_table: from,
                column: BoundColumn::Table {
                    position,
                    column: column.clone(),
                },
            }),
        }));
        columns.push(tree.alloc(Node::ResultColumn(ResultColumn {
            name: Some(name),
            expression: reference,
            name_generated: false,
        })));
    }
    Some(columns)
}

/// A derived table contributes its query's (already named) result columns
fn derived_table_columns(
    tree: &mut QueryTree,
    qualifier: Option<&TableName>,
    from: NodeId,
) -> Option<Vec<NodeId>> {
    let derived = tree.from_subquery(from)?;
    let alias = derived.correlation_name.clone();
    let exposed = alias.as_deref().map(TableName::new);
    if let Some(qualifier) = qualifier {
        if !exposed.as_ref().is_some_and(|e| qualifier.matches(e)) {
            return None;
        }
    }

    let inner: Vec<(NodeId, String, bool)> = tree
        .select(derived.subquery)?
        .result_columns
        .iter()
        .filter_map(|id| {
            let column = tree.result_column(id)?;
            let name = column.name.clone()?;
            Some((id, name, column.name_generated))
        })
        .collect();

    let mut columns = Vec::with_capacity(inner.len());
    for (result_column, name, name_generated) in inner {
        let reference = tree.alloc(Node::ColumnReference(ColumnReference {
            column_name: name.clone(),
            table_name: exposed.clone(),
            binding: Some(ColumnBinding {
                from_table: from,
                column: BoundColumn::Derived { result_column },
            }),
        }));
        columns.push(tree.alloc(Node::ResultColumn(ResultColumn {
            name: Some(name),
            expression: reference,
            name_generated,
        })));
    }
    Some(columns)
}
