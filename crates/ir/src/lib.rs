// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sqlbind - Statement tree
//!
//! This crate provides the data model the binder works on:
//! - An arena-backed statement tree ([`QueryTree`]) addressed by [`NodeId`]
//! - The closed set of node kinds ([`Node`]) for query blocks, FROM list
//!   entries, result columns and expressions
//! - Catalog metadata ([`TableMetadata`], [`ColumnMetadata`]) that bound
//!   names point at
//! - The before/after traversal protocol ([`Visitor`], [`walk`])

pub mod builder;
pub mod metadata;
pub mod node;
pub mod tree;
pub mod visitor;

// Re-export commonly used types
pub use builder::TreeBuilder;
pub use metadata::{ColumnMetadata, DataType, TableMetadata, TableType};
pub use node::{
    AllResultColumn, BinaryOp, BoundColumn, ColumnBinding, ColumnReference, CursorNode,
    FromBaseTable, FromSubquery, Literal, Node, NodeList, OrderByColumn, ResultColumn, SelectNode,
    SpecialFunction, SubqueryKind, SubqueryNode, TableName, UnaryOp,
};
pub use tree::{NodeId, QueryTree, TreeError};
pub use visitor::{VisitedSet, Visitor, walk};
