// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # sqlbind - Binding Layer
//!
//! This crate resolves the names of a parsed SQL statement against a schema
//! catalog and annotates the statement tree in place.
//!
//! ## Overview
//!
//! Binding provides:
//! - **Table resolution**: every FROM list table is matched to a catalog table
//! - **Column resolution**: every column reference is matched to the FROM
//!   list entry (and column) supplying it
//! - **Wildcard expansion**: `*` and `alias.*` become explicit, named columns
//! - **Scope checks**: ambiguous or unknown names and duplicate correlation
//!   names are reported as [`SemanticError`]s
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use sqlbind_binder::{bind, SemanticError};
//! use sqlbind_catalog::{ColumnMetadata, DataType, MemoryCatalog, TableMetadata};
//! use sqlbind_ir::{SelectNode, TreeBuilder};
//!
//! let catalog = Arc::new(
//!     MemoryCatalog::new()
//!         .with_table(TableMetadata::new("t", "app").with_columns(vec![
//!             ColumnMetadata::new("id", DataType::Integer),
//!         ]))
//!         .with_table(TableMetadata::new("s", "app").with_columns(vec![
//!             ColumnMetadata::new("id", DataType::Integer),
//!         ])),
//! );
//!
//! // SELECT id FROM t, s
//! let mut b = TreeBuilder::new();
//! let id = b.column("id");
//! let id = b.result(id);
//! let t = b.table("t");
//! let s = b.table("s");
//! let select = b.select(SelectNode::new(vec![id], vec![t, s]));
//! let mut tree = b.cursor(select);
//!
//! let err = bind(&mut tree, catalog, "app").unwrap_err();
//! assert_eq!(err, SemanticError::AmbiguousColumn("id".to_string()));
//! ```

pub mod binder;
pub mod config;
pub mod error;
pub mod scope;
pub mod wildcard;

// Re-export commonly used types
pub use binder::{Binder, bind, column_binding};
pub use config::{BinderConfig, ConfigError};
pub use error::{SemanticError, SemanticResult};
pub use scope::{BindingContext, ScopeStack, ScopeType};
