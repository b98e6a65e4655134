// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Catalog trait for database schema abstraction
//!
//! The binder reads table definitions through this trait and never mutates
//! them.

use std::sync::Arc;

use crate::metadata::TableMetadata;

/// Read-only source of table definitions
///
/// Lookups are exact string matches; callers normalize names (the binder
/// lowercases table names) before asking.
///
/// # Examples
///
/// ```rust
/// use sqlbind_catalog::{Catalog, MemoryCatalog, TableMetadata};
///
/// let catalog = MemoryCatalog::new().with_table(TableMetadata::new("users", "app"));
/// assert!(catalog.find_table("app", "users").is_some());
/// assert!(catalog.find_table("app", "USERS").is_none());
/// ```
pub trait Catalog: Send + Sync {
    /// Find a table by schema and table name
    fn find_table(&self, schema: &str, table: &str) -> Option<Arc<TableMetadata>>;

    /// List every table the catalog knows about
    fn list_tables(&self) -> Vec<Arc<TableMetadata>>;
}

impl<C: Catalog + ?Sized> Catalog for Arc<C> {
    fn find_table(&self, schema: &str, table: &str) -> Option<Arc<TableMetadata>> {
        (**self).find_table(schema, table)
    }

    fn list_tables(&self) -> Vec<Arc<TableMetadata>> {
        (**self).list_tables()
    }
}
