// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Mock catalog implementation for testing
//!
//! Provides an in-memory catalog with builder pattern for easy test setup.
//! Every lookup is recorded so tests can check how often the binder asked.

use std::sync::{Arc, Mutex};

use sqlbind_catalog::{Catalog, ColumnMetadata, DataType, MemoryCatalog, TableMetadata};

/// Schema holding the standard test tables
pub const STANDARD_SCHEMA: &str = "test";

/// In-memory mock catalog for testing
#[derive(Debug, Default)]
pub struct MockCatalog {
    inner: MemoryCatalog,
    lookups: Mutex<Vec<(String, String)>>,
}

impl MockCatalog {
    /// Create a new empty mock catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table to the catalog
    pub fn add_table(mut self, table: TableMetadata) -> Self {
        self.inner = self.inner.with_table(table);
        self
    }

    /// Every `(schema, table)` pair passed to `find_table`, in call order
    pub fn lookups(&self) -> Vec<(String, String)> {
        self.lookups.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().map(|l| l.len()).unwrap_or_default()
    }
}

impl Catalog for MockCatalog {
    fn find_table(&self, schema: &str, table: &str) -> Option<Arc<TableMetadata>> {
        if let Ok(mut lookups) = self.lookups.lock() {
            lookups.push((schema.to_string(), table.to_string()));
        }
        self.inner.find_table(schema, table)
    }

    fn list_tables(&self) -> Vec<Arc<TableMetadata>> {
        self.inner.list_tables()
    }
}

/// Builder for creating mock catalogs with a fluent API
pub struct MockCatalogBuilder {
    catalog: MockCatalog,
}

impl Default for MockCatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalogBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            catalog: MockCatalog::new(),
        }
    }

    /// Add the standard test schema
    ///
    /// All tables live in [`STANDARD_SCHEMA`]:
    /// - `t (a, b, c)`
    /// - `s (a, d)`
    /// - `users (id, name, email)`
    /// - `orders (id, user_id, total)`
    pub fn with_standard_schema(mut self) -> Self {
        self.catalog = self
            .catalog
            .add_table(
                TableMetadata::new("t", STANDARD_SCHEMA).with_columns(vec![
                    ColumnMetadata::new("a", DataType::Integer),
                    ColumnMetadata::new("b", DataType::Varchar(Some(20))).with_nullable(true),
                    ColumnMetadata::new("c", DataType::Decimal).with_nullable(true),
                ]),
            )
            .add_table(
                TableMetadata::new("s", STANDARD_SCHEMA).with_columns(vec![
                    ColumnMetadata::new("a", DataType::Integer),
                    ColumnMetadata::new("d", DataType::Date).with_nullable(true),
                ]),
            )
            .add_table(
                TableMetadata::new("users", STANDARD_SCHEMA).with_columns(vec![
                    ColumnMetadata::new("id", DataType::BigInt),
                    ColumnMetadata::new("name", DataType::Varchar(Some(100))),
                    ColumnMetadata::new("email", DataType::Varchar(Some(255))).with_nullable(true),
                ]),
            )
            .add_table(
                TableMetadata::new("orders", STANDARD_SCHEMA).with_columns(vec![
                    ColumnMetadata::new("id", DataType::BigInt),
                    ColumnMetadata::new("user_id", DataType::BigInt),
                    ColumnMetadata::new("total", DataType::Decimal).with_nullable(true),
                ]),
            );
        self
    }

    /// Add a custom table
    pub fn with_table(mut self, table: TableMetadata) -> Self {
        self.catalog = self.catalog.add_table(table);
        self
    }

    /// Build the mock catalog
    pub fn build(self) -> MockCatalog {
        self.catalog
    }

    /// Build the mock catalog behind an `Arc`
    pub fn build_shared(self) -> Arc<MockCatalog> {
        Arc::new(self.catalog)
    }
}
