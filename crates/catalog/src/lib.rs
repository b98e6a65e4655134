// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sqlbind - Catalog Layer
//!
//! This crate provides the schema abstraction the binder resolves names
//! against. It defines the [`Catalog`] trait and an in-memory implementation
//! that can be populated in code or loaded from JSON/YAML schema files.
//!
//! ## Catalog files
//!
//! ```yaml
//! tables:
//!   - name: users
//!     schema: app
//!     columns:
//!       - { name: id, data_type: Integer }
//!       - { name: email, data_type: { Varchar: 255 }, nullable: true }
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use sqlbind_catalog::{Catalog, ColumnMetadata, DataType, MemoryCatalog, TableMetadata};
//!
//! let catalog = MemoryCatalog::new().with_table(
//!     TableMetadata::new("users", "app")
//!         .with_columns(vec![ColumnMetadata::new("id", DataType::Integer)]),
//! );
//!
//! let users = catalog.find_table("app", "users").unwrap();
//! assert_eq!(users.columns.len(), 1);
//! ```

pub mod error;
pub mod memory;
pub mod metadata;
pub mod r#trait;

// Re-exports
pub use error::{CatalogError, CatalogResult};
pub use memory::{CatalogFile, MemoryCatalog};
pub use metadata::{ColumnMetadata, DataType, TableMetadata, TableType};
pub use r#trait::Catalog;
