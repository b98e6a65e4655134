// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # In-memory catalog
//!
//! This module provides a catalog implementation backed by a map of table
//! definitions, populated in code or loaded from a schema file.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sqlbind_catalog::{Catalog, MemoryCatalog};
//!
//! let catalog = MemoryCatalog::from_path("schema.yaml")?;
//! for table in catalog.list_tables() {
//!     println!("{}", table.qualified_name());
//! }
//! # Ok::<(), sqlbind_catalog::CatalogError>(())
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::metadata::TableMetadata;
use crate::{Catalog, CatalogError, CatalogResult};

/// On-disk shape of a catalog file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub tables: Vec<TableMetadata>,
}

/// Catalog holding its tables in memory, keyed by `(schema, name)`
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    tables: BTreeMap<(String, String), Arc<TableMetadata>>,
}

impl MemoryCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table, rejecting a second definition of the same
    /// `schema.name`
    pub fn add_table(&mut self, table: TableMetadata) -> CatalogResult<()> {
        let key = (table.schema.clone(), table.name.clone());
        if self.tables.contains_key(&key) {
            return Err(CatalogError::DuplicateTable {
                schema: key.0,
                table: key.1,
            });
        }
        debug!(
            "Registering table {} ({} columns)",
            table.qualified_name(),
            table.columns.len()
        );
        self.tables.insert(key, Arc::new(table));
        Ok(())
    }

    /// Builder-style registration; a later definition replaces an earlier one
    pub fn with_table(mut self, table: TableMetadata) -> Self {
        let key = (table.schema.clone(), table.name.clone());
        self.tables.insert(key, Arc::new(table));
        self
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Build a catalog from parsed file contents
    pub fn from_file(file: CatalogFile) -> CatalogResult<Self> {
        let mut catalog = Self::new();
        for table in file.tables {
            catalog.add_table(table)?;
        }
        Ok(catalog)
    }

    /// Load from a JSON document
    pub fn from_json_str(json: &str) -> CatalogResult<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_file(file)
    }

    /// Load from a YAML document
    pub fn from_yaml_str(yaml: &str) -> CatalogResult<Self> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;
        Self::from_file(file)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn from_path(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: shown.clone(),
            source,
        })?;

        debug!(path = %shown, "Loading catalog");
        match extension.as_deref() {
            Some("json") => Self::from_json_str(&content),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Err(CatalogError::UnsupportedFormat(shown)),
        }
    }

    /// Serialize the catalog back to its file shape
    pub fn to_file(&self) -> CatalogFile {
        CatalogFile {
            tables: self.tables.values().map(|t| (**t).clone()).collect(),
        }
    }
}

impl Catalog for MemoryCatalog {
    fn find_table(&self, schema: &str, table: &str) -> Option<Arc<TableMetadata>> {
        self.tables
            .get(&(schema.to_string(), table.to_string()))
            .cloned()
    }

    fn list_tables(&self) -> Vec<Arc<TableMetadata>> {
        self.tables.values().cloned().collect()
    }
}
