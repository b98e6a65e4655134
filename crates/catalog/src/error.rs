// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for Catalog operations
//!
//! Lookups never fail (a missing table is `None`); these errors come from
//! building and loading catalogs.

use thiserror::Error;

/// Result type alias for Catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while building or loading a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Failed to read a catalog file
    #[error("Failed to read catalog file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse JSON schema data
    #[error("Failed to parse JSON schema data: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to parse YAML schema data
    #[error("Failed to parse YAML schema data: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The same `schema.table` was registered twice
    #[error("Table '{table}' already exists in schema '{schema}'")]
    DuplicateTable { schema: String, table: String },

    /// Catalog file extension is neither JSON nor YAML
    #[error("Unsupported catalog file format: {0}")]
    UnsupportedFormat(String),
}
