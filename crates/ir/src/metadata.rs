// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Schema metadata
//!
//! Catalog-side descriptions of tables and columns. The binder only reads
//! these; a resolved [`TableName`](crate::TableName) keeps a shared handle to
//! the [`TableMetadata`] it was bound to.

use serde::{Deserialize, Serialize};

/// SQL data types as reported by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DataType {
    // Numeric types
    Integer,
    BigInt,
    SmallInt,
    Decimal,
    Double,

    // String types
    Varchar(Option<usize>),
    Char(Option<usize>),
    Text,

    // Date/Time types
    Date,
    Time,
    Timestamp,

    Boolean,
    Blob,

    // Unknown/Other (with original type name)
    Other(String),
}

/// Table type classification
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableType {
    #[default]
    Table,
    View,
    Other(String),
}

/// Metadata for a catalog column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name, exactly as stored in the catalog
    pub name: String,
    /// Data type
    pub data_type: DataType,
    /// Whether the column is nullable
    #[serde(default)]
    pub nullable: bool,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: false,
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

/// Metadata for a catalog table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Table name
    pub name: String,
    /// Schema name
    pub schema: String,
    /// Column definitions, in catalog order
    #[serde(default)]
    pub columns: Vec<ColumnMetadata>,
    /// Table type (TABLE, VIEW, ...)
    #[serde(default)]
    pub table_type: TableType,
}

impl TableMetadata {
    pub fn new(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            columns: Vec::new(),
            table_type: TableType::Table,
        }
    }

    pub fn with_columns(mut self, columns: Vec<ColumnMetadata>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_type(mut self, table_type: TableType) -> Self {
        self.table_type = table_type;
        self
    }

    /// Find a column by exact name, returning its position in catalog order
    pub fn get_column(&self, name: &str) -> Option<(usize, &ColumnMetadata)> {
        self.columns.iter().enumerate().find(|(_, c)| c.name == name)
    }

    /// `schema.name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}
