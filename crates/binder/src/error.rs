// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Error types for binding
//!
//! Every failure the binder can report. Binding stops at the first error.

use thiserror::Error;

/// Result type alias for binding operations
pub type SemanticResult<T> = Result<T, SemanticError>;

/// Errors that can occur while binding a statement
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SemanticError {
    /// No catalog table or FROM list entry matches the name
    #[error("Table {0} not found")]
    TableNotFound(String),

    /// A qualifier matches more than one unaliased FROM list entry
    #[error("Ambiguous table {0}")]
    AmbiguousTable(String),

    /// No visible table supplies the column
    #[error("Column {column} not found{}", in_context(.context))]
    ColumnNotFound {
        column: String,
        /// Exposed name of the table searched, for qualified references
        context: Option<String>,
    },

    /// More than one visible table supplies the column
    #[error("Column {0} is ambiguous")]
    AmbiguousColumn(String),

    /// Two FROM list entries of one query block share a correlation name
    #[error("More than one use of {0} as correlation name")]
    DuplicateCorrelationName(String),
}

fn in_context(context: &Option<String>) -> String {
    match context {
        Some(table) => format!(" in {}", table),
        None => String::new(),
    }
}
