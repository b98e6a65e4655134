// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Metadata types for database schema information
//!
//! This module re-exports metadata types from the `sqlbind-ir` crate, where
//! bound table names keep a handle to them.

pub use sqlbind_ir::{ColumnMetadata, DataType, TableMetadata, TableType};
