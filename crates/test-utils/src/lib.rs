// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities for sqlbind
//!
//! This crate provides common testing components including:
//! - A mock catalog that records lookups
//! - Statement tree fixtures for common query shapes
//! - Assertions over bound trees

pub mod assertions;
pub mod fixtures;
pub mod mock_catalog;

// Re-exports for convenience
pub use assertions::BindAssertions;
pub use fixtures::{Fixture, TreeFixtures};
pub use mock_catalog::{MockCatalog, MockCatalogBuilder, STANDARD_SCHEMA};
