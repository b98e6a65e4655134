// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Binder Configuration
//!
//! Settings that shape name resolution:
//! - the schema assumed for unqualified table names
//! - the prefix of synthesized result column names
//!
//! ## Example
//!
//! ```rust
//! use sqlbind_binder::BinderConfig;
//! use serde_json::json;
//!
//! let settings = json!({ "sqlbind": { "defaultSchema": "app" } });
//! let config = BinderConfig::from_settings(&settings).unwrap();
//! assert_eq!(config.default_schema, "app");
//! assert_eq!(config.generated_column_prefix, "SQLCol");
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Schema used when neither the caller nor the settings name one
pub const DEFAULT_SCHEMA: &str = "public";

/// Prefix of generated result column names
pub const DEFAULT_COLUMN_PREFIX: &str = "SQLCol";

/// Binder configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BinderConfig {
    /// Schema applied to unqualified table names
    pub default_schema: String,

    /// Prefix for names given to unnamed result columns
    pub generated_column_prefix: String,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            default_schema: DEFAULT_SCHEMA.to_string(),
            generated_column_prefix: DEFAULT_COLUMN_PREFIX.to_string(),
        }
    }
}

impl BinderConfig {
    /// Create a configuration with the given default schema
    pub fn new(default_schema: impl Into<String>) -> Self {
        Self {
            default_schema: default_schema.into(),
            ..Default::default()
        }
    }

    pub fn with_generated_column_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.generated_column_prefix = prefix.into();
        self
    }

    /// Validate the configuration
    ///
    /// Checks that:
    /// - The default schema is not empty
    /// - The generated column prefix starts like an identifier
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_schema.trim().is_empty() {
            return Err(ConfigError::EmptyDefaultSchema);
        }

        match self.generated_column_prefix.chars().next() {
            None => Err(ConfigError::InvalidColumnPrefix {
                prefix: self.generated_column_prefix.clone(),
                reason: "prefix must not be empty".to_string(),
            }),
            Some(c) if !(c.is_alphabetic() || c == '_') => Err(ConfigError::InvalidColumnPrefix {
                prefix: self.generated_column_prefix.clone(),
                reason: "prefix must start with a letter or underscore".to_string(),
            }),
            Some(_) => Ok(()),
        }
    }

    /// Parse binder config from a settings payload.
    ///
    /// Expected shape:
    /// {
    ///   "sqlbind": {
    ///     "defaultSchema": "...",
    ///     "generatedColumnPrefix": "..."
    ///   }
    /// }
    ///
    /// Returns `None` when the `sqlbind` section is absent. Missing keys keep
    /// their defaults.
    pub fn from_settings(settings: &Value) -> Option<Self> {
        let section = settings.get("sqlbind")?;
        let mut config = Self::default();

        if let Some(schema) = section.get("defaultSchema").and_then(Value::as_str) {
            config.default_schema = schema.to_string();
        }
        if let Some(prefix) = section
            .get("generatedColumnPrefix")
            .and_then(Value::as_str)
        {
            config.generated_column_prefix = prefix.to_string();
        }

        Some(config)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Missing default schema
    #[error("Default schema must not be empty")]
    EmptyDefaultSchema,

    /// Unusable generated column prefix
    #[error("Invalid generated column prefix '{prefix}': {reason}")]
    InvalidColumnPrefix { prefix: String, reason: String },
}
