// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sqlbind command line
//!
//! Binds a statement tree, handed over as JSON by an external parser, against
//! a catalog file and prints the bound tree.
//!
//! ```text
//! sqlbind --catalog schema.yaml --statement query.json --default-schema app
//! sqlbind --catalog schema.json --statement query.json --tree
//! ```
//!
//! Settings are read from an optional JSON file with the shape accepted by
//! [`BinderConfig::from_settings`]; `--default-schema` overrides it.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use sqlbind_binder::{Binder, BinderConfig};
use sqlbind_catalog::{Catalog, MemoryCatalog};
use sqlbind_ir::QueryTree;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    name = "sqlbind",
    about = "Resolve table and column names of a SQL statement tree",
    version
)]
pub struct Cli {
    /// Catalog file (.json, .yaml or .yml)
    #[arg(short, long, value_name = "FILE")]
    pub catalog: PathBuf,

    /// Statement tree as JSON
    #[arg(short, long, value_name = "FILE")]
    pub statement: PathBuf,

    /// Settings file with a `sqlbind` section
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Schema for unqualified table names (overrides the settings file)
    #[arg(long)]
    pub default_schema: Option<String>,

    /// Print an indented dump instead of JSON
    #[arg(long)]
    pub tree: bool,

    /// Log binder decisions at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

/// Resolve the binder configuration from the settings file and flags
pub fn load_config(cli: &Cli) -> Result<BinderConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings {}", path.display()))?;
            let settings: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("Invalid settings JSON in {}", path.display()))?;
            BinderConfig::from_settings(&settings).unwrap_or_default()
        }
        None => BinderConfig::default(),
    };

    if let Some(schema) = &cli.default_schema {
        config.default_schema = schema.clone();
    }
    config.validate()?;
    debug!(?config, "Loaded binder config");
    Ok(config)
}

/// Bind a JSON statement against `catalog` and return the bound tree
pub fn bind_statement(
    statement_json: &str,
    catalog: Arc<dyn Catalog>,
    config: BinderConfig,
) -> Result<QueryTree> {
    let mut tree = QueryTree::from_json(statement_json).context("Invalid statement tree")?;
    Binder::with_config(catalog, config).bind(&mut tree)?;
    Ok(tree)
}

/// Render a bound tree as pretty JSON or as an indented dump
pub fn render(tree: &QueryTree, dump: bool) -> Result<String> {
    if dump {
        let root = tree.root().ok_or_else(|| anyhow!("Statement has no root"))?;
        Ok(tree.tree_print(root))
    } else {
        Ok(tree.to_json_pretty()?)
    }
}

/// Run the command and return what should be printed
pub fn run(cli: &Cli) -> Result<String> {
    let config = load_config(cli)?;

    let catalog = MemoryCatalog::from_path(&cli.catalog)
        .with_context(|| format!("Failed to load catalog {}", cli.catalog.display()))?;
    info!(tables = catalog.len(), "Loaded catalog");

    let statement = fs::read_to_string(&cli.statement)
        .with_context(|| format!("Failed to read statement {}", cli.statement.display()))?;

    let tree = bind_statement(&statement, Arc::new(catalog), config)?;
    render(&tree, cli.tree)
}
