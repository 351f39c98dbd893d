//! Dump command implementation
//!
//! Prints every known key with its display value and origin. Sensitive
//! values are always replaced by the redaction token.

use super::{build_engine, EXIT_SETTINGS};
use crate::core::ConfigEngine;
use clap::Args;
use serde::Serialize;

/// Arguments for the dump command
#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Only list declared keys
    #[arg(long)]
    pub declared_only: bool,
}

/// One row of dump output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumpEntry {
    /// Key name
    pub key: String,
    /// Display value (masked when sensitive)
    pub value: String,
    /// Source that answered, `default` for declared defaults
    pub source: Option<String>,
    /// Whether the value is masked
    pub sensitive: bool,
}

impl DumpArgs {
    /// Execute the dump command
    pub fn execute(&self, settings_path: &str) -> anyhow::Result<i32> {
        tracing::info!(declared_only = self.declared_only, "Dumping configuration");

        let engine = match build_engine(settings_path) {
            Ok(engine) => engine,
            Err(e) => {
                println!("❌ Failed to assemble configuration");
                println!("   Error: {e}");
                return Ok(EXIT_SETTINGS);
            }
        };

        let entries = collect_entries(&engine, self.declared_only);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(0);
        }

        println!("{:<40} {:<40} {:<20}", "Key", "Value", "Source");
        println!("{}", "-".repeat(100));
        for entry in &entries {
            println!(
                "{:<40} {:<40} {:<20}",
                entry.key,
                entry.value,
                entry.source.as_deref().unwrap_or("-")
            );
        }
        println!();
        println!("{} key(s)", entries.len());
        Ok(0)
    }
}

/// Builds dump rows, sorted by key
pub fn collect_entries(engine: &ConfigEngine, declared_only: bool) -> Vec<DumpEntry> {
    let mut keys: Vec<String> = engine
        .declared_keys()
        .iter()
        .map(|k| k.name().to_string())
        .collect();
    if !declared_only {
        keys.extend(engine.snapshot().into_iter().map(|(key, _)| key));
    }
    keys.sort();
    keys.dedup();

    keys.into_iter()
        .map(|key| {
            let source = match engine.describe(&key) {
                Some(resolved) => Some(resolved.source_name),
                None => engine
                    .key(&key)
                    .and_then(|k| k.default_value().map(|_| "default".to_string())),
            };
            DumpEntry {
                value: engine.display(&key),
                sensitive: engine.is_sensitive(&key),
                source,
                key,
            }
        })
        .collect()
}
