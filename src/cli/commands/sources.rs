//! Sources command implementation
//!
//! Lists the assembled source chain, highest precedence first.

use super::{build_engine, EXIT_SETTINGS};
use clap::Args;

/// Arguments for the sources command
#[derive(Args, Debug)]
pub struct SourcesArgs {}

impl SourcesArgs {
    /// Execute the sources command
    pub fn execute(&self, settings_path: &str) -> anyhow::Result<i32> {
        tracing::info!(settings_path = %settings_path, "Listing sources");

        let engine = match build_engine(settings_path) {
            Ok(engine) => engine,
            Err(e) => {
                println!("❌ Failed to assemble configuration");
                println!("   Error: {e}");
                return Ok(EXIT_SETTINGS);
            }
        };

        let sources = engine.sources();
        println!("Found {} source(s):", sources.len());
        println!();
        println!("{:<6} {:<50} {:<12} {:<10}", "Index", "Name", "Kind", "Priority");
        println!("{}", "-".repeat(80));
        for (index, source) in sources.iter().enumerate() {
            println!(
                "{:<6} {:<50} {:<12} {:<10}",
                index,
                source.name(),
                source.kind().to_string(),
                source.priority()
            );
        }
        println!();
        Ok(0)
    }
}
