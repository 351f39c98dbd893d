//! Get command implementation
//!
//! Resolves one key through the full chain and prints it, optionally
//! converted to a type and annotated with the source that answered.

use super::{build_engine, EXIT_SETTINGS};
use crate::core::ConfigEngine;
use crate::domain::Result;
use clap::{Args, ValueEnum};

/// Type to convert the value to before printing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ValueType {
    /// Raw string
    #[default]
    String,
    /// 32-bit integer
    Int,
    /// 64-bit integer
    Long,
    /// Floating point
    Double,
    /// Boolean
    Bool,
    /// Duration, printed in milliseconds
    Duration,
    /// Delimited list, printed one item per line
    List,
}

/// Arguments for the get command
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Key to resolve
    pub key: String,

    /// Convert the value to this type
    #[arg(short = 't', long = "type", value_enum, default_value_t = ValueType::String)]
    pub value_type: ValueType,

    /// Also print which source answered
    #[arg(long)]
    pub show_source: bool,
}

impl GetArgs {
    /// Execute the get command
    pub fn execute(&self, settings_path: &str) -> anyhow::Result<i32> {
        tracing::info!(key = %self.key, value_type = ?self.value_type, "Resolving key");

        let engine = match build_engine(settings_path) {
            Ok(engine) => engine,
            Err(e) => {
                println!("❌ Failed to assemble configuration");
                println!("   Error: {e}");
                return Ok(EXIT_SETTINGS);
            }
        };

        match render(&engine, &self.key, self.value_type) {
            Ok(Some(lines)) => {
                for line in lines {
                    println!("{line}");
                }
                if self.show_source {
                    match engine.describe(&self.key) {
                        Some(resolved) => println!(
                            "# from {} (priority {})",
                            resolved.source_name, resolved.source_priority
                        ),
                        None => println!("# from declared default"),
                    }
                }
                Ok(0)
            }
            Ok(None) => {
                println!("❌ Key '{}' is not set", self.key);
                Ok(1)
            }
            Err(e) => {
                println!("❌ {e}");
                Ok(3)
            }
        }
    }
}

/// Renders `key` as output lines; sensitive values are always masked
fn render(engine: &ConfigEngine, key: &str, value_type: ValueType) -> Result<Option<Vec<String>>> {
    let rendered = match value_type {
        ValueType::String => engine.get_string(key).map(|v| vec![v]),
        ValueType::Int => engine.get_int(key)?.map(|v| vec![v.to_string()]),
        ValueType::Long => engine.get_long(key)?.map(|v| vec![v.to_string()]),
        ValueType::Double => engine.get_double(key)?.map(|v| vec![v.to_string()]),
        ValueType::Bool => engine.get_bool(key)?.map(|v| vec![v.to_string()]),
        ValueType::Duration => engine
            .get_duration(key)?
            .map(|v| vec![format!("{}ms", v.as_millis())]),
        ValueType::List => engine.get_list(key),
    };

    if engine.is_sensitive(key) {
        return Ok(rendered.map(|_| vec![engine.options().redaction_token.clone()]));
    }
    Ok(rendered)
}
