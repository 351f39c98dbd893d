//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Keystone using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Keystone - layered configuration resolver
#[derive(Parser, Debug)]
#[command(name = "keystone")]
#[command(version, about, long_about = None)]
#[command(author = "Keystone Contributors")]
pub struct Cli {
    /// Path to settings file
    #[arg(short, long, default_value = "keystone.toml", env = "KEYSTONE_SETTINGS")]
    pub settings: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "KEYSTONE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve one key
    Get(commands::get::GetArgs),

    /// Print every resolved value, masking sensitive keys
    Dump(commands::dump::DumpArgs),

    /// List the source chain in precedence order
    Sources(commands::sources::SourcesArgs),

    /// Verify settings, sources and required keys
    Check(commands::check::CheckArgs),
}

impl Cli {
    /// Execute the selected command, returning the process exit code
    pub fn execute(&self) -> anyhow::Result<i32> {
        match &self.command {
            Commands::Get(args) => args.execute(&self.settings),
            Commands::Dump(args) => args.execute(&self.settings),
            Commands::Sources(args) => args.execute(&self.settings),
            Commands::Check(args) => args.execute(&self.settings),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_get() {
        let cli = Cli::parse_from(["keystone", "get", "browser"]);
        assert_eq!(cli.settings, "keystone.toml");
        match cli.command {
            Commands::Get(args) => assert_eq!(args.key, "browser"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_settings() {
        let cli = Cli::parse_from(["keystone", "--settings", "custom.toml", "sources"]);
        assert_eq!(cli.settings, "custom.toml");
        assert!(matches!(cli.command, Commands::Sources(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["keystone", "--log-level", "debug", "check"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::Check(_)));
    }

    #[test]
    fn test_cli_parse_dump_flags() {
        let cli = Cli::parse_from(["keystone", "dump", "--json", "--declared-only"]);
        match cli.command {
            Commands::Dump(args) => {
                assert!(args.json);
                assert!(args.declared_only);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
