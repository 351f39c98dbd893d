// Keystone - Layered Configuration Resolver
// Copyright (c) 2025 Keystone Contributors
// Licensed under the MIT License

use clap::Parser;
use keystone::cli::Cli;
use keystone::config::load_settings;
use keystone::logging::init_logging;
use std::process;

fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Settings errors are reported by the command itself; here they only
    // decide how logging is set up.
    let settings = load_settings(&cli.settings).ok();
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| settings.as_ref().map(|s| s.application.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());
    let logging_config = settings.map(|s| s.logging).unwrap_or_default();

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Keystone starting");

    let exit_code = match cli.execute() {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    // process::exit skips destructors; flush file logs first.
    drop(guard);
    process::exit(exit_code);
}
