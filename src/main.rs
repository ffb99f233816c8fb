//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `traffic_import` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file, docker link variables)
//! - Logger initialization
//! - Exit codes
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use traffic_import::config::{Opt, EXIT_FAILURE};
use traffic_import::initialization::init_logger_with;
use traffic_import::{run_import, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // .env from the current directory first, then next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let opt = match Opt::try_parse() {
        Ok(opt) => opt,
        Err(e) => {
            let _ = e.print();
            // Help and version requests are not failures.
            process::exit(if e.use_stderr() { EXIT_FAILURE } else { 0 });
        }
    };
    let config = Config::from(opt).with_env_overrides();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_import(config).await {
        Ok(report) if report.is_success() => Ok(()),
        Ok(report) => {
            for path in &report.failed_files {
                eprintln!("traffic_import: failed to import {}", path.display());
            }
            process::exit(EXIT_FAILURE);
        }
        Err(e) => {
            eprintln!("traffic_import error: {:#}", e);
            process::exit(EXIT_FAILURE);
        }
    }
}
