//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `url_frontier` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use url_frontier::initialization::init_logger_with;
use url_frontier::{run_seed, Config, Opt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists), e.g.
    // URL_FRONTIER_DB_PATH. Try the current directory first, then the
    // executable's directory.
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

    // Parsed after .env so the database default can come from it
    let config = Config::from(Opt::parse());

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    match run_seed(config).await {
        Ok(report) => {
            println!(
                "Added {} of {} URL{} in {:.1}s ({} stored, {} queued this session)",
                report.added,
                report.read,
                if report.read == 1 { "" } else { "s" },
                report.elapsed_seconds,
                report.total,
                report.queued
            );
            println!("Frontier saved in {}", report.db_path.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("url_frontier error: {:#}", e);
            process::exit(1);
        }
    }
}
