//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `subwatch` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use subwatch::error_handling::ScanStats;
use subwatch::initialization::{init_client, init_logger_with};
use subwatch::notify::SlackNotifier;
use subwatch::source::CtSource;
use subwatch::{app, run_scan, Cli, CliCommand, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // Try loading from current directory first, then from the executable's directory
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

    let (command, config) = Cli::parse().split();

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    match dispatch(command, &config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("subwatch error: {:#}", e);
            process::exit(1);
        }
    }
}

async fn dispatch(command: CliCommand, config: &Config) -> Result<()> {
    match command {
        CliCommand::Add { domain, yes } => {
            let stats = Arc::new(ScanStats::new());
            let client = init_client(config)?;
            let source = Arc::new(CtSource::from_config(config, client, stats));
            app::add_domain(config, source, &domain, yes).await
        }
        CliCommand::Remove { domain } => app::remove_domain(config, &domain),
        CliCommand::List => app::list_domains(config),
        CliCommand::Reset { yes } => app::reset(config, yes),
        CliCommand::Scan { .. } => {
            let stats = Arc::new(ScanStats::new());
            let client = init_client(config)?;
            let source = Arc::new(CtSource::from_config(
                config,
                Arc::clone(&client),
                Arc::clone(&stats),
            ));
            let notifier = Arc::new(SlackNotifier::from_config(config, client)?);

            let report = run_scan(config, source, notifier, stats).await?;

            // Print user-friendly summary
            println!(
                "✅ Checked {} domain{} ({} new subdomain{}, {} notified, {} failed) in {:.1}s",
                report.domains,
                if report.domains == 1 { "" } else { "s" },
                report.discoveries,
                if report.discoveries == 1 { "" } else { "s" },
                report.notified,
                report.failed,
                report.elapsed_seconds
            );
            Ok(())
        }
    }
}
