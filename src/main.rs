// src/main.rs

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use guest_inventory::config::DEFAULT_CONFIG_PATH;
use guest_inventory::{
    format_inventory, AgentConfig, AgentRun, FileInventorySource, InventoryAgent, InventorySource,
    ReportState,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "guest-inventory")]
#[command(author, version, about = "Normalize and report guest package inventory", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical inventory for a snapshot as JSON
    Format {
        /// Inventory snapshot written by the collector
        #[arg(short, long)]
        snapshot: PathBuf,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Run one reporting cycle for a snapshot
    Report {
        /// Inventory snapshot written by the collector
        #[arg(short, long)]
        snapshot: PathBuf,
        /// Agent configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
        /// Skip guest attribute publication
        #[arg(long)]
        no_attributes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Format { snapshot, pretty } => {
            let state = FileInventorySource::new(&snapshot).snapshot()?;
            let inventory = format_inventory(&state);
            let json = if pretty {
                serde_json::to_string_pretty(&inventory)?
            } else {
                serde_json::to_string(&inventory)?
            };
            println!("{}", json);
            Ok(())
        }
        Commands::Report {
            snapshot,
            config,
            no_attributes,
        } => {
            let mut config = AgentConfig::load(&config)
                .with_context(|| format!("loading {}", config.display()))?;
            if no_attributes {
                config.attributes.enabled = false;
            }

            let agent = InventoryAgent::from_config(&config, Box::new(FileInventorySource::new(snapshot)))?;
            let cancel = AtomicBool::new(false);

            info!("Reporting inventory (max retries: {})", agent.policy().max_retries);
            match agent.report_inventory(&cancel) {
                AgentRun::Reported { outcome, attributes } => {
                    if let Some(summary) = attributes {
                        println!(
                            "Guest attributes: {} written, {} failed",
                            summary.written, summary.failed
                        );
                    }
                    println!("Report {} after {} attempts", outcome.state, outcome.attempts);
                    if outcome.state != ReportState::Done {
                        std::process::exit(1);
                    }
                    Ok(())
                }
                AgentRun::AlreadyRunning => Err(anyhow::anyhow!("A report is already in progress")),
                AgentRun::SnapshotFailed => Err(anyhow::anyhow!("Failed to read inventory snapshot")),
            }
        }
    }
}
