//! # citadel-bootstrap
//!
//! Deploys, initializes and provisions a fresh Citadel protocol on a local network, then
//! prints the run report.
//!
//! ```bash
//! RUST_LOG=info citadel-bootstrap --report run.json
//! citadel-bootstrap --config mainnet-fork.toml
//! ```

use anyhow::Context;
use citadel_bootstrap::config::BootstrapConfig;
use citadel_bootstrap::lifecycle::Bootstrap;
use citadel_bootstrap::report::RunSummary;
use clap::Parser;
use component_framework::tracing::setup_tracing;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "citadel-bootstrap", about = "Bootstrap a fresh Citadel deployment")]
struct Cli {
    /// TOML configuration; the built-in local configuration when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the run report as JSON to this path.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    setup_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => BootstrapConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => BootstrapConfig::local().context("loading built-in local config")?,
    };

    info!("Starting Citadel bootstrap");
    let bootstrap = Bootstrap::new(config);

    match bootstrap.run(chrono::Utc::now()).await {
        Ok(deployment) => {
            println!("{}", deployment.summary);
            write_report(cli.report.as_deref(), &deployment.summary)?;
            deployment.registry.shutdown().await?;
            info!("Bootstrap completed successfully");
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            println!("{}", failure.summary);
            write_report(cli.report.as_deref(), &failure.summary)?;
            if let Some(registry) = failure.registry {
                registry.shutdown().await?;
            }
            error!(error = %failure.error, "Bootstrap failed; components may be partially initialized");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn write_report(path: Option<&Path>, summary: &RunSummary) -> anyhow::Result<()> {
    if let Some(path) = path {
        let json = summary.to_json().context("serializing run report")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "Run report written");
    }
    Ok(())
}
