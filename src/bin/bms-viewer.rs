//! # BMS Viewer
//!
//! Connect to one or more SmartBMS units, print their current readings once
//! and exit.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use bms_logger::cli::ViewerCli;
use bms_logger::diagnostics;
use bms_logger::serial::SerialConnector;
use bms_logger::telemetry::run::bring_up;
use bms_logger::telemetry::Shutdown;
use bms_logger::viewer::SnapshotReport;

#[tokio::main]
async fn main() -> Result<()> {
    println!("SmartBMS Data Viewer\n");

    let cli = ViewerCli::parse();
    let config = cli.config().context("Failed to load configuration")?;
    let _guard = diagnostics::init(&config.diagnostics, "bms-viewer.log");

    let (trigger, mut shutdown) = Shutdown::new();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.trigger();
        }
    });

    let connector = SerialConnector::from_config(&config.serial);
    let Some(registry) = bring_up(
        &config.serial.ports,
        &connector,
        config.logging.settle_delay(),
        &mut shutdown,
    )
    .await
    .context("Failed to connect")?
    else {
        info!("Interrupted before readings were available");
        return Ok(());
    };

    for handle in registry.handles() {
        let snapshot = handle
            .source()
            .snapshot()
            .with_context(|| format!("Error retrieving data from {}", handle.port()))?;
        println!();
        println!("{}", SnapshotReport { port: handle.port(), snapshot: &snapshot });
    }

    println!("\nData retrieval complete");
    Ok(())
}
