//! # BMS Logger
//!
//! Poll one or more SmartBMS units over serial and log their readings to
//! daily CSV files.
//!
//! # Control Flow
//!
//! 1. **Initialization**
//!    - Parse arguments and load configuration
//!    - Set up logging with tracing subscriber
//!    - Connect every requested port; any failure aborts the run
//!    - Wait the settle delay so readings are populated
//!
//! 2. **Main Loop**
//!    - Sample every BMS once per poll interval (default 60s)
//!    - Append the rows to `bms-logs/bms-YYYYMMDD.csv`, rotating at midnight
//!    - Handle Ctrl+C for graceful shutdown
//!
//! 3. **Shutdown**
//!    - Flush and close the open log file
//!    - Exit 0 on Ctrl+C, non-zero on any error
//!
//! Expected output:
//! ```text
//! SmartBMS CSV Logger
//!
//! INFO bms_logger: BMS Logger v0.1.0 starting...
//! INFO bms_logger::serial: Opened SmartBMS port /dev/ttyUSB0 at 9600 baud
//! INFO bms_logger::telemetry::writer: Logging to bms-logs/bms-20240115.csv
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use bms_logger::cli::LoggerCli;
use bms_logger::diagnostics;
use bms_logger::serial::SerialConnector;
use bms_logger::telemetry::{run, Shutdown, SystemClock};

#[tokio::main]
async fn main() -> Result<()> {
    println!("SmartBMS CSV Logger\n");

    let cli = LoggerCli::parse();
    let config = cli.config().context("Failed to load configuration")?;
    let _guard = diagnostics::init(&config.diagnostics, "bms-logger.log");

    info!("BMS Logger v{} starting...", env!("CARGO_PKG_VERSION"));
    info!("Ports: {}", config.serial.ports.join(", "));

    let (trigger, shutdown) = Shutdown::new();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C, shutting down...");
                trigger.trigger();
            }
            Err(e) => warn!("Cannot listen for Ctrl+C: {}", e),
        }
    });

    let connector = SerialConnector::from_config(&config.serial);
    match run::run(&config, &connector, SystemClock, shutdown).await {
        Ok(state) => {
            info!("Logger finished in state {:?}", state);
            Ok(())
        }
        Err(e) => {
            let kind = e.kind();
            Err(anyhow::Error::new(e).context(format!("Logging stopped by {}", kind)))
        }
    }
}
