//! # Run Loop
//!
//! Drives sampling and writing at a fixed cadence until shutdown or a
//! fatal error.
//!
//! Suspension only happens while connecting, during the settle delay and
//! between ticks. Shutdown requests are honoured at those points; a tick
//! that has started always finishes its write.

use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info};

use super::clock::Clock;
use super::registry::SourceRegistry;
use super::sampler::sample;
use super::source::Connector;
use super::writer::RotatingWriter;
use crate::config::Config;
use crate::error::Result;

/// Lifecycle of a logging run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Starting,
    Running,
    /// Shut down on request
    Stopped,
    /// Ended by a fatal error
    Failed,
}

/// Sending half of the shutdown signal
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    /// Ask the run to stop at its next suspension point
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

/// Receiving half of the shutdown signal
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> (ShutdownTrigger, Shutdown) {
        let (tx, rx) = watch::channel(false);
        (ShutdownTrigger { tx }, Shutdown { rx })
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once shutdown has been triggered
    ///
    /// Never resolves if the trigger is dropped without firing.
    pub async fn wait(&mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Sleep for `duration` unless shutdown comes first
///
/// Returns false when interrupted by shutdown.
pub async fn pause(duration: Duration, shutdown: &mut Shutdown) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(duration) => true,
        _ = shutdown.wait() => false,
    }
}

/// Connect every port, then wait for the sources to fill in real readings
///
/// Returns `None` if shutdown was requested while starting up.
///
/// # Errors
///
/// Returns the first connection error; no partial registry is kept.
pub async fn bring_up<C>(
    ports: &[String],
    connector: &C,
    settle_delay: Duration,
    shutdown: &mut Shutdown,
) -> Result<Option<SourceRegistry>>
where
    C: Connector + ?Sized,
{
    let registry = tokio::select! {
        registry = SourceRegistry::connect_all(ports, connector) => registry?,
        _ = shutdown.wait() => return Ok(None),
    };

    info!(
        "Connected {} source(s); waiting {:?} for initial readings",
        registry.len(),
        settle_delay
    );
    if !pause(settle_delay, shutdown).await {
        return Ok(None);
    }

    Ok(Some(registry))
}

/// Ticks the sampler and writer on a fixed period
pub struct Logger<K: Clock> {
    registry: SourceRegistry,
    writer: RotatingWriter,
    clock: K,
    poll_interval: Duration,
    state: RunState,
    ticks: u64,
}

impl<K: Clock> Logger<K> {
    /// Set up a logger and open the log file for the current date
    ///
    /// # Errors
    ///
    /// Returns `BmsLoggerError::Write` if today's file cannot be opened
    pub fn new(
        registry: SourceRegistry,
        mut writer: RotatingWriter,
        clock: K,
        poll_interval: Duration,
    ) -> Result<Self> {
        writer.rotate_to(clock.now().date())?;

        Ok(Self {
            registry,
            writer,
            clock,
            poll_interval,
            state: RunState::Starting,
            ticks: 0,
        })
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Completed ticks so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn writer(&self) -> &RotatingWriter {
        &self.writer
    }

    /// Sample every source once and append the batch
    ///
    /// The date used for rotation comes from the same instant as the row
    /// timestamps.
    ///
    /// Returns the number of rows written.
    pub fn tick(&mut self) -> Result<usize> {
        let now = self.clock.now();
        let batch = sample(&self.registry, now)?;
        self.writer.append(&batch, now.date())?;
        self.ticks += 1;
        Ok(batch.len())
    }

    /// Tick until shutdown or the first error
    ///
    /// The log file is closed on every exit path.
    ///
    /// # Errors
    ///
    /// Returns the error that ended the run; the state is then `Failed`.
    pub async fn run(&mut self, shutdown: &mut Shutdown) -> Result<()> {
        self.transition(RunState::Running);

        let outcome = loop {
            if let Err(e) = self.tick() {
                break Err(e);
            }
            if !pause(self.poll_interval, shutdown).await {
                break Ok(());
            }
        };

        let closed = self.writer.close();

        match outcome.and(closed) {
            Ok(()) => {
                self.transition(RunState::Stopped);
                info!("Logged {} ticks", self.ticks);
                Ok(())
            }
            Err(e) => {
                self.transition(RunState::Failed);
                error!("{}: {}", e.kind(), e);
                Err(e)
            }
        }
    }

    fn transition(&mut self, next: RunState) {
        info!("Logger state {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

/// Full logging run: bring up sources, settle, then log until stopped
///
/// # Errors
///
/// Returns any connection, sample, write or rotation error
pub async fn run<C, K>(
    config: &Config,
    connector: &C,
    clock: K,
    mut shutdown: Shutdown,
) -> Result<RunState>
where
    C: Connector + ?Sized,
    K: Clock,
{
    let Some(registry) = bring_up(
        &config.serial.ports,
        connector,
        config.logging.settle_delay(),
        &mut shutdown,
    )
    .await?
    else {
        info!("Shutdown requested during startup");
        return Ok(RunState::Stopped);
    };

    let writer = RotatingWriter::new(&config.logging.log_dir, config.logging.file_prefix.as_str())?;
    let mut logger = Logger::new(registry, writer, clock, config.logging.poll_interval())?;

    info!(
        "Polling {} source(s) every {:?}",
        logger.registry.len(),
        logger.poll_interval
    );
    logger.run(&mut shutdown).await?;
    Ok(logger.state())
}
