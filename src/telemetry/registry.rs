//! # Source Registry
//!
//! Brings up every requested connection before logging starts, in the
//! order the connection identifiers were given.

use std::collections::HashSet;
use tracing::{info, warn};

use super::source::{Connector, TelemetrySource};
use crate::error::{BmsLoggerError, Result};

/// A connection identifier paired with its live source
pub struct ConnectionHandle {
    port: String,
    source: Box<dyn TelemetrySource>,
}

impl std::fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

impl ConnectionHandle {
    pub fn new(port: impl Into<String>, source: Box<dyn TelemetrySource>) -> Self {
        Self {
            port: port.into(),
            source,
        }
    }

    /// Connection identifier this handle was created for
    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn source(&self) -> &dyn TelemetrySource {
        self.source.as_ref()
    }
}

/// Ordered set of connected sources for one run
#[derive(Debug)]
pub struct SourceRegistry {
    handles: Vec<ConnectionHandle>,
}

impl SourceRegistry {
    /// Connect to every port in order
    ///
    /// Duplicated identifiers are connected once per occurrence and produce
    /// one row each per tick.
    ///
    /// # Errors
    ///
    /// Returns `BmsLoggerError::NoSources` for an empty port list, or the
    /// first connection error. A run never starts with a partial set of
    /// sources.
    pub async fn connect_all<C>(ports: &[String], connector: &C) -> Result<Self>
    where
        C: Connector + ?Sized,
    {
        if ports.is_empty() {
            return Err(BmsLoggerError::NoSources);
        }

        let mut seen = HashSet::new();
        let mut handles = Vec::with_capacity(ports.len());

        for port in ports {
            if !seen.insert(port.as_str()) {
                warn!("Port {} requested more than once", port);
            }

            let source = connector.connect(port).await?;
            info!("Connected to BMS at {}", port);
            handles.push(ConnectionHandle::new(port.clone(), source));
        }

        Ok(Self { handles })
    }

    /// Build a registry from already connected handles
    pub fn from_handles(handles: Vec<ConnectionHandle>) -> Self {
        Self { handles }
    }

    /// Handles in registration order
    pub fn handles(&self) -> &[ConnectionHandle] {
        &self.handles
    }

    pub fn ports(&self) -> Vec<&str> {
        self.handles.iter().map(ConnectionHandle::port).collect()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
