//! # Sampler
//!
//! Reads every registered source once per tick.

use chrono::NaiveDateTime;
use tracing::debug;

use super::record::LogRecord;
use super::registry::SourceRegistry;
use crate::error::Result;

/// Take one batch of records, one per source, in registration order
///
/// All records share the instant `at`. Reads only touch in-memory state.
///
/// # Errors
///
/// Returns the first snapshot error. The batch is all-or-nothing: when any
/// source fails, none of the records taken so far are returned.
pub fn sample(registry: &SourceRegistry, at: NaiveDateTime) -> Result<Vec<LogRecord>> {
    let batch = registry
        .handles()
        .iter()
        .map(|handle| {
            let snapshot = handle.source().snapshot()?;
            Ok(LogRecord::new(at, handle.port(), snapshot))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("Sampled {} sources at {}", batch.len(), at);
    Ok(batch)
}
