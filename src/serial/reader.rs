//! Background frame reader feeding a source's shared readings.

use bytes::BytesMut;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::Instant;
use tracing::{debug, error, warn};

use crate::bms::decoder::{decode_frame, next_frame};
use crate::bms::protocol::{TelemetrySnapshot, FRAME_LEN};

/// Latest decoded readings of one port plus link health
#[derive(Debug, Clone)]
pub struct Readings {
    pub snapshot: TelemetrySnapshot,
    /// When the most recent valid frame arrived
    pub last_frame: Option<Instant>,
    /// False once the reader has stopped
    pub link_up: bool,
}

impl Default for Readings {
    fn default() -> Self {
        Self {
            snapshot: TelemetrySnapshot::default(),
            last_frame: None,
            link_up: true,
        }
    }
}

impl Readings {
    /// Snapshot as seen at `now`, flagging a serial error if the link is
    /// down or no frame arrived within `stale_after`
    pub fn snapshot_at(&self, now: Instant, stale_after: Duration) -> TelemetrySnapshot {
        let fresh = self.link_up
            && self
                .last_frame
                .is_some_and(|at| now.saturating_duration_since(at) <= stale_after);

        TelemetrySnapshot {
            serial_communication_error: !fresh,
            ..self.snapshot
        }
    }
}

pub type SharedReadings = Arc<RwLock<Readings>>;

/// Read frames from `reader` until EOF or an I/O error
///
/// Every valid frame replaces the shared snapshot. Frames that fail to
/// decode are skipped. On exit the link is marked down.
pub async fn read_frames<R>(mut reader: R, readings: SharedReadings, port: String)
where
    R: AsyncRead + Unpin,
{
    let mut buf = BytesMut::with_capacity(FRAME_LEN * 4);

    loop {
        match reader.read_buf(&mut buf).await {
            Ok(0) => {
                warn!("Serial port {} closed", port);
                break;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Failed to read from {}: {}", port, e);
                break;
            }
        }

        while let Some(frame) = next_frame(&mut buf) {
            let snapshot = match decode_frame(&frame) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    debug!("Dropping frame from {}: {}", port, e);
                    continue;
                }
            };

            match readings.write() {
                Ok(mut guard) => {
                    guard.snapshot = snapshot;
                    guard.last_frame = Some(Instant::now());
                }
                Err(_) => {
                    error!("Readings for {} are poisoned; stopping reader", port);
                    return;
                }
            }
            debug!("Frame from {}: {:.3} V, SOC {}%", port, snapshot.pack_voltage, snapshot.soc);
        }
    }

    if let Ok(mut guard) = readings.write() {
        guard.link_up = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bms::fixtures::FrameBuilder;
    use std::io;
    use tokio_test::io::Builder;

    fn shared() -> SharedReadings {
        Arc::new(RwLock::new(Readings::default()))
    }

    #[tokio::test]
    async fn test_frames_split_across_reads() {
        let first = FrameBuilder::typical().soc(50).build();
        let second = FrameBuilder::typical().soc(51).build();
        let mock = Builder::new()
            .read(&[0x13, 0x37])
            .read(&first[..30])
            .read(&first[30..])
            .read(&second[..5])
            .read(&second[5..])
            .build();

        let readings = shared();
        read_frames(mock, readings.clone(), "/dev/ttyUSB0".to_string()).await;

        let state = readings.read().unwrap();
        assert_eq!(state.snapshot.soc, 51);
        assert_eq!(state.snapshot.cell_count, 16);
        assert!(state.last_frame.is_some());
        assert!(!state.link_up);
    }

    #[tokio::test]
    async fn test_read_error_marks_link_down() {
        let frame = FrameBuilder::typical().build();
        let mock = Builder::new()
            .read(&frame)
            .read_error(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged"))
            .build();

        let readings = shared();
        read_frames(mock, readings.clone(), "/dev/ttyUSB0".to_string()).await;

        let state = readings.read().unwrap();
        assert_eq!(state.snapshot.soc, 87);
        assert!(!state.link_up);
    }

    #[tokio::test]
    async fn test_noise_only_leaves_defaults() {
        let mock = Builder::new().read(&[0x55; 40]).build();

        let readings = shared();
        read_frames(mock, readings.clone(), "/dev/ttyUSB0".to_string()).await;

        let state = readings.read().unwrap();
        assert!(state.last_frame.is_none());
        assert_eq!(state.snapshot, TelemetrySnapshot::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_freshness() {
        let stale_after = Duration::from_secs(5);
        let start = Instant::now();
        let mut readings = Readings::default();

        // Nothing received yet
        assert!(readings.snapshot_at(start, stale_after).serial_communication_error);

        readings.last_frame = Some(start);
        assert!(!readings.snapshot_at(start + Duration::from_secs(5), stale_after).serial_communication_error);
        assert!(readings.snapshot_at(start + Duration::from_secs(6), stale_after).serial_communication_error);

        readings.link_up = false;
        assert!(readings.snapshot_at(start, stale_after).serial_communication_error);
    }

    #[tokio::test]
    async fn test_snapshot_keeps_cell_communication_flag() {
        let mut readings = Readings::default();
        readings.snapshot.cell_communication_error = true;
        let snapshot = readings.snapshot_at(Instant::now(), Duration::from_secs(5));
        assert!(snapshot.cell_communication_error);
    }
}
