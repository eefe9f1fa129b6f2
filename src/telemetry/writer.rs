//! # Rotating CSV Writer
//!
//! Appends record batches to one CSV file per local calendar date.
//!
//! Files are always opened in append mode and the header is written only
//! when the opened file is empty, so restarting on the same day continues
//! the existing file instead of truncating it.

use chrono::NaiveDate;
use csv::{Terminator, WriterBuilder};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::record::{LogRecord, COLUMNS};
use crate::error::{BmsLoggerError, Result};

/// File name date token; lexical order matches chronological order
const DATE_FORMAT: &str = "%Y%m%d";

/// The file currently receiving rows
struct OpenLog {
    date: NaiveDate,
    path: PathBuf,
    writer: csv::Writer<File>,
}

/// Owner of the open log file and the only code that touches it
pub struct RotatingWriter {
    dir: PathBuf,
    prefix: String,
    current: Option<OpenLog>,
}

impl std::fmt::Debug for RotatingWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingWriter")
            .field("dir", &self.dir)
            .field("prefix", &self.prefix)
            .field("current_path", &self.current_path())
            .finish()
    }
}

impl RotatingWriter {
    /// Create a writer for `dir`, creating the directory if needed
    ///
    /// No file is opened until the first `rotate_to` or `append`.
    ///
    /// # Errors
    ///
    /// Returns `BmsLoggerError::Write` if the directory cannot be created
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| BmsLoggerError::Write {
            path: dir.clone(),
            source,
        })?;

        Ok(Self {
            dir,
            prefix: prefix.into(),
            current: None,
        })
    }

    /// Path of the log file for `date`, e.g. `bms-logs/bms-20240115.csv`
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{}-{}.csv", self.prefix, date.format(DATE_FORMAT)))
    }

    /// Date of the open file, if any
    pub fn current_date(&self) -> Option<NaiveDate> {
        self.current.as_ref().map(|log| log.date)
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current.as_ref().map(|log| log.path.as_path())
    }

    /// Make sure the open file is the one for `date`
    ///
    /// Does nothing when it already is. Otherwise the open file is flushed
    /// and closed, and the file for `date` is opened for appending, with a
    /// header if it is empty.
    ///
    /// # Errors
    ///
    /// - `BmsLoggerError::Write` if closing the old file or opening the
    ///   first file fails
    /// - `BmsLoggerError::Rotation` if the file for a new date cannot be
    ///   opened after a date change
    pub fn rotate_to(&mut self, date: NaiveDate) -> Result<()> {
        if self.current_date() == Some(date) {
            return Ok(());
        }

        let rotating = self.current.is_some();
        self.close()?;

        let path = self.path_for(date);
        let writer = open_log(&path).map_err(|source| {
            if rotating {
                BmsLoggerError::Rotation {
                    path: path.clone(),
                    source,
                }
            } else {
                BmsLoggerError::Write {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        if rotating {
            info!("Rotated log to {}", path.display());
        } else {
            info!("Logging to {}", path.display());
        }

        self.current = Some(OpenLog { date, path, writer });
        Ok(())
    }

    /// Append a batch as of `as_of` and flush it
    ///
    /// Rotates first if `as_of` differs from the open file's date. Rows are
    /// written in the order given. Once this returns, the batch has been
    /// handed to the operating system.
    ///
    /// # Errors
    ///
    /// Returns rotation errors from `rotate_to`, or `BmsLoggerError::Write`
    /// if writing or flushing fails
    pub fn append(&mut self, records: &[LogRecord], as_of: NaiveDate) -> Result<()> {
        self.rotate_to(as_of)?;

        let Some(log) = self.current.as_mut() else {
            // rotate_to always leaves a file open on success
            return Err(BmsLoggerError::Write {
                path: self.path_for(as_of),
                source: io::Error::new(io::ErrorKind::NotFound, "no open log file"),
            });
        };

        let result = records
            .iter()
            .try_for_each(|record| log.writer.write_record(record.fields()).map_err(io::Error::from))
            .and_then(|()| log.writer.flush());

        result.map_err(|source| BmsLoggerError::Write {
            path: log.path.clone(),
            source,
        })?;

        debug!("Wrote {} rows to {}", records.len(), log.path.display());
        Ok(())
    }

    /// Flush and close the open file, if any
    ///
    /// The writer can still be used afterwards; the next `append` reopens
    /// the file for its date.
    ///
    /// # Errors
    ///
    /// Returns `BmsLoggerError::Write` if the final flush fails. The file is
    /// closed either way.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut log) = self.current.take() {
            log.writer.flush().map_err(|source| BmsLoggerError::Write {
                path: log.path.clone(),
                source,
            })?;
            debug!("Closed {}", log.path.display());
        }
        Ok(())
    }
}

/// Open `path` for appending, writing the header if the file is empty
///
/// The header decision looks at the file on disk, so it survives restarts.
fn open_log(path: &Path) -> io::Result<csv::Writer<File>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let needs_header = file.metadata()?.len() == 0;

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::CRLF)
        .from_writer(file);

    if needs_header {
        writer.write_record(COLUMNS).map_err(io::Error::from)?;
        writer.flush()?;
    }

    Ok(writer)
}
