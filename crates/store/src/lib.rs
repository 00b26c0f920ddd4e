//! On-device reading log.
//!
//! One reading per line, formatted with one decimal (`"21.5\n"`).  The file
//! is opened, written and closed on every append so a power cut loses at
//! most the reading in flight.

use portal_core::{PortalError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Append-only log of readings with truncate-on-full rotation.
#[derive(Debug)]
pub struct LocalLog {
    path:        PathBuf,
    /// `None` means unbounded.
    max_entries: Option<usize>,
    /// Lines in the file, counted lazily on first use.
    lines:       Option<usize>,
}

impl LocalLog {
    /// `max_entries == 0` disables rotation.
    pub fn new(path: impl Into<PathBuf>, max_entries: usize) -> Self {
        Self {
            path:        path.into(),
            max_entries: (max_entries > 0).then_some(max_entries),
            lines:       None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one reading.  When the log already holds `max_entries` lines
    /// it is truncated first, so the new reading starts a fresh log.
    pub fn append_line(&mut self, value: f32) -> Result<()> {
        let count = self.line_count()?;
        if self.max_entries.is_some_and(|max| count >= max) {
            info!(
                "Reading log '{}' reached {count} entries; starting over",
                self.path.display()
            );
            self.clear()?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error("open", e))?;
        writeln!(file, "{value:.1}").map_err(|e| self.io_error("write", e))?;
        file.flush().map_err(|e| self.io_error("flush", e))?;

        self.lines = Some(self.lines.unwrap_or(0) + 1);
        debug!("Logged {value:.1} to {}", self.path.display());
        Ok(())
    }

    /// The last `n` readings in file order.  Lines that do not parse are
    /// skipped; a missing file reads as empty.
    pub fn read_last_n(&self, n: usize) -> Result<Vec<f32>> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error("open", e)),
        };

        let mut values = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| self.io_error("read", e))?;
            match line.trim().parse::<f32>() {
                Ok(v) if v.is_finite() => values.push(v),
                _ if line.trim().is_empty() => {}
                _ => warn!("Skipping malformed log line: {line:?}"),
            }
        }

        let skip = values.len().saturating_sub(n);
        Ok(values.split_off(skip))
    }

    /// Number of lines currently in the log.
    pub fn line_count(&mut self) -> Result<usize> {
        if let Some(n) = self.lines {
            return Ok(n);
        }
        let n = match File::open(&self.path) {
            Ok(f) => BufReader::new(f).lines().count(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
            Err(e) => return Err(self.io_error("open", e)),
        };
        self.lines = Some(n);
        Ok(n)
    }

    /// Empty the log, creating it if needed.
    pub fn clear(&mut self) -> Result<()> {
        fs::write(&self.path, b"").map_err(|e| self.io_error("truncate", e))?;
        self.lines = Some(0);
        Ok(())
    }

    fn io_error(&self, op: &str, e: std::io::Error) -> PortalError {
        PortalError::Io {
            source: std::io::Error::new(
                e.kind(),
                format!("{op} '{}': {e}", self.path.display()),
            ),
        }
    }
}
