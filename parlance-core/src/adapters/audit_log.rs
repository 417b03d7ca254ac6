//! Audit sinks: newline-delimited JSON file, and a discarding no-op.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::audit::AuditEvent;
use crate::error::AuditError;
use crate::ports::AuditSink;

/// Appends one JSON object per event, easy to tail, grep, or ship to a SIEM.
///
/// Appends are serialised through an internal mutex so concurrent `speak`
/// calls never interleave lines.
#[derive(Debug)]
pub struct JsonlAuditLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlAuditLog {
    /// Opens (lazily creates) the log at `path`; parent directories are
    /// created immediately.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, AuditError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        info!(path = %path.display(), "JSONL audit log ready");
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every event recorded so far, oldest first. A missing file reads as empty.
    pub fn read_all(&self) -> Result<Vec<AuditEvent>, AuditError> {
        let _guard = self.write_lock.lock();
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut events = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            events.push(serde_json::from_str(&line)?);
        }
        Ok(events)
    }
}

/// Current wall-clock time as unix seconds.
fn unix_now() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}

impl AuditSink for JsonlAuditLog {
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError> {
        let record = event.stamped(unix_now());
        let line = serde_json::to_string(&record)?;

        let _guard = self.write_lock.lock();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        info!(
            persona = %record.persona,
            voice_handle = %record.speaker_voice_handle,
            "[audit] recorded"
        );
        Ok(())
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuditLog;

impl AuditSink for NoopAuditLog {
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError> {
        debug!(persona = %event.persona, "[audit] discarded");
        Ok(())
    }
}
