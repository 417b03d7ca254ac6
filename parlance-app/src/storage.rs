//! SQLite-backed compliance audit store.

use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};
use parlance_core::{AuditError, AuditEvent, AuditSink, Metadata};
use rusqlite::{params, Connection};
use tracing::{debug, info};

/// One row per successful `speak`. A connection is opened per call, so the
/// store can be shared across threads without its own lock.
#[derive(Debug, Clone)]
pub struct AuditStore {
    db_path: PathBuf,
}

fn store_err(e: rusqlite::Error) -> AuditError {
    AuditError::Store(e.to_string())
}

impl AuditStore {
    pub fn new(db_path: PathBuf) -> Result<Self, AuditError> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let store = Self { db_path };
        store.init_schema()?;
        info!(path = %store.db_path.display(), "SQLite audit store ready");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn open(&self) -> Result<Connection, AuditError> {
        let conn = Connection::open(&self.db_path).map_err(store_err)?;
        conn.busy_timeout(std::time::Duration::from_secs(5))
            .map_err(store_err)?;
        Ok(conn)
    }

    fn init_schema(&self) -> Result<(), AuditError> {
        let conn = self.open()?;
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            CREATE TABLE IF NOT EXISTS audit_events (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              recorded_at REAL NOT NULL,
              persona TEXT NOT NULL,
              speaker_voice_handle TEXT NOT NULL,
              raw_text TEXT NOT NULL,
              normalized_text_length INTEGER NOT NULL,
              duration_seconds REAL NOT NULL,
              elapsed_seconds REAL NOT NULL,
              rtf REAL NOT NULL,
              resolved_destination TEXT,
              metadata_json TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_audit_recorded_at ON audit_events(recorded_at DESC);
            "#,
        )
        .map_err(store_err)?;
        Ok(())
    }

    /// Most recent events first.
    pub fn recent(&self, limit: usize) -> Result<Vec<AuditEvent>, AuditError> {
        let limit = limit.clamp(1, 1000);
        let conn = self.open()?;
        let mut stmt = conn
            .prepare(
                "SELECT recorded_at, persona, speaker_voice_handle, raw_text, normalized_text_length,
                        duration_seconds, elapsed_seconds, rtf, resolved_destination, metadata_json
                 FROM audit_events ORDER BY recorded_at DESC, id DESC LIMIT ?1",
            )
            .map_err(store_err)?;
        let mut rows = stmt.query(params![limit as i64]).map_err(store_err)?;

        let mut events = Vec::new();
        while let Some(row) = rows.next().map_err(store_err)? {
            let metadata_json: String = row.get(9).map_err(store_err)?;
            let metadata: Metadata = serde_json::from_str(&metadata_json)?;
            events.push(AuditEvent {
                timestamp: Some(row.get(0).map_err(store_err)?),
                persona: row.get(1).map_err(store_err)?,
                speaker_voice_handle: row.get(2).map_err(store_err)?,
                raw_text: row.get(3).map_err(store_err)?,
                normalized_text_length: row.get::<_, i64>(4).map_err(store_err)? as usize,
                duration_seconds: row.get(5).map_err(store_err)?,
                elapsed_seconds: row.get(6).map_err(store_err)?,
                rtf: row.get(7).map_err(store_err)?,
                resolved_destination: row.get(8).map_err(store_err)?,
                metadata,
            });
        }
        Ok(events)
    }

    /// Delete events older than `retention_days`; returns the number removed.
    pub fn prune(&self, retention_days: usize) -> Result<usize, AuditError> {
        if retention_days == 0 {
            return Ok(0);
        }
        let cutoff = Utc::now() - Duration::days(retention_days as i64);
        let conn = self.open()?;
        let removed = conn
            .execute(
                "DELETE FROM audit_events WHERE recorded_at < ?1",
                params![cutoff.timestamp() as f64],
            )
            .map_err(store_err)?;
        if removed > 0 {
            info!(removed, retention_days, "pruned audit events");
        }
        Ok(removed)
    }

    pub fn count(&self) -> Result<usize, AuditError> {
        let conn = self.open()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM audit_events", [], |row| row.get(0))
            .map_err(store_err)?;
        Ok(count as usize)
    }
}

impl AuditSink for AuditStore {
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError> {
        let now = Utc::now().timestamp_millis() as f64 / 1000.0;
        let event = event.stamped(now);
        let metadata_json = serde_json::to_string(&event.metadata)?;
        let conn = self.open()?;
        conn.execute(
            r#"
            INSERT INTO audit_events
            (recorded_at, persona, speaker_voice_handle, raw_text, normalized_text_length,
             duration_seconds, elapsed_seconds, rtf, resolved_destination, metadata_json)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                event.timestamp.unwrap_or(now),
                event.persona,
                event.speaker_voice_handle,
                event.raw_text,
                event.normalized_text_length as i64,
                event.duration_seconds,
                event.elapsed_seconds,
                event.rtf,
                event.resolved_destination,
                metadata_json
            ],
        )
        .map_err(store_err)?;
        debug!(persona = %event.persona, "[audit] stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlance_core::Timing;

    fn event(persona: &str, timestamp: Option<f64>) -> AuditEvent {
        let mut metadata = Metadata::new();
        metadata.insert("callId".into(), "c-9".into());
        let event = AuditEvent::new(
            persona,
            "p225",
            "Your OTP is 1234",
            "Your One Time Password is one two three four",
            Timing::measure(2.0, 0.5),
            None,
            metadata,
        );
        match timestamp {
            Some(ts) => event.stamped(ts),
            None => event,
        }
    }

    fn store() -> (tempfile::TempDir, AuditStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = AuditStore::new(dir.path().join("data/parlance.db")).expect("open store");
        (dir, store)
    }

    #[test]
    fn records_and_reads_back_newest_first() {
        let (_dir, store) = store();
        store.record(&event("professional_male", Some(100.0))).expect("record");
        store.record(&event("friendly_female", Some(200.0))).expect("record");

        let recent = store.recent(10).expect("recent");
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].persona, "friendly_female");
        assert_eq!(recent[0].timestamp, Some(200.0));
        assert_eq!(recent[1].metadata["callId"], "c-9");
        assert_eq!(recent[1].rtf, 0.25);

        assert_eq!(store.recent(1).expect("recent").len(), 1);
    }

    #[test]
    fn unstamped_events_get_the_current_time() {
        let (_dir, store) = store();
        store.record(&event("neutral_male", None)).expect("record");
        let recent = store.recent(1).expect("recent");
        let ts = recent[0].timestamp.unwrap_or_default();
        assert!(ts > 1_600_000_000.0, "timestamp {ts}");
    }

    #[test]
    fn prune_removes_only_old_events() {
        let (_dir, store) = store();
        store.record(&event("old", Some(1_000.0))).expect("record");
        store.record(&event("new", None)).expect("record");

        assert_eq!(store.prune(30).expect("prune"), 1);
        assert_eq!(store.count().expect("count"), 1);
        assert_eq!(store.recent(5).expect("recent")[0].persona, "new");
        assert_eq!(store.prune(0).expect("prune"), 0);
    }

    #[test]
    fn schema_survives_reopen() {
        let (dir, store) = store();
        store.record(&event("neutral_male", Some(5.0))).expect("record");
        let reopened = AuditStore::new(dir.path().join("data/parlance.db")).expect("reopen");
        assert_eq!(reopened.count().expect("count"), 1);
    }
}
