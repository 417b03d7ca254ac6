use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;

/// Per-service counters, updated with relaxed atomics from any thread.
#[derive(Debug, Default)]
pub struct ServiceDiagnostics {
    pub requests: AtomicUsize,
    pub rejected: AtomicUsize,
    pub synthesis_failures: AtomicUsize,
    pub sink_failures: AtomicUsize,
    pub audit_failures: AtomicUsize,
    pub completed: AtomicUsize,
}

impl ServiceDiagnostics {
    pub(crate) fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        for counter in [
            &self.requests,
            &self.rejected,
            &self.synthesis_failures,
            &self.sink_failures,
            &self.audit_failures,
            &self.completed,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            synthesis_failures: self.synthesis_failures.load(Ordering::Relaxed),
            sink_failures: self.sink_failures.load(Ordering::Relaxed),
            audit_failures: self.audit_failures.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsSnapshot {
    pub requests: usize,
    /// Requests refused before any port was called (empty text).
    pub rejected: usize,
    pub synthesis_failures: usize,
    pub sink_failures: usize,
    /// Audit failures, whether propagated or swallowed by `AuditPolicy::BestEffort`.
    pub audit_failures: usize,
    pub completed: usize,
}
