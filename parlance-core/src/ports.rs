//! Port contracts at the service boundary.
//!
//! `SpeechService` only ever talks to these traits; concrete backends (neural
//! synthesizers, WAV writers, SIEM shippers, …) are injected at construction
//! as `Arc<dyn …>` and can be swapped without touching the service.
//!
//! Every port takes `&self` and must be `Send + Sync`. An adapter whose
//! backend is not reentrant (a single inference session, an append-only file)
//! serialises internally, e.g. behind a `parking_lot::Mutex`.

use crate::audio::AudioArtifact;
use crate::audit::AuditEvent;
use crate::error::{AuditError, SinkError, SynthesisError};
use crate::request::SynthesisRequest;

/// Turns raw input text into TTS-ready spoken form.
///
/// Must behave as a pure function from the caller's perspective.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, text: &str) -> String;
}

/// Contract for speech synthesis backends.
pub trait Synthesizer: Send + Sync {
    /// Synthesise the (already normalized) text in `request`.
    ///
    /// # Errors
    /// Any backend failure; the service wraps it with persona context.
    fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioArtifact, SynthesisError>;

    /// Backend-specific voice handles this synthesizer can produce.
    fn list_voices(&self) -> Vec<String>;
}

/// Persists or streams a synthesised artifact.
pub trait AudioSink: Send + Sync {
    /// Write `artifact` to `destination` and return the resolved destination
    /// (absolute path, stream ID, …).
    fn write(&self, artifact: &AudioArtifact, destination: &str) -> Result<String, SinkError>;
}

/// Records compliance events.
///
/// Implementations must accept events with no `timestamp` or destination.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError>;
}
