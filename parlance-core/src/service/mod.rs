//! `SpeechService` — the single synthesis entry point.
//!
//! ## Pipeline
//!
//! ```text
//! speak(request)
//!     ├─► validate          empty text → InvalidInput, no port touched
//!     ├─► normalize         Normalizer port
//!     ├─► resolve speaker   VoiceRegistry (fallback to default persona)
//!     ├─► synthesize        Synthesizer port   → SynthesisFailed
//!     ├─► write (optional)  AudioSink port     → SinkWriteFailed
//!     ├─► audit             AuditSink port     → AuditFailed (per AuditPolicy)
//!     └─► SynthesisResult
//! ```
//!
//! The audit step only runs after synthesis and any sink write succeeded, so
//! a failed call never leaves an audit record behind.
//!
//! ## Threading
//!
//! `SpeechService` is `Send + Sync` and holds no per-request state. Wrap it in
//! an `Arc` to share it; concurrent `speak` calls are safe as long as the
//! injected ports are.

pub mod diagnostics;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

pub use diagnostics::{DiagnosticsSnapshot, ServiceDiagnostics};

use crate::{
    audit::{AuditEvent, Timing},
    error::{ParlanceError, Result},
    ports::{AudioSink, AuditSink, Normalizer, Synthesizer},
    request::{SynthesisRequest, SynthesisResult},
    voice::VoiceRegistry,
};

/// What `speak` does when the audit port fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditPolicy {
    /// Surface the failure as `ParlanceError::AuditFailed`. Synthesis and any
    /// sink write have already happened at that point.
    #[default]
    Propagate,
    /// Log at `warn` and return the result anyway.
    BestEffort,
}

impl FromStr for AuditPolicy {
    type Err = ParlanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "propagate" => Ok(Self::Propagate),
            "best_effort" => Ok(Self::BestEffort),
            other => Err(ParlanceError::Config(format!(
                "unknown audit policy '{other}' (expected propagate or best_effort)"
            ))),
        }
    }
}

/// Configuration for `SpeechService`.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// Default: `AuditPolicy::Propagate`.
    pub audit_policy: AuditPolicy,
}

/// The collaborators a `SpeechService` is built from.
#[derive(Clone)]
pub struct ServicePorts {
    pub normalizer: Arc<dyn Normalizer>,
    pub synthesizer: Arc<dyn Synthesizer>,
    pub sink: Arc<dyn AudioSink>,
    pub audit: Arc<dyn AuditSink>,
}

pub struct SpeechService {
    ports: ServicePorts,
    registry: Arc<VoiceRegistry>,
    config: ServiceConfig,
    diagnostics: Arc<ServiceDiagnostics>,
}

impl SpeechService {
    pub fn new(ports: ServicePorts, registry: Arc<VoiceRegistry>, config: ServiceConfig) -> Self {
        info!(
            default_persona = registry.default_persona(),
            personas = registry.list().len(),
            audit_policy = ?config.audit_policy,
            "speech service ready"
        );
        Self {
            ports,
            registry,
            config,
            diagnostics: Arc::new(ServiceDiagnostics::default()),
        }
    }

    pub fn registry(&self) -> &Arc<VoiceRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> DiagnosticsSnapshot {
        self.diagnostics.snapshot()
    }

    /// Voice handles the injected synthesizer can produce.
    pub fn backend_voices(&self) -> Vec<String> {
        self.ports.synthesizer.list_voices()
    }

    /// Run the full pipeline for one request.
    ///
    /// # Errors
    /// - `ParlanceError::InvalidInput` if the text is empty or whitespace.
    /// - `ParlanceError::UnknownPersona` if neither the persona nor the
    ///   default persona is registered.
    /// - `ParlanceError::SynthesisFailed` if the synthesizer fails.
    /// - `ParlanceError::SinkWriteFailed` if the sink fails.
    /// - `ParlanceError::AuditFailed` if the audit port fails under
    ///   `AuditPolicy::Propagate`.
    pub fn speak(&self, request: &SynthesisRequest) -> Result<SynthesisResult> {
        ServiceDiagnostics::bump(&self.diagnostics.requests);

        if request.text.trim().is_empty() {
            ServiceDiagnostics::bump(&self.diagnostics.rejected);
            return Err(ParlanceError::InvalidInput(
                "synthesis request text must not be empty".into(),
            ));
        }

        let started = Instant::now();

        let normalized = self.ports.normalizer.normalize(&request.text);
        info!(raw = %request.text, normalized = %normalized, "[speak] normalized");

        let speaker = self.registry.resolve(&request.persona, None)?;
        info!(
            persona = %request.persona,
            voice_handle = %speaker.voice_handle,
            "[speak] resolved speaker"
        );

        let normalized_request = request.with_text(normalized);
        let artifact = self
            .ports
            .synthesizer
            .synthesize(&normalized_request)
            .map_err(|source| {
                error!(persona = %request.persona, error = %source, "[speak] synthesis failed");
                ServiceDiagnostics::bump(&self.diagnostics.synthesis_failures);
                ParlanceError::SynthesisFailed {
                    persona: request.persona.clone(),
                    source,
                }
            })?;
        let duration_secs = artifact.duration_secs();
        info!(
            duration_secs,
            sample_rate = artifact.sample_rate,
            voice_handle = %artifact.voice_handle,
            "[speak] synthesised"
        );

        let resolved_destination = match request.destination.as_deref() {
            Some(destination) => {
                let resolved = self.ports.sink.write(&artifact, destination).map_err(|e| {
                    error!(destination, error = %e, "[speak] sink write failed");
                    ServiceDiagnostics::bump(&self.diagnostics.sink_failures);
                    ParlanceError::SinkWriteFailed(e)
                })?;
                info!(destination = %resolved, "[speak] written");
                Some(resolved)
            }
            None => None,
        };

        let elapsed_secs = started.elapsed().as_secs_f64();
        let timing = Timing::measure(duration_secs, elapsed_secs);

        let event = AuditEvent::new(
            &request.persona,
            &speaker.voice_handle,
            &request.text,
            &normalized_request.text,
            timing,
            resolved_destination.clone(),
            request.metadata.clone(),
        );
        self.record_audit(&event)?;

        ServiceDiagnostics::bump(&self.diagnostics.completed);
        info!(
            elapsed_ms = (elapsed_secs * 1000.0).round() as u64,
            rtf = timing.rtf,
            "[speak] complete"
        );

        let artifact = match resolved_destination {
            Some(_) => None,
            None => Some(artifact),
        };
        Ok(SynthesisResult {
            request: request.clone(),
            normalized_text: normalized_request.text,
            artifact,
            resolved_destination,
            success: true,
            error: None,
            duration_secs,
            elapsed_secs,
            rtf: timing.rtf,
        })
    }

    fn record_audit(&self, event: &AuditEvent) -> Result<()> {
        let Err(e) = self.ports.audit.record(event) else {
            return Ok(());
        };
        ServiceDiagnostics::bump(&self.diagnostics.audit_failures);
        match self.config.audit_policy {
            AuditPolicy::Propagate => {
                error!(persona = %event.persona, error = %e, "[speak] audit record failed");
                Err(ParlanceError::AuditFailed(e))
            }
            AuditPolicy::BestEffort => {
                warn!(
                    persona = %event.persona,
                    error = %e,
                    "[speak] audit record failed, continuing"
                );
                Ok(())
            }
        }
    }
}
