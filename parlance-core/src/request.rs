//! Request and result values for a single synthesis job.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::audio::AudioArtifact;

/// Compliance metadata attached to a request (call IDs, channel, campaign…).
///
/// Values are expected to be scalars; ordering of keys carries no meaning.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Immutable description of one synthesis job.
///
/// `text` may be raw when handed to `SpeechService::speak`; the request that
/// reaches the `Synthesizer` always carries normalized text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisRequest {
    pub text: String,
    /// Persona key, resolved through the `VoiceRegistry`.
    pub persona: String,
    /// When set, the artifact is written to this destination by the `AudioSink`.
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>, persona: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            persona: persona.into(),
            destination: None,
            metadata: Metadata::new(),
        }
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Copy of this request carrying different text, everything else unchanged.
    pub(crate) fn with_text(&self, text: String) -> Self {
        Self {
            text,
            persona: self.persona.clone(),
            destination: self.destination.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// Outcome of `SpeechService::speak`.
///
/// On success exactly one of `artifact` / `resolved_destination` is set:
/// the destination when the request asked for one, the in-memory artifact
/// otherwise.
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    /// The request as the caller submitted it (raw text).
    pub request: SynthesisRequest,
    /// The text handed to the synthesizer.
    pub normalized_text: String,
    pub artifact: Option<AudioArtifact>,
    pub resolved_destination: Option<String>,
    pub success: bool,
    pub error: Option<String>,
    /// Audio duration in seconds, kept even when the artifact went to a sink.
    pub duration_secs: f64,
    /// Wall-clock seconds from normalization start to audit.
    pub elapsed_secs: f64,
    /// `elapsed_secs / duration_secs`, or `0.0` for silent output.
    pub rtf: f64,
}
