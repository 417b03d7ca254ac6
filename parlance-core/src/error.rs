use thiserror::Error;

/// All errors produced by parlance-core.
///
/// Each failure class of `SpeechService::speak` has its own variant so callers
/// can branch on it; none of them are retried internally.
#[derive(Debug, Error)]
pub enum ParlanceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(
        "persona '{persona}' not found and fallback '{fallback}' is also unregistered \
         (available: {})",
        available.join(", ")
    )]
    UnknownPersona {
        persona: String,
        fallback: String,
        available: Vec<String>,
    },

    #[error("synthesis failed for persona '{persona}': {source}")]
    SynthesisFailed {
        persona: String,
        #[source]
        source: SynthesisError,
    },

    #[error("audio sink write failed: {0}")]
    SinkWriteFailed(#[from] SinkError),

    #[error("audit record failed: {0}")]
    AuditFailed(#[from] AuditError),

    #[error("phrase category '{category}' not found (available: {})", available.join(", "))]
    UnknownPhraseCategory {
        category: String,
        available: Vec<String>,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failure reported by a `Synthesizer` backend.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("voice '{0}' is not available on this backend")]
    UnsupportedVoice(String),

    #[error("backend IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure reported by an `AudioSink`.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("cannot write empty audio to '{0}'")]
    EmptyAudio(String),

    #[error("audio encoding error: {0}")]
    Encode(String),

    #[error("sink IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure reported by an `AuditSink`.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("audit serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("audit store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, ParlanceError>;
