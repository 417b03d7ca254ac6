//! # parlance-core
//!
//! Compliance-grade text-to-speech core for banking and financial services.
//!
//! ## Architecture
//!
//! ```text
//! SynthesisRequest ─► SpeechService::speak
//!                          │
//!                    Normalizer (abbreviations → currency → codes → numbers)
//!                          │
//!                    VoiceRegistry::resolve (persona → voice handle)
//!                          │
//!                    Synthesizer ─► AudioArtifact ─► AudioSink (optional)
//!                          │
//!                    AuditSink (exactly once per successful call)
//!                          │
//!                    SynthesisResult
//! ```
//!
//! Backends sit behind the traits in [`ports`] and are injected as
//! `Arc<dyn …>`. Reference adapters live in [`adapters`].

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod adapters;
pub mod audio;
pub mod audit;
pub mod dataset;
pub mod error;
pub mod normalize;
pub mod ports;
pub mod request;
pub mod service;
pub mod voice;

// Convenience re-exports for downstream crates
pub use audio::AudioArtifact;
pub use audit::{AuditEvent, Timing};
pub use dataset::{synthetic_manifest, SyntheticEntry};
pub use error::{AuditError, ParlanceError, Result, SinkError, SynthesisError};
pub use normalize::{
    format_money, format_otp, normalize_phone_number, AbbreviationExpander,
    NormalizationPipeline, NumberConfig, NumberExpander, PhoneRegion, PhraseCatalog,
};
pub use ports::{AudioSink, AuditSink, Normalizer, Synthesizer};
pub use request::{Metadata, SynthesisRequest, SynthesisResult};
pub use service::{AuditPolicy, ServiceConfig, ServicePorts, SpeechService};
pub use voice::{Speaker, VoiceRegistry, DEFAULT_PERSONA};
