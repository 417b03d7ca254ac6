//! Reference port implementations.
//!
//! | Adapter | Port | Notes |
//! |---------|------|-------|
//! | `SilenceSynthesizer` | `Synthesizer` | deterministic silence, voice `mock` |
//! | `WavFileSink` | `AudioSink` | 16-bit mono WAV via `hound` (feature `wav`) |
//! | `JsonlAuditLog` | `AuditSink` | append-only JSONL, mutex-serialised |
//! | `NoopAuditLog` | `AuditSink` | discards events |

pub mod audit_log;
pub mod silence;
#[cfg(feature = "wav")]
pub mod wav;

pub use audit_log::{JsonlAuditLog, NoopAuditLog};
pub use silence::SilenceSynthesizer;
#[cfg(feature = "wav")]
pub use wav::WavFileSink;
