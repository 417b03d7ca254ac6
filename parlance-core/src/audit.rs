//! Compliance audit event emitted once per successful `speak` call.
//!
//! ## Wire shape
//!
//! Serialised as a flat JSON object with a fixed key set:
//!
//! | Key | Type |
//! |-----|------|
//! | `persona` | string |
//! | `speakerVoiceHandle` | string |
//! | `rawText` | string |
//! | `normalizedTextLength` | int |
//! | `durationSeconds` | float, 3 dp |
//! | `elapsedSeconds` | float, 3 dp |
//! | `rtf` | float, 4 dp |
//! | `resolvedDestination` | string or null |
//! | `metadata` | object |
//! | `timestamp` | float unix seconds, added by the audit adapter if absent |

use serde::{Deserialize, Serialize};

use crate::request::Metadata;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    /// Persona as requested by the caller (before any fallback).
    pub persona: String,
    /// Voice handle of the speaker that was actually used.
    pub speaker_voice_handle: String,
    pub raw_text: String,
    /// Character count of the normalized text.
    pub normalized_text_length: usize,
    pub duration_seconds: f64,
    pub elapsed_seconds: f64,
    pub rtf: f64,
    pub resolved_destination: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

/// Timing figures measured by the service for one request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub duration_secs: f64,
    pub elapsed_secs: f64,
    pub rtf: f64,
}

impl Timing {
    /// Real-time factor guarded against silent output: `0.0` whenever the
    /// duration is not positive.
    pub fn measure(duration_secs: f64, elapsed_secs: f64) -> Self {
        let rtf = if duration_secs > 0.0 {
            (elapsed_secs / duration_secs).max(0.0)
        } else {
            0.0
        };
        Self {
            duration_secs,
            elapsed_secs,
            rtf,
        }
    }
}

impl AuditEvent {
    /// Builds the event with the rounding the schema prescribes.
    pub fn new(
        persona: &str,
        speaker_voice_handle: &str,
        raw_text: &str,
        normalized_text: &str,
        timing: Timing,
        resolved_destination: Option<String>,
        metadata: Metadata,
    ) -> Self {
        Self {
            persona: persona.to_string(),
            speaker_voice_handle: speaker_voice_handle.to_string(),
            raw_text: raw_text.to_string(),
            normalized_text_length: normalized_text.chars().count(),
            duration_seconds: round_to(timing.duration_secs, 3),
            elapsed_seconds: round_to(timing.elapsed_secs, 3),
            rtf: round_to(timing.rtf, 4),
            resolved_destination,
            metadata,
            timestamp: None,
        }
    }

    /// Returns a copy stamped with `timestamp` unless one is already present.
    pub fn stamped(&self, timestamp: f64) -> Self {
        let mut event = self.clone();
        event.timestamp.get_or_insert(round_to(timestamp, 3));
        event
    }
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
