//! `SilenceSynthesizer` — deterministic backend that returns silence.
//!
//! No model, no device, runs in microseconds. Lets the full service pipeline
//! be exercised end-to-end in tests and dry runs.

use tracing::debug;

use crate::audio::AudioArtifact;
use crate::error::SynthesisError;
use crate::ports::Synthesizer;
use crate::request::SynthesisRequest;

pub const SILENCE_VOICE: &str = "mock";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilenceSynthesizer {
    /// Default: 22050 Hz.
    pub sample_rate: u32,
    /// Seconds of silence per call. Default: 1.0.
    pub duration_secs: f64,
}

impl SilenceSynthesizer {
    pub fn new(sample_rate: u32, duration_secs: f64) -> Self {
        Self {
            sample_rate,
            duration_secs: duration_secs.max(0.0),
        }
    }

    fn sample_count(&self) -> usize {
        (self.sample_rate as f64 * self.duration_secs).round() as usize
    }
}

impl Default for SilenceSynthesizer {
    fn default() -> Self {
        Self::new(22_050, 1.0)
    }
}

impl Synthesizer for SilenceSynthesizer {
    fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioArtifact, SynthesisError> {
        if self.sample_rate == 0 {
            return Err(SynthesisError::Backend("sample rate must be positive".into()));
        }
        let samples = vec![0.0_f32; self.sample_count()];
        debug!(
            persona = %request.persona,
            samples = samples.len(),
            "SilenceSynthesizer::synthesize"
        );
        Ok(AudioArtifact::new(samples, self.sample_rate, SILENCE_VOICE))
    }

    fn list_voices(&self) -> Vec<String> {
        vec![SILENCE_VOICE.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn one_second_at_22050_by_default() {
        let artifact = SilenceSynthesizer::default()
            .synthesize(&SynthesisRequest::new("hi", "neutral_male"))
            .expect("synthesize");
        assert_eq!(artifact.samples.len(), 22_050);
        assert_eq!(artifact.voice_handle, "mock");
        assert!(artifact.samples.iter().all(|s| *s == 0.0));
        assert_relative_eq!(artifact.duration_secs(), 1.0);
    }

    #[test]
    fn zero_duration_gives_empty_artifact() {
        let artifact = SilenceSynthesizer::new(16_000, 0.0)
            .synthesize(&SynthesisRequest::new("hi", "neutral_male"))
            .expect("synthesize");
        assert!(artifact.is_empty());
        assert_eq!(artifact.duration_secs(), 0.0);
    }

    #[test]
    fn zero_sample_rate_is_a_backend_error() {
        let result = SilenceSynthesizer::new(0, 1.0).synthesize(&SynthesisRequest::new("hi", "p"));
        assert!(matches!(result, Err(SynthesisError::Backend(_))));
    }
}
