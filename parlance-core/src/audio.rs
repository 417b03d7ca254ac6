//! Audio artifact handed back by a `Synthesizer` and passed on to an `AudioSink`.
//!
//! The service never looks at the samples. It only reads the duration for
//! real-time-factor accounting and forwards the artifact unchanged.

/// A block of mono PCM samples produced for one synthesis request.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioArtifact {
    /// Mono f32 samples, nominally in [-1.0, 1.0].
    pub samples: Vec<f32>,
    /// Sample rate in Hz (e.g. 22050, 24000).
    pub sample_rate: u32,
    /// Backend voice handle that produced these samples.
    pub voice_handle: String,
}

impl AudioArtifact {
    pub fn new(samples: Vec<f32>, sample_rate: u32, voice_handle: impl Into<String>) -> Self {
        Self {
            samples,
            sample_rate,
            voice_handle: voice_handle.into(),
        }
    }

    /// Returns the duration of this artifact in seconds. Never negative;
    /// a zero sample rate yields `0.0`.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Returns true if the artifact contains no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Signed 16-bit PCM, clamped to the representable range.
    pub fn to_pcm16(&self) -> Vec<i16> {
        self.samples
            .iter()
            .map(|s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
            .collect()
    }
}
