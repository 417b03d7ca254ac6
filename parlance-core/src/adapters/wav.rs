//! `WavFileSink` — writes artifacts as 16-bit mono PCM WAV files.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::audio::AudioArtifact;
use crate::error::SinkError;
use crate::ports::AudioSink;

#[derive(Debug, Clone, Copy, Default)]
pub struct WavFileSink;

impl WavFileSink {
    pub fn new() -> Self {
        Self
    }
}

/// Scale `samples` so the absolute peak is at most 1.0.
fn peak_normalized(samples: &[f32]) -> Vec<f32> {
    let peak = samples.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()));
    if peak > 1.0 {
        warn!(peak, "waveform normalised to prevent clipping");
        samples.iter().map(|s| s / peak).collect()
    } else {
        samples.to_vec()
    }
}

impl AudioSink for WavFileSink {
    fn write(&self, artifact: &AudioArtifact, destination: &str) -> Result<String, SinkError> {
        if artifact.is_empty() {
            return Err(SinkError::EmptyAudio(destination.to_string()));
        }
        if artifact.sample_rate == 0 {
            return Err(SinkError::Encode("sample rate must be positive".into()));
        }

        let path = Path::new(destination);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: artifact.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let normalized = AudioArtifact::new(
            peak_normalized(&artifact.samples),
            artifact.sample_rate,
            artifact.voice_handle.clone(),
        );

        let mut writer =
            hound::WavWriter::create(path, spec).map_err(|e| SinkError::Encode(e.to_string()))?;
        for sample in normalized.to_pcm16() {
            writer
                .write_sample(sample)
                .map_err(|e| SinkError::Encode(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| SinkError::Encode(e.to_string()))?;

        let resolved = fs::canonicalize(path)?;
        info!(
            path = %resolved.display(),
            duration_secs = artifact.duration_secs(),
            sample_rate = artifact.sample_rate,
            "saved WAV"
        );
        Ok(resolved.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_back(path: &str) -> (hound::WavSpec, Vec<i16>) {
        let mut reader = hound::WavReader::open(path).expect("open written wav");
        let spec = reader.spec();
        let samples = reader
            .samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .expect("read samples");
        (spec, samples)
    }

    #[test]
    fn writes_mono_pcm16_and_creates_parents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let destination = dir.path().join("nested/out/clip.wav");
        let artifact = AudioArtifact::new(vec![0.0, 0.5, -0.5], 22_050, "p225");

        let resolved = WavFileSink
            .write(&artifact, destination.to_str().expect("utf-8 path"))
            .expect("write wav");
        assert!(Path::new(&resolved).is_absolute());

        let (spec, samples) = read_back(&resolved);
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_rate, 22_050);
        assert_eq!(samples, vec![0, 16_383, -16_383]);
    }

    #[test]
    fn loud_audio_is_peak_normalized() {
        let dir = tempfile::tempdir().expect("tempdir");
        let destination = dir.path().join("loud.wav");
        let artifact = AudioArtifact::new(vec![2.0, -1.0], 8_000, "p225");

        let resolved = WavFileSink
            .write(&artifact, destination.to_str().expect("utf-8 path"))
            .expect("write wav");
        let (_, samples) = read_back(&resolved);
        assert_eq!(samples, vec![i16::MAX, -16_383]);
    }

    #[test]
    fn empty_audio_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let destination = dir.path().join("empty.wav");
        let artifact = AudioArtifact::new(Vec::new(), 22_050, "p225");
        let result = WavFileSink.write(&artifact, destination.to_str().expect("utf-8 path"));
        assert!(matches!(result, Err(SinkError::EmptyAudio(_))));
        assert!(!destination.exists());
    }

    #[test]
    fn peak_normalization_leaves_quiet_audio_alone() {
        assert_eq!(peak_normalized(&[0.25, -1.0]), vec![0.25, -1.0]);
    }
}
