//! Manifest entries for synthetic BFSI training corpora.
//!
//! No audio is produced here. The manifest is what a batch synthesis job
//! consumes; file names are derived from the text so reruns are stable.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const SYNTHETIC_SPEAKER: &str = "synthetic";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntheticStatus {
    PendingSynthesis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticEntry {
    pub text: String,
    pub speaker_id: String,
    pub speaker_embedding: Option<Vec<f32>>,
    pub file_path: String,
    pub status: SyntheticStatus,
}

/// `synthetic_<first 12 hex chars of SHA-256(text)>.wav`
pub fn synthetic_filename(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let hex: String = digest.iter().take(6).map(|b| format!("{b:02x}")).collect();
    format!("synthetic_{hex}.wav")
}

/// One pending entry per text, in input order.
pub fn synthetic_manifest<S: AsRef<str>>(
    texts: &[S],
    target_speaker: Option<&str>,
    speaker_embedding: Option<&[f32]>,
) -> Vec<SyntheticEntry> {
    texts
        .iter()
        .map(|text| {
            let text = text.as_ref();
            SyntheticEntry {
                text: text.to_string(),
                speaker_id: target_speaker.unwrap_or(SYNTHETIC_SPEAKER).to_string(),
                speaker_embedding: speaker_embedding.map(<[f32]>::to_vec),
                file_path: synthetic_filename(text),
                status: SyntheticStatus::PendingSynthesis,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_is_a_sha256_prefix() {
        // sha256("abc") = ba7816bf8f01cfea...
        assert_eq!(synthetic_filename("abc"), "synthetic_ba7816bf8f01.wav");
        assert_eq!(synthetic_filename("abc"), synthetic_filename("abc"));
        assert_ne!(synthetic_filename("abc"), synthetic_filename("abd"));
    }

    #[test]
    fn manifest_defaults_to_synthetic_speaker() {
        let manifest = synthetic_manifest(&["Your OTP is 1234", "Account locked"], None, None);
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest[0].speaker_id, "synthetic");
        assert!(manifest[0].speaker_embedding.is_none());
        assert_eq!(manifest[1].text, "Account locked");
        assert_eq!(manifest[1].status, SyntheticStatus::PendingSynthesis);
    }

    #[test]
    fn manifest_serializes_camel_case() {
        let manifest = synthetic_manifest(&["hi"], Some("p228"), Some(&[0.1, 0.2]));
        let json = serde_json::to_value(&manifest[0]).expect("serialize entry");
        assert_eq!(json["speakerId"], "p228");
        assert_eq!(json["status"], "pending_synthesis");
        assert_eq!(json["speakerEmbedding"].as_array().map(Vec::len), Some(2));
        assert!(json["filePath"].as_str().is_some_and(|p| p.starts_with("synthetic_")));
    }
}
