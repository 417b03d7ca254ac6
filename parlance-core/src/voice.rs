//! Persona → speaker registry.
//!
//! Personas are stable, backend-neutral keys ("professional_female"); the
//! voice handle is whatever the synthesizer needs (a VCTK speaker ID, a
//! fine-tuned checkpoint name, …). Swapping backends means re-registering
//! handles, never renaming personas.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ParlanceError, Result};

pub const DEFAULT_PERSONA: &str = "neutral_male";

/// Immutable voice persona descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Speaker {
    pub persona: String,
    /// Backend-specific identifier, e.g. `p225`.
    pub voice_handle: String,
    pub display_name: String,
    /// Compliance / usage guidance.
    pub usage_guidance: String,
}

impl Speaker {
    pub fn new(
        persona: impl Into<String>,
        voice_handle: impl Into<String>,
        display_name: impl Into<String>,
        usage_guidance: impl Into<String>,
    ) -> Self {
        Self {
            persona: persona.into(),
            voice_handle: voice_handle.into(),
            display_name: display_name.into(),
            usage_guidance: usage_guidance.into(),
        }
    }
}

fn builtin_speakers() -> Vec<Speaker> {
    vec![
        Speaker::new(
            "professional_male",
            "p225",
            "Professional Banking Officer",
            "Formal, authoritative. Suitable for account updates and compliance notices.",
        ),
        Speaker::new(
            "friendly_female",
            "p226",
            "Friendly Customer Service",
            "Warm, approachable. Suitable for general enquiries and support.",
        ),
        Speaker::new(
            "neutral_male",
            "p227",
            "Neutral System Voice",
            "Clear, neutral. Suitable for standard announcements.",
        ),
        Speaker::new(
            "professional_female",
            "p228",
            "Professional Financial Advisor",
            "Confident, knowledgeable. Suitable for investment and advisory content.",
        ),
    ]
}

#[derive(Debug, Default)]
struct Inner {
    speakers: HashMap<String, Speaker>,
    /// Registration order of persona keys.
    order: Vec<String>,
}

impl Inner {
    fn insert(&mut self, speaker: Speaker) {
        if !self.speakers.contains_key(&speaker.persona) {
            self.order.push(speaker.persona.clone());
        }
        self.speakers.insert(speaker.persona.clone(), speaker);
    }
}

/// Shared persona registry. Reads run concurrently; registrations are
/// serialised and overwrite by persona key. There is no removal.
#[derive(Debug)]
pub struct VoiceRegistry {
    inner: RwLock<Inner>,
    default_persona: String,
}

impl Default for VoiceRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl VoiceRegistry {
    /// Build a registry from `speakers`.
    ///
    /// # Errors
    /// `ParlanceError::Config` if `default_persona` is not among `speakers`.
    pub fn new(default_persona: &str, speakers: impl IntoIterator<Item = Speaker>) -> Result<Self> {
        let mut inner = Inner::default();
        for speaker in speakers {
            inner.insert(speaker);
        }
        if !inner.speakers.contains_key(default_persona) {
            return Err(ParlanceError::Config(format!(
                "default persona '{default_persona}' is not registered (available: {:?})",
                inner.order
            )));
        }
        Ok(Self {
            inner: RwLock::new(inner),
            default_persona: default_persona.to_string(),
        })
    }

    /// The four built-in BFSI personas, defaulting to `neutral_male`.
    pub fn with_builtin() -> Self {
        let mut inner = Inner::default();
        for speaker in builtin_speakers() {
            inner.insert(speaker);
        }
        Self {
            inner: RwLock::new(inner),
            default_persona: DEFAULT_PERSONA.to_string(),
        }
    }

    /// Built-in personas with a different default.
    ///
    /// # Errors
    /// `ParlanceError::Config` if `default_persona` is not a built-in persona.
    pub fn with_builtin_default(default_persona: &str) -> Result<Self> {
        Self::new(default_persona, builtin_speakers())
    }

    pub fn default_persona(&self) -> &str {
        &self.default_persona
    }

    /// Resolve `persona`, falling back to `fallback` (or the default persona)
    /// when it is not registered.
    ///
    /// # Errors
    /// `ParlanceError::UnknownPersona` if neither resolves.
    pub fn resolve(&self, persona: &str, fallback: Option<&str>) -> Result<Speaker> {
        let inner = self.inner.read();
        if let Some(speaker) = inner.speakers.get(persona) {
            debug!(persona, voice_handle = %speaker.voice_handle, "resolved persona");
            return Ok(speaker.clone());
        }

        let effective = fallback.unwrap_or(&self.default_persona);
        if let Some(speaker) = inner.speakers.get(effective) {
            warn!(
                persona,
                fallback = effective,
                voice_handle = %speaker.voice_handle,
                "persona not found, falling back"
            );
            return Ok(speaker.clone());
        }

        Err(ParlanceError::UnknownPersona {
            persona: persona.to_string(),
            fallback: effective.to_string(),
            available: inner.order.clone(),
        })
    }

    /// Insert or overwrite a persona.
    pub fn register(
        &self,
        persona: &str,
        voice_handle: &str,
        display_name: &str,
        usage_guidance: &str,
    ) {
        self.register_speaker(Speaker::new(persona, voice_handle, display_name, usage_guidance));
    }

    pub fn register_speaker(&self, speaker: Speaker) {
        info!(
            persona = %speaker.persona,
            voice_handle = %speaker.voice_handle,
            display_name = %speaker.display_name,
            "registered persona"
        );
        self.inner.write().insert(speaker);
    }

    /// Persona keys in registration order.
    pub fn list(&self) -> Vec<String> {
        self.inner.read().order.clone()
    }

    /// Registered speakers in registration order.
    pub fn speakers(&self) -> Vec<Speaker> {
        let inner = self.inner.read();
        inner
            .order
            .iter()
            .filter_map(|p| inner.speakers.get(p).cloned())
            .collect()
    }
}
