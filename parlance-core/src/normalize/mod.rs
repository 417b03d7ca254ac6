//! Rule-based text normalization for BFSI speech.
//!
//! ```text
//! raw text ─► AbbreviationExpander ─► NumberExpander ─► spoken text
//! ```
//!
//! The order is fixed: an expanded abbreviation can sit right next to a code
//! or amount that the number stages still have to see ("OTP 4829" becomes
//! "One Time Password 4829" before the digits are spelled).

pub mod abbreviation;
pub mod cardinal;
pub mod number;
pub mod phone;
pub mod phrases;

pub use abbreviation::AbbreviationExpander;
pub use cardinal::{cardinal, signed_cardinal};
pub use number::{format_money, format_otp, NumberConfig, NumberExpander};
pub use phone::{normalize_phone_number, PhoneRegion};
pub use phrases::PhraseCatalog;

use tracing::debug;

use crate::ports::Normalizer;

/// Abbreviations first, then numbers.
#[derive(Debug, Clone, Default)]
pub struct NormalizationPipeline {
    abbreviations: AbbreviationExpander,
    numbers: NumberExpander,
}

impl NormalizationPipeline {
    pub fn new(abbreviations: AbbreviationExpander, numbers: NumberExpander) -> Self {
        Self {
            abbreviations,
            numbers,
        }
    }

    /// Pipeline with the built-in vocabulary and the given number settings.
    pub fn with_config(config: NumberConfig) -> Self {
        Self::new(AbbreviationExpander::with_builtin(), NumberExpander::new(config))
    }

    /// Handle to the shared abbreviation table; registrations through it are
    /// seen by this pipeline immediately.
    pub fn abbreviations(&self) -> &AbbreviationExpander {
        &self.abbreviations
    }

    pub fn numbers(&self) -> &NumberExpander {
        &self.numbers
    }

    pub fn normalize(&self, text: &str) -> String {
        let expanded = self.abbreviations.expand(text);
        let spoken = self.numbers.expand(&expanded);
        debug!(input = text, output = %spoken, "normalized");
        spoken
    }
}

impl Normalizer for NormalizationPipeline {
    fn normalize(&self, text: &str) -> String {
        NormalizationPipeline::normalize(self, text)
    }
}
