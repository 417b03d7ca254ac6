use std::fmt;
use std::str::FromStr;

use tracing::info;

use super::cardinal::digit_word;
use crate::error::ParlanceError;

/// Dialling region whose country prefix is dropped before a number is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PhoneRegion {
    #[default]
    Au,
    Nz,
    Uk,
    Us,
    /// Keep every digit.
    None,
}

impl PhoneRegion {
    /// Prefixes tried in order; the first match is removed.
    fn prefixes(self) -> &'static [&'static str] {
        match self {
            Self::Au => &["+61", "61", "0"],
            Self::Nz => &["+64", "64", "0"],
            Self::Uk => &["+44", "44", "0"],
            Self::Us => &["+1", "1"],
            Self::None => &[],
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Au => "AU",
            Self::Nz => "NZ",
            Self::Uk => "UK",
            Self::Us => "US",
            Self::None => "none",
        }
    }
}

impl fmt::Display for PhoneRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PhoneRegion {
    type Err = ParlanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AU" => Ok(Self::Au),
            "NZ" => Ok(Self::Nz),
            "UK" | "GB" => Ok(Self::Uk),
            "US" => Ok(Self::Us),
            "" | "NONE" => Ok(Self::None),
            other => Err(ParlanceError::Config(format!(
                "unknown phone region '{other}' (expected AU, NZ, UK, US or none)"
            ))),
        }
    }
}

/// Spoken form of a phone number: punctuation stripped, the region's country
/// prefix removed, then every digit read individually.
pub fn normalize_phone_number(phone: &str, region: PhoneRegion) -> String {
    let digits: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '-' | '.' | '(' | ')'))
        .collect();

    let local = region
        .prefixes()
        .iter()
        .find_map(|prefix| digits.strip_prefix(prefix))
        .unwrap_or(&digits);

    let spoken = local
        .chars()
        .filter_map(digit_word)
        .collect::<Vec<_>>()
        .join(" ");
    info!(phone, region = %region, spoken = %spoken, "normalize_phone_number");
    spoken
}
