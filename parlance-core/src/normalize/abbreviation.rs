//! Dictionary-driven abbreviation expansion with case carried over from the
//! matched token.
//!
//! Matching is whole-word and case-insensitive. At each position the longest
//! registered abbreviation wins, so "AU/NZ" is preferred over "AU".

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

/// Built-in BFSI vocabulary, in canonical spelling.
const BUILTIN_ABBREVIATIONS: &[(&str, &str)] = &[
    ("KYC", "Know Your Customer"),
    ("AML", "Anti-Money Laundering"),
    ("KYB", "Know Your Business"),
    ("PEP", "Politically Exposed Person"),
    ("CDD", "Customer Due Diligence"),
    ("EDD", "Enhanced Due Diligence"),
    ("IFSC", "Indian Financial System Code"),
    (
        "SWIFT",
        "Society for Worldwide Interbank Financial Telecommunication",
    ),
    ("IBAN", "International Bank Account Number"),
    ("BSB", "Bank State Branch"),
    ("ABN", "Australian Business Number"),
    ("ACN", "Australian Company Number"),
    ("TFN", "Tax File Number"),
    ("NAB", "National Australia Bank"),
    ("ANZ", "Australia and New Zealand Banking Group"),
    ("RBA", "Reserve Bank of Australia"),
    ("ASIC", "Australian Securities and Investments Commission"),
    (
        "AUSTRAC",
        "Australian Transaction Reports and Analysis Centre",
    ),
    ("OTP", "One Time Password"),
    ("PIN", "Personal Identification Number"),
    ("CVV", "Card Verification Value"),
    ("BPAY", "Bill Payment Service"),
    ("EFTPOS", "Electronic Funds Transfer at Point of Sale"),
    ("ATM", "Automated Teller Machine"),
    ("EFT", "Electronic Funds Transfer"),
    ("RTGS", "Real Time Gross Settlement"),
    ("TTS", "Text To Speech"),
    ("IVR", "Interactive Voice Response"),
    ("SMS", "Short Message Service"),
    ("API", "Application Programming Interface"),
    ("SLA", "Service Level Agreement"),
    ("KPI", "Key Performance Indicator"),
    ("USD", "US dollars"),
    ("AUD", "Australian dollars"),
    ("FX", "Foreign Exchange"),
    ("APR", "Annual Percentage Rate"),
    ("p.a.", "per annum"),
    ("p/a", "per annum"),
    ("AU", "Australia"),
    ("AU/NZ", "Australia and New Zealand"),
    ("V", "versus"),
    ("vs", "versus"),
    ("i.e.", "that is"),
    ("e.g.", "for example"),
];

#[derive(Debug, Clone)]
struct Entry {
    /// Spelling as registered.
    canonical: String,
    /// Lower-cased characters used for matching.
    needle: Vec<char>,
    expansion: String,
}

/// Case-preserving abbreviation expander.
///
/// The table is shared, long-lived state: reads never block each other and
/// `add_abbreviation` takes effect for every subsequent `expand` call.
#[derive(Clone)]
pub struct AbbreviationExpander {
    /// Sorted longest-needle-first.
    entries: Arc<RwLock<Vec<Entry>>>,
}

impl AbbreviationExpander {
    /// An expander with no abbreviations registered.
    pub fn empty() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// An expander preloaded with the built-in BFSI vocabulary.
    pub fn with_builtin() -> Self {
        let expander = Self::empty();
        {
            let mut guard = expander.entries.write();
            for (short, expanded) in BUILTIN_ABBREVIATIONS {
                upsert(&mut guard, short, expanded);
            }
        }
        expander
    }

    /// Register (or replace) an abbreviation. Keys are compared
    /// case-insensitively, so "kyc" replaces "KYC".
    pub fn add_abbreviation(&self, short: &str, expanded: &str) {
        let short = short.trim();
        if short.is_empty() {
            warn!("ignoring abbreviation with empty key");
            return;
        }
        upsert(&mut self.entries.write(), short, expanded);
        info!(short, expanded, "registered abbreviation");
    }

    /// Snapshot of the table as `(canonical, expansion)` pairs.
    pub fn abbreviations(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .entries
            .read()
            .iter()
            .map(|e| (e.canonical.clone(), e.expansion.clone()))
            .collect();
        out.sort();
        out
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Replace every known abbreviation in `text` with its expansion.
    ///
    /// Empty input is returned unchanged.
    pub fn expand(&self, text: &str) -> String {
        if text.is_empty() {
            warn!("expand_abbreviations: input text is empty");
            return String::new();
        }

        let guard = self.entries.read();
        if guard.is_empty() {
            warn!("expand_abbreviations: abbreviation table is empty");
            return text.to_string();
        }

        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len());
        let mut i = 0usize;
        let mut changed = false;
        while i < chars.len() {
            if let Some((entry, end)) = match_at(&guard, &chars, i) {
                let source: String = chars[i..end].iter().collect();
                let replacement = match_case(&source, entry);
                debug!(from = %source, to = %replacement, "expand_abbreviations");
                out.push_str(&replacement);
                i = end;
                changed = true;
                continue;
            }
            out.push(chars[i]);
            i += 1;
        }

        if changed {
            debug!(
                input_chars = chars.len(),
                output_chars = out.chars().count(),
                "expand_abbreviations: done"
            );
            out
        } else {
            text.to_string()
        }
    }
}

impl Default for AbbreviationExpander {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl std::fmt::Debug for AbbreviationExpander {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbbreviationExpander")
            .field("entries", &self.len())
            .finish()
    }
}

fn upsert(entries: &mut Vec<Entry>, short: &str, expanded: &str) {
    let needle: Vec<char> = short.chars().flat_map(char::to_lowercase).collect();
    entries.retain(|e| e.needle != needle);
    entries.push(Entry {
        canonical: short.to_string(),
        needle,
        expansion: expanded.to_string(),
    });
    entries.sort_by(|a, b| {
        b.needle
            .len()
            .cmp(&a.needle.len())
            .then_with(|| a.needle.cmp(&b.needle))
    });
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Longest entry matching at `start`, with its end index.
fn match_at<'a>(entries: &'a [Entry], chars: &[char], start: usize) -> Option<(&'a Entry, usize)> {
    let preceded_by_word = start > 0 && is_word_char(chars[start - 1]);
    entries.iter().find_map(|entry| {
        let len = entry.needle.len();
        let end = start + len;
        if len == 0 || end > chars.len() {
            return None;
        }
        let first = entry.needle[0];
        let last = entry.needle[len - 1];
        if is_word_char(first) && preceded_by_word {
            return None;
        }
        if is_word_char(last) && end < chars.len() && is_word_char(chars[end]) {
            return None;
        }
        // "AU$5": the key is a currency marker prefix, left for the number stage.
        if chars.get(end) == Some(&'$') {
            return None;
        }
        // "letter v" is a spelled-out code character, not an abbreviation.
        if len == 1 && follows_spelled_letter(chars, start) {
            return None;
        }
        let hit = chars[start..end]
            .iter()
            .zip(&entry.needle)
            .all(|(c, n)| c.to_lowercase().eq(std::iter::once(*n)));
        hit.then_some((entry, end))
    })
}

/// True when `chars[..start]` ends with the word "letter" plus whitespace.
fn follows_spelled_letter(chars: &[char], start: usize) -> bool {
    const MARKER: [char; 6] = ['l', 'e', 't', 't', 'e', 'r'];
    let mut end = start;
    while end > 0 && chars[end - 1].is_whitespace() {
        end -= 1;
    }
    if end == start || end < MARKER.len() {
        return false;
    }
    let begin = end - MARKER.len();
    let is_marker = chars[begin..end]
        .iter()
        .zip(MARKER)
        .all(|(c, m)| c.to_ascii_lowercase() == m);
    is_marker && (begin == 0 || !is_word_char(chars[begin - 1]))
}

/// Derive the replacement's case from the matched token.
fn match_case(source: &str, entry: &Entry) -> String {
    if source == entry.canonical {
        return entry.expansion.clone();
    }
    let has_upper = source.chars().any(char::is_uppercase);
    let has_lower = source.chars().any(char::is_lowercase);
    let starts_upper = source
        .chars()
        .find(|c| c.is_alphabetic())
        .map(char::is_uppercase)
        .unwrap_or(false);

    if has_upper && !has_lower {
        entry.expansion.to_uppercase()
    } else if has_lower && !has_upper {
        entry.expansion.to_lowercase()
    } else if starts_upper {
        title_case(&entry.expansion)
    } else {
        entry.expansion.clone()
    }
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
