//! Currency, coded-sequence, and plain-number expansion.
//!
//! ## Stage order
//!
//! ```text
//! text ─► currency ("$1,234.50")  ─► codes ("482913", "AB12CD")  ─► plain ("12", "3.75")
//! ```
//!
//! Each stage rewrites the output of the previous one, so a currency amount
//! is spoken as money before the code stage could split its digits, and a
//! long digit run is spelled out before the plain stage could read part of it
//! as a cardinal. The stages are kept as an ordered table rather than one
//! combined pattern so that this precedence is explicit.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{debug, warn};

use super::cardinal::{cardinal, digit_word};
use super::phone::PhoneRegion;
use crate::error::{ParlanceError, Result};

/// Configuration for `NumberExpander`.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberConfig {
    /// Currency spoken for a bare `$` marker. Default: `"AUD"`.
    pub default_currency: String,
    /// Spell 4+ digit runs digit-by-digit (passcodes, references).
    /// When `false` they are read as cardinals. Default: `true`.
    pub spell_codes: bool,
    /// Region used by `NumberExpander::phone`. Default: Australia.
    pub phone_region: PhoneRegion,
}

impl Default for NumberConfig {
    fn default() -> Self {
        Self {
            default_currency: "AUD".into(),
            spell_codes: true,
            phone_region: PhoneRegion::Au,
        }
    }
}

type Renderer = fn(&NumberExpander, &Captures<'_>) -> Option<String>;

struct NumericStage {
    name: &'static str,
    pattern: Regex,
    render: Renderer,
}

static STAGES: Lazy<Vec<NumericStage>> = Lazy::new(|| {
    vec![
        NumericStage {
            name: "currency",
            pattern: Regex::new(
                r"(?P<marker>US\$|AU\$|A\$|\$)\s?(?P<whole>[0-9]{1,3}(?:,[0-9]{3})+|[0-9]+)(?:\.(?P<frac>[0-9]{2})\b)?",
            )
            .expect("currency pattern compiles"),
            render: render_currency,
        },
        NumericStage {
            name: "code",
            pattern: Regex::new(r"\b[A-Z0-9]{4,}\b").expect("code pattern compiles"),
            render: render_code,
        },
        NumericStage {
            name: "plain",
            pattern: Regex::new(r"\b(?P<whole>[0-9]{1,3}(?:,[0-9]{3})*)(?:\.(?P<frac>[0-9]{2}))?\b")
                .expect("plain number pattern compiles"),
            render: render_plain,
        },
    ]
});

/// Rewrites numeric tokens into spoken form.
#[derive(Debug, Clone, Default)]
pub struct NumberExpander {
    config: NumberConfig,
}

impl NumberExpander {
    pub fn new(config: NumberConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NumberConfig {
        &self.config
    }

    /// Expand every currency amount, coded sequence, and plain number in
    /// `text`. Tokens that cannot be parsed are left in place.
    pub fn expand(&self, text: &str) -> String {
        let mut out = text.to_string();
        for stage in STAGES.iter() {
            let source = out.as_str();
            let rewritten = stage
                .pattern
                .replace_all(source, |caps: &Captures<'_>| {
                    let token = &caps[0];
                    match (stage.render)(self, caps) {
                        Some(spoken) => {
                            debug!(
                                stage = stage.name,
                                from = token,
                                to = %spoken,
                                "expand_numbers"
                            );
                            separate_from_words(source, caps, spoken)
                        }
                        None => token.to_string(),
                    }
                })
                .into_owned();
            out = rewritten;
        }

        if out == text {
            debug!("expand_numbers: no numeric tokens found");
        }
        out
    }

    /// Spoken form of a phone number for the configured region.
    pub fn phone(&self, phone: &str) -> String {
        super::phone::normalize_phone_number(phone, self.config.phone_region)
    }
}

// ── Stage renderers ─────────────────────────────────────────────────────────

fn render_currency(expander: &NumberExpander, caps: &Captures<'_>) -> Option<String> {
    let currency = match &caps["marker"] {
        "US$" => "USD",
        "AU$" | "A$" => "AUD",
        _ => expander.config.default_currency.as_str(),
    };
    let whole = parse_grouped(&caps["whole"])?;
    let cents = match caps.name("frac") {
        Some(frac) => frac.as_str().parse::<u8>().ok()?,
        None => 0,
    };
    Some(Money { whole, cents }.speak(currency))
}

fn render_code(expander: &NumberExpander, caps: &Captures<'_>) -> Option<String> {
    let code = &caps[0];
    if !code.chars().any(|c| c.is_ascii_digit()) {
        // All letters: an ordinary (shouted) word, not a code.
        return None;
    }
    if !expander.config.spell_codes && code.chars().all(|c| c.is_ascii_digit()) {
        return parse_grouped(code).map(cardinal);
    }
    format_otp(code).ok()
}

fn render_plain(_expander: &NumberExpander, caps: &Captures<'_>) -> Option<String> {
    let whole = parse_grouped(&caps["whole"])?;
    let spoken = cardinal(whole);
    match caps.name("frac") {
        Some(frac) => Some(format!("{spoken} {}", speak_fraction(frac.as_str()))),
        None => Some(spoken),
    }
}

/// Pad `spoken` with a space on any side where the match touches a word
/// character, so "abc$5" does not become "abcfive dollars".
fn separate_from_words(source: &str, caps: &Captures<'_>, spoken: String) -> String {
    let Some(m) = caps.get(0) else {
        return spoken;
    };
    let touches = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let before = touches(source[..m.start()].chars().next_back());
    let after = touches(source[m.end()..].chars().next());
    match (before, after) {
        (false, false) => spoken,
        (true, false) => format!(" {spoken}"),
        (false, true) => format!("{spoken} "),
        (true, true) => format!(" {spoken} "),
    }
}

/// Parse a digit run that may contain thousands separators.
fn parse_grouped(raw: &str) -> Option<u64> {
    let digits: String = raw.chars().filter(|c| *c != ',').collect();
    match digits.parse::<u64>() {
        Ok(n) => Some(n),
        Err(e) => {
            warn!(token = raw, error = %e, "failed to convert number, leaving as-is");
            None
        }
    }
}

fn speak_fraction(digits: &str) -> String {
    let spoken: Vec<&str> = digits.chars().filter_map(digit_word).collect();
    format!("point {}", spoken.join(" "))
}

// ── Money ───────────────────────────────────────────────────────────────────

/// An amount split into whole units and hundredths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Money {
    whole: u64,
    cents: u8,
}

impl Money {
    fn speak(self, currency: &str) -> String {
        self.speak_signed(false, currency)
    }

    fn speak_signed(self, negative: bool, currency: &str) -> String {
        let code = currency.trim().to_ascii_uppercase();
        let plural = self.whole != 1;
        let unit = match code.as_str() {
            "AUD" => if plural { "dollars" } else { "dollar" }.to_string(),
            "USD" => if plural { "US dollars" } else { "US dollar" }.to_string(),
            _ => code.clone(),
        };
        let whole = if negative {
            format!("minus {}", cardinal(self.whole))
        } else {
            cardinal(self.whole)
        };

        if self.cents == 0 {
            return format!("{whole} {unit}");
        }
        let cent_unit = if self.cents == 1 { "cent" } else { "cents" };
        format!(
            "{whole} {unit} and {} {cent_unit}",
            cardinal(u64::from(self.cents))
        )
    }
}

/// Spoken form of a currency amount, rounded to the cent.
///
/// ```
/// use parlance_core::format_money;
/// assert_eq!(
///     format_money(1205.50, "AUD"),
///     "one thousand two hundred and five dollars and fifty cents"
/// );
/// ```
pub fn format_money(amount: f64, currency: &str) -> String {
    if !amount.is_finite() {
        warn!(amount, "format_money: amount is not finite");
        return format!("{amount} {currency}");
    }
    let total_cents = (amount.abs() * 100.0).round();
    if total_cents > u64::MAX as f64 {
        warn!(amount, "format_money: amount out of range");
        return format!("{amount} {currency}");
    }
    let total_cents = total_cents as u64;
    let money = Money {
        whole: total_cents / 100,
        cents: (total_cents % 100) as u8,
    };
    let negative = amount < 0.0 && total_cents > 0;
    let spoken = money.speak_signed(negative, currency);
    debug!(amount, currency, spoken = %spoken, "format_money");
    spoken
}

/// Spell a passcode or reference number one character at a time.
///
/// Digits become cardinal words, letters become "letter x", anything else is
/// skipped.
///
/// # Errors
/// `ParlanceError::InvalidInput` if `code` is empty.
pub fn format_otp(code: &str) -> Result<String> {
    if code.is_empty() {
        return Err(ParlanceError::InvalidInput("OTP cannot be empty".into()));
    }

    let mut parts: Vec<String> = Vec::with_capacity(code.len());
    for c in code.chars() {
        if let Some(word) = digit_word(c) {
            parts.push(word.to_string());
        } else if c.is_alphabetic() {
            parts.push(format!("letter {}", c.to_lowercase()));
        } else {
            warn!(character = %c, "skipping non-alphanumeric character in code");
        }
    }
    Ok(parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(text: &str) -> String {
        NumberExpander::default().expand(text)
    }

    #[test]
    fn money_examples() {
        assert_eq!(
            format_money(1205.50, "AUD"),
            "one thousand two hundred and five dollars and fifty cents"
        );
        assert_eq!(format_money(1.0, "AUD"), "one dollar");
        assert_eq!(format_money(2.01, "aud"), "two dollars and one cent");
        assert_eq!(format_money(1.5, "USD"), "one US dollar and fifty cents");
        assert_eq!(format_money(20.0, "EUR"), "twenty EUR");
        assert_eq!(format_money(3.25, "NZD"), "three NZD and twenty-five cents");
    }

    #[test]
    fn money_rounds_rather_than_truncates() {
        assert_eq!(format_money(9.999, "AUD"), "ten dollars");
        assert_eq!(format_money(0.126, "AUD"), "zero dollars and thirteen cents");
    }

    #[test]
    fn negative_money() {
        assert_eq!(format_money(-4.0, "AUD"), "minus four dollars");
    }

    #[test]
    fn otp_examples() {
        assert_eq!(
            format_otp("482913").expect("otp"),
            "four eight two nine one three"
        );
        assert_eq!(
            format_otp("AB-12").expect("otp"),
            "letter a letter b one two"
        );
        assert!(matches!(format_otp(""), Err(ParlanceError::InvalidInput(_))));
    }

    #[test]
    fn currency_is_consumed_before_codes() {
        assert_eq!(
            expand("$1,234.50"),
            "one thousand two hundred and thirty-four dollars and fifty cents"
        );
        assert_eq!(
            expand("pay $1234 now"),
            "pay one thousand two hundred and thirty-four dollars now"
        );
        assert_eq!(expand("$ 5"), "five dollars");
        assert_eq!(expand("US$20.00"), "twenty US dollars");
        assert_eq!(expand("A$1.01"), "one dollar and one cent");
    }

    #[test]
    fn currency_is_kept_apart_from_neighbouring_words() {
        assert_eq!(expand("AU$5"), "five dollars");
        assert_eq!(expand("fee:$5"), "fee:five dollars");
        assert_eq!(expand("abc$5"), "abc five dollars");
        assert_eq!(expand("$5each"), "five dollars each");
    }

    #[test]
    fn default_currency_is_configurable() {
        let expander = NumberExpander::new(NumberConfig {
            default_currency: "USD".into(),
            ..NumberConfig::default()
        });
        assert_eq!(expander.expand("$3"), "three US dollars");
    }

    #[test]
    fn codes_are_spelled_digit_by_digit() {
        assert_eq!(expand("Your code is 482913."), "Your code is four eight two nine one three.");
        assert_eq!(expand("ref AB12CD"), "ref letter a letter b one two letter c letter d");
    }

    #[test]
    fn all_letter_words_are_not_codes() {
        assert_eq!(expand("PLEASE CALL"), "PLEASE CALL");
    }

    #[test]
    fn codes_can_be_read_as_cardinals() {
        let expander = NumberExpander::new(NumberConfig {
            spell_codes: false,
            ..NumberConfig::default()
        });
        assert_eq!(expander.expand("2024"), "two thousand and twenty-four");
        assert_eq!(expander.expand("AB12"), "letter a letter b one two");
    }

    #[test]
    fn plain_numbers_and_decimals() {
        assert_eq!(expand("12 items"), "twelve items");
        assert_eq!(expand("1,205 items"), "one thousand two hundred and five items");
        assert_eq!(expand("rate 123.45"), "rate one hundred and twenty-three point four five");
        assert_eq!(expand("3.05"), "three point zero five");
    }

    #[test]
    fn text_without_numbers_is_unchanged() {
        assert_eq!(expand("no digits here"), "no digits here");
        assert_eq!(expand(""), "");
    }

    #[test]
    fn expansion_is_idempotent() {
        let once = expand("Pay $12.50 with code 9921 by the 3rd, 45 left");
        assert_eq!(expand(&once), once);
    }

    #[test]
    fn oversized_currency_falls_through_to_code_spelling() {
        let text = "$99999999999999999999999";
        assert_eq!(expand(text), "$".to_string() + &expand("99999999999999999999999"));
    }
}
