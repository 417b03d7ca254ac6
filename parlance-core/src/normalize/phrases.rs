//! BFSI domain phrase detection and classification.

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::{ParlanceError, Result};

const BUILTIN_PHRASES: &[(&str, &[&str])] = &[
    (
        "fraud_alerts",
        &[
            "fraud alert",
            "suspicious activity",
            "suspicious transaction",
            "unauthorised access",
            "account compromised",
            "unusual activity detected",
            "potential fraud",
            "fraudulent transaction",
        ],
    ),
    (
        "account_actions",
        &[
            "account locked",
            "account closed",
            "account suspended",
            "account frozen",
            "account cancelled",
            "account deactivated",
            "account restricted",
        ],
    ),
    (
        "compliance_notices",
        &[
            "please confirm",
            "verify your identity",
            "update your details",
            "review your account",
            "check your balance",
            "confirm your address",
            "update your contact",
        ],
    ),
    (
        "transaction_terms",
        &[
            "chargeback",
            "refund",
            "reversal",
            "pending transaction",
            "declined",
            "failed transaction",
            "cancelled transaction",
        ],
    ),
    (
        "security_terms",
        &[
            "account number",
            "card number",
            "one time password",
            "security code",
            "pin code",
            "password reset",
            "two factor authentication",
        ],
    ),
    (
        "product_names",
        &[
            "savings account",
            "transaction account",
            "home loan",
            "personal loan",
            "credit card",
            "debit card",
            "investment account",
            "superannuation",
        ],
    ),
    (
        "regulatory_phrases",
        &[
            "this call may be recorded",
            "for quality and compliance",
            "privacy notice",
            "terms and conditions",
            "financial advice",
            "product disclosure",
            "financial services guide",
        ],
    ),
];

#[derive(Debug)]
struct Category {
    name: String,
    phrases: Vec<String>,
}

/// Category → phrase table. Categories keep their declaration order; phrases
/// are stored lower-case and matched as substrings of the lower-cased text.
#[derive(Debug)]
pub struct PhraseCatalog {
    categories: RwLock<Vec<Category>>,
}

impl Default for PhraseCatalog {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl PhraseCatalog {
    pub fn with_builtin() -> Self {
        let categories = BUILTIN_PHRASES
            .iter()
            .map(|(name, phrases)| Category {
                name: (*name).to_string(),
                phrases: phrases.iter().map(|p| (*p).to_string()).collect(),
            })
            .collect();
        Self {
            categories: RwLock::new(categories),
        }
    }

    /// Every known phrase contained in `text`, in catalog order.
    pub fn find(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        let lower = text.to_lowercase();
        let found: Vec<String> = self
            .categories
            .read()
            .iter()
            .flat_map(|c| c.phrases.iter())
            .filter(|p| lower.contains(p.as_str()))
            .cloned()
            .collect();
        debug!(count = found.len(), "found domain phrases");
        found
    }

    /// Phrases of one category contained in `text`.
    ///
    /// # Errors
    /// `ParlanceError::UnknownPhraseCategory` if `category` is not registered.
    pub fn find_in_category(&self, text: &str, category: &str) -> Result<Vec<String>> {
        let categories = self.categories.read();
        let entry = categories
            .iter()
            .find(|c| c.name == category)
            .ok_or_else(|| unknown_category(category, &categories))?;
        let lower = text.to_lowercase();
        Ok(entry
            .phrases
            .iter()
            .filter(|p| !lower.is_empty() && lower.contains(p.as_str()))
            .cloned()
            .collect())
    }

    /// Category of an exact (case-insensitive) phrase.
    pub fn classify(&self, phrase: &str) -> Option<String> {
        let lower = phrase.to_lowercase();
        self.categories
            .read()
            .iter()
            .find(|c| c.phrases.iter().any(|p| *p == lower))
            .map(|c| c.name.clone())
    }

    /// Register `phrase` under an existing category. Re-adding a known phrase
    /// is a no-op.
    pub fn add(&self, category: &str, phrase: &str) -> Result<()> {
        let mut categories = self.categories.write();
        let Some(index) = categories.iter().position(|c| c.name == category) else {
            return Err(unknown_category(category, &categories));
        };
        let lower = phrase.trim().to_lowercase();
        if lower.is_empty() {
            return Err(ParlanceError::InvalidInput(
                "domain phrase cannot be empty".into(),
            ));
        }
        let entry = &mut categories[index];
        if !entry.phrases.contains(&lower) {
            info!(phrase = %lower, category, "registered domain phrase");
            entry.phrases.push(lower);
        }
        Ok(())
    }

    pub fn categories(&self) -> Vec<String> {
        self.categories.read().iter().map(|c| c.name.clone()).collect()
    }
}

fn unknown_category(category: &str, categories: &[Category]) -> ParlanceError {
    ParlanceError::UnknownPhraseCategory {
        category: category.to_string(),
        available: categories.iter().map(|c| c.name.clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_phrases_case_insensitively() {
        let catalog = PhraseCatalog::default();
        let found = catalog.find("FRAUD ALERT: your Credit Card was used. Please confirm.");
        assert_eq!(found, vec!["fraud alert", "please confirm", "credit card"]);
        assert!(catalog.find("").is_empty());
    }

    #[test]
    fn category_search() {
        let catalog = PhraseCatalog::default();
        let found = catalog
            .find_in_category("Your home loan and savings account", "product_names")
            .expect("known category");
        assert_eq!(found, vec!["savings account", "home loan"]);

        let err = catalog.find_in_category("x", "weather").unwrap_err();
        match err {
            ParlanceError::UnknownPhraseCategory { category, available } => {
                assert_eq!(category, "weather");
                assert_eq!(available.len(), 7);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn classify_known_and_unknown() {
        let catalog = PhraseCatalog::default();
        assert_eq!(catalog.classify("Refund").as_deref(), Some("transaction_terms"));
        assert_eq!(catalog.classify("refunds"), None);
    }

    #[test]
    fn add_extends_a_category_once() {
        let catalog = PhraseCatalog::default();
        catalog.add("fraud_alerts", "Card Skimming").expect("add phrase");
        catalog.add("fraud_alerts", "card skimming").expect("re-add phrase");
        assert_eq!(catalog.classify("card skimming").as_deref(), Some("fraud_alerts"));
        assert_eq!(catalog.find("possible card skimming"), vec!["card skimming"]);

        assert!(matches!(
            catalog.add("weather", "rain"),
            Err(ParlanceError::UnknownPhraseCategory { .. })
        ));
    }

    #[test]
    fn categories_keep_declaration_order() {
        let catalog = PhraseCatalog::default();
        let categories = catalog.categories();
        assert_eq!(categories.first().map(String::as_str), Some("fraud_alerts"));
        assert_eq!(categories.last().map(String::as_str), Some("regulatory_phrases"));
    }
}
