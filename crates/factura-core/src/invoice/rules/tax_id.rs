//! Tax identification number (RUC / NIT) extraction.

use super::patterns::{TAX_ID_BARE, TAX_ID_LABELED};
use super::{all_matches, first_match, ExtractionMatch, FieldExtractor, FieldRule};

/// Tax ID extractor.
///
/// A labeled 10-15 digit number wins; otherwise any run of 11 digits is
/// taken, which can pick up unrelated numbers (phones, accounts).
pub struct TaxIdExtractor {
    rules: [FieldRule; 2],
}

impl TaxIdExtractor {
    pub fn new() -> Self {
        Self {
            rules: [
                FieldRule::new("labeled", &TAX_ID_LABELED),
                FieldRule::new("bare_11_digits", &TAX_ID_BARE),
            ],
        }
    }
}

impl Default for TaxIdExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for TaxIdExtractor {
    type Output = ExtractionMatch;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        first_match(&self.rules, text)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        all_matches(&self.rules, text)
    }
}

/// Extract the tax ID from text.
pub fn extract_tax_id(text: &str) -> Option<String> {
    TaxIdExtractor::new().extract(text).map(|m| m.value)
}
