//! Date extraction for invoices.
//!
//! Dates are kept as the raw matched text; calendar validation happens
//! separately in [`crate::models::invoice::InvoiceRecord::validate`].

use super::patterns::{DATE_BARE, DATE_LABELED};
use super::{all_matches, first_match, ExtractionMatch, FieldExtractor, FieldRule};

/// Date field extractor.
pub struct DateExtractor {
    rules: [FieldRule; 2],
}

impl DateExtractor {
    pub fn new() -> Self {
        Self {
            rules: [
                FieldRule::new("labeled", &DATE_LABELED),
                FieldRule::new("bare", &DATE_BARE),
            ],
        }
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        first_match(&self.rules, text)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        all_matches(&self.rules, text)
    }
}

/// Extract the invoice date from text.
pub fn extract_date(text: &str) -> Option<String> {
    DateExtractor::new().extract(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_labeled_date() {
        let text = "Vence 30/01/2024\nFecha: 15/01/2024";
        let found = DateExtractor::new().extract(text).unwrap();
        assert_eq!(found.value, "15/01/2024");
        assert_eq!(found.rule, "labeled");
    }

    #[test]
    fn test_extract_bare_date() {
        let found = DateExtractor::new().extract("Emitido el 5-3-24 en Lima").unwrap();
        assert_eq!(found.value, "5-3-24");
        assert_eq!(found.rule, "bare");
    }

    #[test]
    fn test_date_is_not_validated() {
        assert_eq!(extract_date("date: 99/99/9999").as_deref(), Some("99/99/9999"));
    }

    #[test]
    fn test_extract_all_lists_both_rules() {
        let text = "Vence 30/01/2024\nFecha: 15/01/2024";
        let found = DateExtractor::new().extract_all(text);
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].value, "30/01/2024");
    }

    #[test]
    fn test_no_date() {
        assert_eq!(extract_date("Total: 100.00"), None);
    }
}
