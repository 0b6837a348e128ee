//! Invoice number extraction.

use super::patterns::{INVOICE_NUMBER_ABBREVIATED, INVOICE_NUMBER_LABELED, INVOICE_NUMBER_SERIES};
use super::{all_matches, first_match, ExtractionMatch, FieldExtractor, FieldRule};

/// Invoice number extractor.
///
/// Rules, most specific first: a full label (`factura`, `invoice`,
/// `número`), an abbreviated label (`fact`, `fac`), then a series label
/// (`serie`, `no.`).
pub struct InvoiceNumberExtractor {
    rules: [FieldRule; 3],
}

impl InvoiceNumberExtractor {
    pub fn new() -> Self {
        Self {
            rules: [
                FieldRule::new("labeled", &INVOICE_NUMBER_LABELED),
                FieldRule::new("abbreviated", &INVOICE_NUMBER_ABBREVIATED),
                FieldRule::new("series", &INVOICE_NUMBER_SERIES),
            ],
        }
    }
}

impl Default for InvoiceNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for InvoiceNumberExtractor {
    type Output = ExtractionMatch;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        first_match(&self.rules, text)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        all_matches(&self.rules, text)
    }
}

/// Extract the invoice number from text.
pub fn extract_invoice_number(text: &str) -> Option<String> {
    InvoiceNumberExtractor::new().extract(text).map(|m| m.value)
}
