//! Amount extraction for invoices.
//!
//! Amounts stay as raw text (`1,234.56`, `1234`, `99.9`); nothing here
//! parses, rounds or normalizes them.

use super::patterns::{SUBTOTAL_LABELED, TAX_AMOUNT_LABELED, TOTAL_GRAND, TOTAL_LABELED};
use super::{all_matches, first_match, ExtractionMatch, FieldExtractor, FieldRule};

/// Which labeled amount to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountKind {
    /// Invoice total (`total`, `amount`, `total general`, `grand total`).
    Total,
    /// Subtotal before tax.
    Subtotal,
    /// Tax amount (`igv`, `iva`, `tax`).
    Tax,
}

/// Labeled amount extractor.
pub struct AmountExtractor {
    rules: Vec<FieldRule>,
}

impl AmountExtractor {
    pub fn new(kind: AmountKind) -> Self {
        let rules = match kind {
            // "total" also matches inside "total general", so the grand
            // total rule only decides when the plain label finds no amount.
            AmountKind::Total => vec![
                FieldRule::new("labeled", &TOTAL_LABELED),
                FieldRule::new("grand_total", &TOTAL_GRAND),
            ],
            AmountKind::Subtotal => vec![FieldRule::new("labeled", &SUBTOTAL_LABELED)],
            AmountKind::Tax => vec![FieldRule::new("labeled", &TAX_AMOUNT_LABELED)],
        };
        Self { rules }
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        first_match(&self.rules, text)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        all_matches(&self.rules, text)
    }
}

/// Extracted amounts from an invoice.
#[derive(Debug, Clone, Default)]
pub struct InvoiceAmounts {
    /// Invoice total.
    pub total: Option<ExtractionMatch>,
    /// Subtotal.
    pub subtotal: Option<ExtractionMatch>,
    /// Tax (IGV / IVA).
    pub tax: Option<ExtractionMatch>,
}

/// Extract all labeled amounts from invoice text.
pub fn extract_amounts(text: &str) -> InvoiceAmounts {
    InvoiceAmounts {
        total: AmountExtractor::new(AmountKind::Total).extract(text),
        subtotal: AmountExtractor::new(AmountKind::Subtotal).extract(text),
        tax: AmountExtractor::new(AmountKind::Tax).extract(text),
    }
}
