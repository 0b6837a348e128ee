//! Invoice field extraction module.

mod parser;
pub mod rules;

pub use parser::{
    extract, extract_text, extract_with_provenance, ExtractionResult, FieldProvenance,
    RuleBasedExtractor,
};

use crate::ocr::RecognizedText;

/// Trait for invoice field extractors.
///
/// Extraction is total: any input, including empty or non-invoice text,
/// produces a (possibly sparse) result.
pub trait InvoiceExtractor {
    /// Extract invoice data from recognized OCR text.
    fn extract(&self, text: &RecognizedText) -> ExtractionResult;

    /// Extract invoice data from plain text, one OCR line per text line.
    fn extract_from_text(&self, text: &str) -> ExtractionResult {
        self.extract(&RecognizedText::from_plain_text(text))
    }
}
