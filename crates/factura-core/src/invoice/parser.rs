//! Rule-based invoice extractor.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::models::invoice::{Field, InvoiceRecord};
use crate::ocr::RecognizedText;

use super::rules::{
    extract_items, AmountExtractor, AmountKind, CompanyExtractor, DateExtractor,
    ExtractionMatch, FieldExtractor, InvoiceNumberExtractor, TaxIdExtractor,
};
use super::InvoiceExtractor;

/// Result of invoice extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Extracted invoice data.
    pub record: InvoiceRecord,
    /// Full recognized text, verbatim.
    pub raw_text: String,
    /// Which rule produced each populated field.
    pub provenance: Vec<FieldProvenance>,
    /// Validation and ambiguity warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// How a field got its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldProvenance {
    pub field: Field,
    /// The winning match.
    pub matched: ExtractionMatch,
    /// Lower-priority rules that also matched.
    pub alternatives: Vec<ExtractionMatch>,
}

impl FieldProvenance {
    /// A lower-priority rule would have produced a different value.
    pub fn is_ambiguous(&self) -> bool {
        self.alternatives
            .iter()
            .any(|alt| alt.value != self.matched.value)
    }
}

/// Extractors for the pattern-table fields, in record order.
fn scalar_extractors() -> [(Field, Box<dyn FieldExtractor<Output = ExtractionMatch>>); 6] {
    [
        (Field::InvoiceNumber, Box::new(InvoiceNumberExtractor::new())),
        (Field::Date, Box::new(DateExtractor::new())),
        (Field::TaxId, Box::new(TaxIdExtractor::new())),
        (Field::Total, Box::new(AmountExtractor::new(AmountKind::Total))),
        (Field::Subtotal, Box::new(AmountExtractor::new(AmountKind::Subtotal))),
        (Field::Tax, Box::new(AmountExtractor::new(AmountKind::Tax))),
    ]
}

fn provenance_of(field: Field, mut candidates: Vec<ExtractionMatch>) -> Option<FieldProvenance> {
    if candidates.is_empty() {
        return None;
    }
    let matched = candidates.remove(0);
    Some(FieldProvenance {
        field,
        matched,
        alternatives: candidates,
    })
}

/// Extract a record and the provenance of every populated field.
///
/// `full_text` is searched by the pattern tables; `lines` feed the company
/// and line item heuristics and must be in reading order.
pub fn extract_with_provenance<S: AsRef<str>>(
    full_text: &str,
    lines: &[S],
) -> (InvoiceRecord, Vec<FieldProvenance>) {
    let mut record = InvoiceRecord::new();
    let mut provenance = Vec::new();

    for (field, extractor) in scalar_extractors() {
        if let Some(found) = provenance_of(field, extractor.extract_all(full_text)) {
            debug!("{}: '{}' via rule '{}'", field, found.matched.value, found.matched.rule);
            record.set_if_empty(field, found.matched.value.clone());
            provenance.push(found);
        }
    }

    let company = CompanyExtractor::new().extract_all_from_lines(lines);
    if let Some(found) = provenance_of(Field::Company, company) {
        debug!("company: '{}' from line {:?}", found.matched.value, found.matched.line);
        record.set_if_empty(Field::Company, found.matched.value.clone());
        provenance.push(found);
    }

    record.items = extract_items(lines);

    (record, provenance)
}

/// Extract a record from the full text and its lines.
pub fn extract<S: AsRef<str>>(full_text: &str, lines: &[S]) -> InvoiceRecord {
    extract_with_provenance(full_text, lines).0
}

/// Extract a record from recognized OCR text.
pub fn extract_text(text: &RecognizedText) -> InvoiceRecord {
    extract(text.full_text(), text.lines())
}

/// Rule-based extractor with optional record validation.
pub struct RuleBasedExtractor {
    /// Whether to run consistency checks on the record.
    validate: bool,
    /// Whether to warn when a lower-priority rule disagrees.
    report_ambiguity: bool,
}

impl RuleBasedExtractor {
    /// Create a new extractor with default settings.
    pub fn new() -> Self {
        Self {
            validate: false,
            report_ambiguity: true,
        }
    }

    /// Set record validation.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Set ambiguity reporting.
    pub fn with_ambiguity_report(mut self, report: bool) -> Self {
        self.report_ambiguity = report;
        self
    }
}

impl Default for RuleBasedExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceExtractor for RuleBasedExtractor {
    fn extract(&self, text: &RecognizedText) -> ExtractionResult {
        let start = Instant::now();

        let (record, provenance) = extract_with_provenance(text.full_text(), text.lines());

        let mut warnings = Vec::new();
        if self.report_ambiguity {
            for found in provenance.iter().filter(|p| p.is_ambiguous()) {
                let others: Vec<&str> = found
                    .alternatives
                    .iter()
                    .map(|alt| alt.value.as_str())
                    .filter(|value| *value != found.matched.value)
                    .collect();
                warnings.push(format!(
                    "{} is ambiguous: kept '{}' ({}), other candidates: {}",
                    found.field.label(),
                    found.matched.value,
                    found.matched.rule,
                    others.join(", ")
                ));
            }
        }
        if self.validate {
            warnings.extend(record.validate());
        }

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            "Extracted {} fields and {} items in {}ms",
            record.populated().count(),
            record.items.len(),
            processing_time_ms
        );

        ExtractionResult {
            record,
            raw_text: text.full_text().to_string(),
            provenance,
            warnings,
            processing_time_ms,
        }
    }
}
