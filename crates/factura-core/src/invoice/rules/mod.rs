//! Rule-based field extractors for Spanish/English invoices.
//!
//! Every scalar field owns an ordered list of [`FieldRule`]s. The first rule
//! that matches anywhere in the text decides the value; later rules are only
//! consulted by [`FieldExtractor::extract_all`] to report ambiguity.

pub mod amounts;
pub mod company;
pub mod dates;
pub mod invoice_number;
pub mod items;
pub mod patterns;
pub mod tax_id;

pub use amounts::{extract_amounts, AmountExtractor, AmountKind, InvoiceAmounts};
pub use company::{extract_company, CompanyExtractor, COMPANY_SCAN_LINES};
pub use dates::{extract_date, DateExtractor};
pub use invoice_number::{extract_invoice_number, InvoiceNumberExtractor};
pub use items::{extract_items, is_item_candidate};
pub use tax_id::{extract_tax_id, TaxIdExtractor};

use regex::Regex;
use serde::Serialize;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract every candidate for the field, in rule priority order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// One entry in a field's ordered pattern table.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Short name of the rule, reported in provenance.
    pub name: &'static str,
    /// Pattern whose first capture group is the field value.
    pub pattern: &'static Regex,
}

impl FieldRule {
    pub const fn new(name: &'static str, pattern: &'static Regex) -> Self {
        Self { name, pattern }
    }
}

/// A field value together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionMatch {
    /// Extracted value (trimmed).
    pub value: String,
    /// Name of the rule that produced the value.
    pub rule: &'static str,
    /// Position of the rule in its field's table (0 = most specific).
    pub rule_index: usize,
    /// Byte span of the captured value in the searched text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<(usize, usize)>,
    /// Index of the source line, for line-based heuristics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl ExtractionMatch {
    pub fn new(value: impl Into<String>, rule: &'static str, rule_index: usize) -> Self {
        Self {
            value: value.into(),
            rule,
            rule_index,
            position: None,
            line: None,
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

/// Apply a single rule: first match anywhere in `text`, group 1 trimmed.
fn apply_rule(index: usize, rule: &FieldRule, text: &str) -> Option<ExtractionMatch> {
    let caps = rule.pattern.captures(text)?;
    let group = caps.get(1)?;
    Some(
        ExtractionMatch::new(group.as_str().trim(), rule.name, index)
            .with_position(group.start(), group.end()),
    )
}

/// First-match-wins over an ordered rule table.
pub fn first_match(rules: &[FieldRule], text: &str) -> Option<ExtractionMatch> {
    rules
        .iter()
        .enumerate()
        .find_map(|(index, rule)| apply_rule(index, rule, text))
}

/// The first match of every rule in the table that matches at all.
pub fn all_matches(rules: &[FieldRule], text: &str) -> Vec<ExtractionMatch> {
    rules
        .iter()
        .enumerate()
        .filter_map(|(index, rule)| apply_rule(index, rule, text))
        .collect()
}
