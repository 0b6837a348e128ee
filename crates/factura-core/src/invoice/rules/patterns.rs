//! Regex patterns for invoice field extraction.
//!
//! Labels cover Spanish and English invoices (Peru / Latin America). Every
//! labeled pattern is case-insensitive and captures the value in group 1.

use lazy_static::lazy_static;
use regex::Regex;

/// Shared tail for labeled amounts: separators, optional currency marker
/// (`S/`, `S`, `/` or `$`), then a comma-grouped number with up to two decimals.
macro_rules! amount_after {
    ($label:literal) => {
        concat!(
            r"(?i)",
            $label,
            r"[:\s]*(?:S/|[S/$])?\s*(\d{1,3}(?:,\d{3})*\.?\d{0,2})"
        )
    };
}

lazy_static! {
    // Invoice number
    pub static ref INVOICE_NUMBER_LABELED: Regex = Regex::new(
        r"(?i)(?:factura|invoice|n[úu]mero?)[:\s#]*([A-Z0-9\-]+)"
    ).unwrap();

    pub static ref INVOICE_NUMBER_ABBREVIATED: Regex = Regex::new(
        r"(?i)(?:fact|fac)[:\s#]*([A-Z0-9\-]+)"
    ).unwrap();

    pub static ref INVOICE_NUMBER_SERIES: Regex = Regex::new(
        r"(?i)(?:serie|no\.?)[:\s]*([A-Z0-9\-]+)"
    ).unwrap();

    // Dates (day first, raw text kept)
    pub static ref DATE_LABELED: Regex = Regex::new(
        r"(?i)(?:fecha|date)[:\s]*(\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4})"
    ).unwrap();

    pub static ref DATE_BARE: Regex = Regex::new(
        r"(\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4})"
    ).unwrap();

    // Tax ID (RUC / NIT)
    pub static ref TAX_ID_LABELED: Regex = Regex::new(
        r"(?i)(?:ruc|nit|tax\s*id)[:\s]*(\d{10,15})"
    ).unwrap();

    // Peruvian RUC is 11 digits
    pub static ref TAX_ID_BARE: Regex = Regex::new(
        r"(\d{11})"
    ).unwrap();

    // Amounts
    pub static ref TOTAL_LABELED: Regex = Regex::new(
        amount_after!(r"(?:total|amount)")
    ).unwrap();

    pub static ref TOTAL_GRAND: Regex = Regex::new(
        amount_after!(r"(?:total\s*general|grand\s*total)")
    ).unwrap();

    pub static ref SUBTOTAL_LABELED: Regex = Regex::new(
        amount_after!(r"(?:subtotal|sub\s*total)")
    ).unwrap();

    pub static ref TAX_AMOUNT_LABELED: Regex = Regex::new(
        amount_after!(r"(?:igv|iva|tax)")
    ).unwrap();

    // Line heuristics
    pub static ref ITEM_AMOUNT: Regex = Regex::new(
        r"\d+[.,]\d{2}"
    ).unwrap();

    pub static ref ANY_DIGIT: Regex = Regex::new(
        r"\d"
    ).unwrap();
}
