//! Extracted invoice record.
//!
//! Every value is raw text exactly as matched in the OCR output. An empty
//! string means "not found"; the record never carries an error state.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Structured result of extracting one recognized document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceRecord {
    /// Invoice number / series.
    pub invoice_number: String,

    /// Issue date, unvalidated.
    pub date: String,

    /// Issuer name.
    pub company: String,

    /// Issuer tax ID (RUC / NIT).
    pub tax_id: String,

    /// Customer name. No rule populates it yet.
    pub customer: String,

    /// Invoice total, raw numeric text.
    pub total: String,

    /// Subtotal, raw numeric text.
    pub subtotal: String,

    /// Tax amount (IGV / IVA), raw numeric text.
    pub tax: String,

    /// Candidate line item texts in source order.
    pub items: Vec<String>,
}

/// Scalar fields of an [`InvoiceRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    InvoiceNumber,
    Date,
    Company,
    TaxId,
    Customer,
    Total,
    Subtotal,
    Tax,
}

impl Field {
    /// All scalar fields in display order.
    pub const ALL: [Field; 8] = [
        Field::InvoiceNumber,
        Field::Date,
        Field::Company,
        Field::TaxId,
        Field::Customer,
        Field::Total,
        Field::Subtotal,
        Field::Tax,
    ];

    /// Export key.
    pub fn key(self) -> &'static str {
        match self {
            Field::InvoiceNumber => "invoice_number",
            Field::Date => "date",
            Field::Company => "company",
            Field::TaxId => "tax_id",
            Field::Customer => "customer",
            Field::Total => "total",
            Field::Subtotal => "subtotal",
            Field::Tax => "tax",
        }
    }

    /// Key used by the legacy Spanish JSON export.
    pub fn legacy_key(self) -> &'static str {
        match self {
            Field::InvoiceNumber => "numero_factura",
            Field::Date => "fecha",
            Field::Company => "empresa",
            Field::TaxId => "ruc_nit",
            Field::Customer => "cliente",
            Field::Total => "total",
            Field::Subtotal => "subtotal",
            Field::Tax => "igv_iva",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Field::InvoiceNumber => "Invoice number",
            Field::Date => "Date",
            Field::Company => "Company",
            Field::TaxId => "RUC/NIT",
            Field::Customer => "Customer",
            Field::Total => "Total",
            Field::Subtotal => "Subtotal",
            Field::Tax => "IGV/IVA",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl InvoiceRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a scalar field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::InvoiceNumber => &self.invoice_number,
            Field::Date => &self.date,
            Field::Company => &self.company,
            Field::TaxId => &self.tax_id,
            Field::Customer => &self.customer,
            Field::Total => &self.total,
            Field::Subtotal => &self.subtotal,
            Field::Tax => &self.tax,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::InvoiceNumber => &mut self.invoice_number,
            Field::Date => &mut self.date,
            Field::Company => &mut self.company,
            Field::TaxId => &mut self.tax_id,
            Field::Customer => &mut self.customer,
            Field::Total => &mut self.total,
            Field::Subtotal => &mut self.subtotal,
            Field::Tax => &mut self.tax,
        }
    }

    /// Set a field unless it already holds a value.
    ///
    /// Returns `true` when the value was stored. A populated field is never
    /// overwritten.
    pub fn set_if_empty(&mut self, field: Field, value: impl Into<String>) -> bool {
        let slot = self.slot_mut(field);
        if !slot.is_empty() {
            return false;
        }
        *slot = value.into();
        true
    }

    /// Scalar fields with their values, in display order.
    pub fn fields(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::ALL.into_iter().map(move |field| (field, self.get(field)))
    }

    /// Scalar fields that hold a value.
    pub fn populated(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        self.fields().filter(|(_, value)| !value.is_empty())
    }

    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.populated().next().is_none() && self.items.is_empty()
    }

    /// Borrowing view that serializes with the legacy Spanish keys.
    pub fn legacy(&self) -> LegacyRecord<'_> {
        LegacyRecord {
            numero_factura: &self.invoice_number,
            fecha: &self.date,
            empresa: &self.company,
            ruc_nit: &self.tax_id,
            cliente: &self.customer,
            total: &self.total,
            subtotal: &self.subtotal,
            igv_iva: &self.tax,
            items: &self.items,
        }
    }

    /// Consistency checks over the raw values.
    ///
    /// Returns human-readable issues; the record itself is left untouched.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.invoice_number.is_empty() {
            issues.push("Missing invoice number".to_string());
        }

        if self.total.is_empty() {
            issues.push("Missing total".to_string());
        }

        if !self.date.is_empty() && parse_date(&self.date).is_none() {
            issues.push(format!("Date '{}' is not a valid calendar date", self.date));
        }

        for (field, value) in [
            (Field::Total, &self.total),
            (Field::Subtotal, &self.subtotal),
            (Field::Tax, &self.tax),
        ] {
            if !value.is_empty() && parse_amount(value).is_none() {
                issues.push(format!("{} '{}' is not a number", field.label(), value));
            }
        }

        if let (Some(subtotal), Some(tax), Some(total)) = (
            parse_amount(&self.subtotal),
            parse_amount(&self.tax),
            parse_amount(&self.total),
        ) {
            match subtotal.checked_add(tax).and_then(|sum| sum.checked_sub(total)) {
                Some(diff) if diff.abs() > Decimal::new(1, 2) => issues.push(format!(
                    "Subtotal ({}) plus tax ({}) differs from total ({})",
                    subtotal, tax, total
                )),
                Some(_) => {}
                None => issues.push(format!(
                    "Subtotal ({}) plus tax ({}) is too large to compare with total ({})",
                    subtotal, tax, total
                )),
            }
        }

        issues
    }
}

/// Legacy export shape, keyed the way the first version of the tool wrote
/// its JSON downloads.
#[derive(Debug, Serialize)]
pub struct LegacyRecord<'a> {
    pub numero_factura: &'a str,
    pub fecha: &'a str,
    pub empresa: &'a str,
    pub ruc_nit: &'a str,
    pub cliente: &'a str,
    pub total: &'a str,
    pub subtotal: &'a str,
    pub igv_iva: &'a str,
    pub items: &'a [String],
}

/// Parse a raw day-first date (`15/01/2024`, `5-3-24`).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = raw.trim().split(['/', '-']).collect();
    let [day, month, year] = parts.as_slice() else {
        return None;
    };
    let day: u32 = day.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let year = match year.len() {
        2 => parse_two_digit_year(year.parse().ok()?),
        4 => year.parse().ok()?,
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_two_digit_year(year: i32) -> i32 {
    // 00-50 are 2000s, 51-99 are 1900s
    if year <= 50 { 2000 + year } else { 1900 + year }
}

/// Parse a raw comma-grouped amount (`1,234.56`, `99.9`, `1234.`).
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned = raw.trim().replace(',', "");
    let cleaned = cleaned.trim_end_matches('.');
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(cleaned).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> InvoiceRecord {
        InvoiceRecord {
            invoice_number: "F001-00045".to_string(),
            date: "15/01/2024".to_string(),
            company: "Comercial Andina".to_string(),
            tax_id: "20123456789".to_string(),
            customer: String::new(),
            total: "1,180.00".to_string(),
            subtotal: "1,000.00".to_string(),
            tax: "180.00".to_string(),
            items: vec!["Servicio 1 1,000.00".to_string()],
        }
    }

    #[test]
    fn test_set_if_empty_keeps_first_value() {
        let mut record = InvoiceRecord::new();
        assert!(record.set_if_empty(Field::Total, "10.00"));
        assert!(!record.set_if_empty(Field::Total, "20.00"));
        assert_eq!(record.total, "10.00");
    }

    #[test]
    fn test_empty_record() {
        let record = InvoiceRecord::new();
        assert!(record.is_empty());
        assert_eq!(record.populated().count(), 0);
        assert_eq!(record.fields().count(), 8);
    }

    #[test]
    fn test_json_keeps_non_ascii() {
        let mut record = InvoiceRecord::new();
        record.company = "Panadería Señor €".to_string();
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("Panadería Señor €"));
        assert!(json.contains("\"items\":[]"));
    }

    #[test]
    fn test_legacy_keys() {
        let json = serde_json::to_value(sample().legacy()).unwrap();
        assert_eq!(json["numero_factura"], "F001-00045");
        assert_eq!(json["ruc_nit"], "20123456789");
        assert_eq!(json["igv_iva"], "180.00");
        assert_eq!(json["cliente"], "");
        assert_eq!(json["items"][0], "Servicio 1 1,000.00");
    }

    #[test]
    fn test_validate_consistent_record() {
        assert_eq!(sample().validate(), Vec::<String>::new());
    }

    #[test]
    fn test_validate_reports_issues() {
        let mut record = sample();
        record.date = "31/02/2024".to_string();
        record.total = "1,500.00".to_string();
        let issues = record.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues[0].contains("31/02/2024"));
        assert!(issues[1].contains("differs from total"));
        // validation never rewrites values
        assert_eq!(record.total, "1,500.00");
    }

    #[test]
    fn test_validate_huge_amounts_do_not_overflow() {
        let max = "79,228,162,514,264,337,593,543,950,335";
        assert_eq!(parse_amount(max), Some(Decimal::MAX));

        let mut record = sample();
        record.subtotal = max.to_string();
        record.tax = max.to_string();
        record.total = "1.00".to_string();
        let issues = record.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("too large to compare"));
    }

    #[test]
    fn test_validate_missing_fields() {
        let issues = InvoiceRecord::new().validate();
        assert_eq!(issues, vec!["Missing invoice number", "Missing total"]);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("15/01/2024"), NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(parse_date("5-3-24"), NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(parse_date("5-3-99"), NaiveDate::from_ymd_opt(1999, 3, 5));
        assert_eq!(parse_date("1/1/202"), None);
        assert_eq!(parse_date("13/13/2024"), None);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.56"), Some(Decimal::new(123456, 2)));
        assert_eq!(parse_amount("99.9"), Some(Decimal::new(999, 1)));
        assert_eq!(parse_amount("1234."), Some(Decimal::new(1234, 0)));
        assert_eq!(parse_amount(""), None);
    }
}
