//! Company (issuer) name heuristic.

use super::patterns::ANY_DIGIT;
use super::{ExtractionMatch, FieldExtractor};

/// How many leading lines are considered for the company name.
pub const COMPANY_SCAN_LINES: usize = 5;

/// Minimum trimmed length, exclusive, for a line to count as a name.
const MIN_NAME_CHARS: usize = 5;

/// Company name extractor.
///
/// The issuer name is usually printed at the top of the document, above any
/// numbers, so the first early line with text but no digits is taken.
pub struct CompanyExtractor;

impl CompanyExtractor {
    pub fn new() -> Self {
        Self
    }

    fn candidates<'a, S: AsRef<str> + 'a>(
        lines: &'a [S],
    ) -> impl Iterator<Item = ExtractionMatch> + 'a {
        lines
            .iter()
            .take(COMPANY_SCAN_LINES)
            .map(AsRef::<str>::as_ref)
            .enumerate()
            .filter(|(_, line)| is_name_line(line))
            .map(|(index, line)| ExtractionMatch::new(line.trim(), "first_text_line", 0).with_line(index))
    }

    /// First qualifying line among the leading lines.
    pub fn extract_from_lines<S: AsRef<str>>(&self, lines: &[S]) -> Option<ExtractionMatch> {
        Self::candidates(lines).next()
    }

    /// Every qualifying line among the leading lines.
    pub fn extract_all_from_lines<S: AsRef<str>>(&self, lines: &[S]) -> Vec<ExtractionMatch> {
        Self::candidates(lines).collect()
    }
}

impl Default for CompanyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CompanyExtractor {
    type Output = ExtractionMatch;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let lines: Vec<&str> = text.split('\n').collect();
        self.extract_from_lines(&lines)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let lines: Vec<&str> = text.split('\n').collect();
        self.extract_all_from_lines(&lines)
    }
}

fn is_name_line(line: &str) -> bool {
    line.trim().chars().count() > MIN_NAME_CHARS && !ANY_DIGIT.is_match(line)
}

/// Extract the company name from the leading lines.
pub fn extract_company<S: AsRef<str>>(lines: &[S]) -> Option<String> {
    CompanyExtractor::new().extract_from_lines(lines).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_text_line_wins() {
        let lines = ["ACME CORP", "RUC: 12345678901", "Distribuidora Sur"];
        assert_eq!(extract_company(&lines).as_deref(), Some("ACME CORP"));
    }

    #[test]
    fn test_skips_short_and_numeric_lines() {
        let lines = ["S.A.", "  ", "Av. Lima 123", "  Comercial Andina  "];
        let found = CompanyExtractor::new().extract_from_lines(&lines).unwrap();
        assert_eq!(found.value, "Comercial Andina");
        assert_eq!(found.line, Some(3));
    }

    #[test]
    fn test_only_first_five_lines() {
        let lines = ["1", "2", "3", "4", "5", "Late Company Name"];
        assert_eq!(extract_company(&lines), None);
    }

    #[test]
    fn test_length_counts_characters() {
        // six characters, more than six bytes
        assert_eq!(extract_company(&["Ñandúé"]).as_deref(), Some("Ñandúé"));
        assert_eq!(extract_company(&["Ñandú"]), None);
    }

    #[test]
    fn test_extract_from_text() {
        let found = CompanyExtractor::new().extract("12\nLibrería Central\n").unwrap();
        assert_eq!(found.value, "Librería Central");
        assert_eq!(found.line, Some(1));
    }

    #[test]
    fn test_empty() {
        let lines: [&str; 0] = [];
        assert_eq!(extract_company(&lines), None);
    }
}
