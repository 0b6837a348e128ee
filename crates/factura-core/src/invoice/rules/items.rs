//! Line item heuristic.
//!
//! Any line with a two-decimal amount and at least three tokens is kept as
//! a raw item candidate. Dates or phone numbers can slip through; callers
//! get every candidate, in source order, without a cap.

use super::patterns::ITEM_AMOUNT;

/// Minimum whitespace-separated tokens for an item line.
const MIN_ITEM_TOKENS: usize = 3;

/// Whether a line looks like a priced line item.
pub fn is_item_candidate(line: &str) -> bool {
    ITEM_AMOUNT.is_match(line) && line.split_whitespace().count() >= MIN_ITEM_TOKENS
}

/// Collect candidate item lines (trimmed) in source order.
pub fn extract_items<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|line| is_item_candidate(line))
        .map(|line| line.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priced_line_is_item() {
        assert!(is_item_candidate("Widget A  2  19.99"));
        assert!(is_item_candidate("Servicio mensual 1 250,00"));
    }

    #[test]
    fn test_rejects_without_decimal_amount() {
        assert!(!is_item_candidate("Phone: 123"));
        assert!(!is_item_candidate("Cantidad 3 unidades"));
    }

    #[test]
    fn test_rejects_too_few_tokens() {
        assert!(!is_item_candidate("Total: 19.99"));
    }

    #[test]
    fn test_keeps_order_and_duplicates() {
        let lines = [
            "Widget A  2  19.99",
            "Phone: 123",
            "  Widget B 1 5.00  ",
            "Widget A  2  19.99",
        ];
        assert_eq!(
            extract_items(&lines),
            vec!["Widget A  2  19.99", "Widget B 1 5.00", "Widget A  2  19.99"]
        );
    }

    #[test]
    fn test_date_lines_are_false_positives() {
        // 12.03.2024 contains "12.03"
        assert!(is_item_candidate("Emitido el 12.03.2024"));
    }
}
