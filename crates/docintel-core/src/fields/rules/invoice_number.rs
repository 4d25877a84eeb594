//! Invoice number extraction.

use super::patterns::INVOICE_NUMBER;
use super::FieldRule;
use crate::models::fields::{Field, FieldMatch};

/// Matches "Invoice", "Invoice No:", "invoice # ", "INVOICE NUMBER -" and
/// keeps only the token that follows the label.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvoiceNumberRule;

impl FieldRule for InvoiceNumberRule {
    fn field(&self) -> Field {
        Field::InvoiceNumber
    }

    fn find(&self, text: &str) -> Option<FieldMatch> {
        let token = INVOICE_NUMBER.captures(text)?.get(1)?;
        Some(FieldMatch::new(
            Field::InvoiceNumber,
            token.as_str(),
            token.start(),
            token.end(),
        ))
    }
}

/// Extract the first invoice number from text.
pub fn extract_invoice_number(text: &str) -> Option<String> {
    InvoiceNumberRule.find(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_label_variants() {
        assert_eq!(extract_invoice_number("Invoice No: INV-2023-045"), Some("INV-2023-045".into()));
        assert_eq!(extract_invoice_number("INVOICE # A/17/2024"), Some("A/17/2024".into()));
        assert_eq!(extract_invoice_number("invoice number - 000_12"), Some("000_12".into()));
        assert_eq!(extract_invoice_number("Invoice:98765"), Some("98765".into()));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let text = "Invoice No: FIRST-1\nReplaces invoice no: SECOND-2";
        assert_eq!(extract_invoice_number(text), Some("FIRST-1".into()));
    }

    #[test]
    fn test_label_without_keyword() {
        // The bare word is enough; whatever token follows is taken.
        assert_eq!(extract_invoice_number("Invoice date 2024"), Some("date".into()));
    }

    #[test]
    fn test_no_label() {
        assert_eq!(extract_invoice_number("Receipt 42"), None);
        assert_eq!(extract_invoice_number(""), None);
    }

    #[test]
    fn test_position_covers_token_only() {
        let m = InvoiceNumberRule.find("Invoice No: X-1").unwrap();
        assert_eq!(m.position, (12, 15));
    }
}
