//! Amount extraction.

use super::patterns::AMOUNT;
use super::FieldRule;
use crate::models::fields::{Field, FieldMatch};

/// Matches an optionally currency-marked number such as `$1,250.00`,
/// `Rs. 12 500` or `INR 99.5`.
///
/// The stored value is the whole trimmed match, marker included. Bare numbers
/// that are glued to a word, an identifier (`INV-2023-045`) or a date
/// (`12/31/2023`) are skipped. A marked amount only needs a non-digit before
/// its marker, so `ab$5` still yields `$5`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmountRule;

impl FieldRule for AmountRule {
    fn field(&self) -> Field {
        Field::Amount
    }

    fn find(&self, text: &str) -> Option<FieldMatch> {
        let mut pos = 0;

        while let Some(m) = AMOUNT.find_at(text, pos) {
            let span = m.as_str();
            let lead = m.start() + (span.len() - span.trim_start().len());
            let end = m.start() + span.trim_end().len();

            if is_free_standing(text, lead, end) {
                return Some(FieldMatch::new(Field::Amount, &text[lead..end], lead, end));
            }

            // Retry from the next character, like a failed lookbehind would.
            pos = m.start()
                + text[m.start()..]
                    .chars()
                    .next()
                    .map(char::len_utf8)
                    .unwrap_or(1);
        }

        None
    }
}

/// Whether the candidate at `start..end` stands on its own rather than being
/// part of a longer token.
fn is_free_standing(text: &str, start: usize, end: usize) -> bool {
    let marked = !text[start..].starts_with(|c: char| c.is_ascii_digit());

    if let Some(prev) = text[..start].chars().next_back() {
        let glued = if marked {
            prev.is_ascii_digit()
        } else {
            prev.is_alphanumeric() || matches!(prev, '-' | '/' | '_' | '.')
        };
        if glued {
            return false;
        }
    }

    // A match can stop inside a longer digit run ("2024" matches as "202").
    let mut rest = text[end..]
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .chars();
    match rest.next() {
        Some('/') => false,
        Some('-') => !rest.next().is_some_and(char::is_alphanumeric),
        _ => true,
    }
}

/// Extract the first amount from text.
pub fn extract_amount(text: &str) -> Option<String> {
    AmountRule.find(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_currency_markers_kept() {
        assert_eq!(extract_amount("Total: $1,250.00"), Some("$1,250.00".into()));
        assert_eq!(extract_amount("Pay Rs. 12 500 now"), Some("Rs. 12 500".into()));
        assert_eq!(extract_amount("Due INR 99.5"), Some("INR 99.5".into()));
        assert_eq!(extract_amount("Amount ₹450"), Some("₹450".into()));
        assert_eq!(extract_amount("USD 10"), Some("USD 10".into()));
    }

    #[test]
    fn test_plain_number() {
        assert_eq!(extract_amount("Total 1,000"), Some("1,000".into()));
        assert_eq!(extract_amount("3.5"), Some("3.5".into()));
    }

    #[test]
    fn test_skips_identifiers_and_dates() {
        let text = "Invoice No: INV-2023-045, dated 12/31/2023, total $1,250.00";
        assert_eq!(extract_amount(text), Some("$1,250.00".into()));

        assert_eq!(extract_amount("Ref AB12 then 2024-01-15 then 75"), Some("75".into()));
        assert_eq!(extract_amount("Order # 77-A, USD 5"), Some("USD 5".into()));
        assert_eq!(extract_amount("Balance 40 - 10"), Some("40".into()));
    }

    #[test]
    fn test_marker_after_letters_is_kept() {
        assert_eq!(extract_amount("ab$5"), Some("$5".into()));
        assert_eq!(extract_amount("TotalUSD 12.50"), Some("USD 12.50".into()));
        assert_eq!(extract_amount("Total:$7"), Some("$7".into()));
    }

    #[test]
    fn test_first_occurrence_wins() {
        assert_eq!(extract_amount("Subtotal $10.00 Total $12.00"), Some("$10.00".into()));
    }

    #[test]
    fn test_long_digit_run_keeps_regex_span() {
        // Without a separator only the leading group of three is matched.
        assert_eq!(extract_amount("Total 12345"), Some("123".into()));
    }

    #[test]
    fn test_no_numbers() {
        assert_eq!(extract_amount("no digits here"), None);
        assert_eq!(extract_amount(""), None);
    }

    #[test]
    fn test_position_excludes_leading_space() {
        let m = AmountRule.find("Total 75").unwrap();
        assert_eq!(m.value, "75");
        assert_eq!(m.position, (6, 8));
    }
}
