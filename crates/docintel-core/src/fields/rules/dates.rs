//! Date extraction.

use super::patterns::DATE;
use super::FieldRule;
use crate::models::fields::{Field, FieldMatch};

/// Matches `D[D]/M[M]/YY[YY]` or `YYYY/M[M]/D[D]` with `/` or `-`.
///
/// The text is returned as written; no calendar check is made, so
/// `31/02/2023` is a valid hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRule;

impl FieldRule for DateRule {
    fn field(&self) -> Field {
        Field::Date
    }

    fn find(&self, text: &str) -> Option<FieldMatch> {
        let date = DATE.captures(text)?.get(1)?;
        Some(FieldMatch::new(
            Field::Date,
            date.as_str(),
            date.start(),
            date.end(),
        ))
    }
}

/// Extract the first date from text.
pub fn extract_date(text: &str) -> Option<String> {
    DateRule.find(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_day_first_and_month_first() {
        assert_eq!(extract_date("due 12/31/2023"), Some("12/31/2023".into()));
        assert_eq!(extract_date("on 5-1-24."), Some("5-1-24".into()));
    }

    #[test]
    fn test_year_first() {
        assert_eq!(extract_date("Issued 2024-01-15"), Some("2024-01-15".into()));
        assert_eq!(extract_date("Issued 2024/1/5"), Some("2024/1/5".into()));
    }

    #[test]
    fn test_no_calendar_validation() {
        assert_eq!(extract_date("31/02/2023"), Some("31/02/2023".into()));
    }

    #[test]
    fn test_mixed_separators_allowed() {
        assert_eq!(extract_date("12/31-2023"), Some("12/31-2023".into()));
    }

    #[test]
    fn test_rejects_dotted_and_partial() {
        assert_eq!(extract_date("15.01.2024"), None);
        assert_eq!(extract_date("12/31"), None);
        assert_eq!(extract_date("INV-2023-045"), None);
    }
}
