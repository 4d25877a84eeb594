//! Email address extraction.

use super::patterns::EMAIL;
use super::FieldRule;
use crate::models::fields::{Field, FieldMatch};

/// Email field extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailRule;

impl FieldRule for EmailRule {
    fn field(&self) -> Field {
        Field::Email
    }

    fn find(&self, text: &str) -> Option<FieldMatch> {
        EMAIL
            .find(text)
            .map(|m| FieldMatch::new(Field::Email, m.as_str(), m.start(), m.end()))
    }
}

/// Extract the first email address from text.
pub fn extract_email(text: &str) -> Option<String> {
    EmailRule.find(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_email() {
        assert_eq!(
            extract_email("contact billing@example.com, thanks"),
            Some("billing@example.com".into())
        );
        assert_eq!(
            extract_email("Jane <jane.doe+ap@mail.acme.co.uk>"),
            Some("jane.doe+ap@mail.acme.co.uk".into())
        );
    }

    #[test]
    fn test_requires_two_letter_tld() {
        assert_eq!(extract_email("user@host.c"), None);
        assert_eq!(extract_email("user@localhost"), None);
    }

    #[test]
    fn test_first_occurrence_wins() {
        assert_eq!(
            extract_email("a@one.org or b@two.org"),
            Some("a@one.org".into())
        );
    }
}
