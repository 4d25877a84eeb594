//! Field extraction: turns free text into a [`FieldMap`].

pub mod rules;

use tracing::debug;

use crate::models::fields::{FieldMap, FieldMatch};
use rules::{default_rules, FieldRule};

/// Runs a set of independent [`FieldRule`]s over text.
pub struct FieldExtractor {
    rules: Vec<Box<dyn FieldRule>>,
}

impl FieldExtractor {
    /// Create an extractor with the invoice number, amount, email and date
    /// rules.
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// Replace the rule set.
    pub fn with_rules(rules: Vec<Box<dyn FieldRule>>) -> Self {
        Self { rules }
    }

    /// The first match of every rule that fired.
    pub fn explain(&self, text: &str) -> Vec<FieldMatch> {
        self.rules.iter().filter_map(|rule| rule.find(text)).collect()
    }

    /// Extract the field map. Never fails; unmatched fields stay unset.
    pub fn extract(&self, text: &str) -> FieldMap {
        let matches = self.explain(text);
        debug!("Field rules matched {} of {}", matches.len(), self.rules.len());
        FieldMap::from_matches(matches)
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the standard fields from text.
pub fn extract_fields(text: &str) -> FieldMap {
    FieldExtractor::new().extract(text)
}

/// Matches behind [`extract_fields`], with their positions.
pub fn explain_fields(text: &str) -> Vec<FieldMatch> {
    FieldExtractor::new().explain(text)
}
