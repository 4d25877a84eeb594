//! Rule-based field extractors.
//!
//! Each rule is a first-match-wins search over the whole text and knows
//! nothing about the others.

pub mod amounts;
pub mod dates;
pub mod email;
pub mod invoice_number;
pub mod patterns;

pub use amounts::{extract_amount, AmountRule};
pub use dates::{extract_date, DateRule};
pub use email::{extract_email, EmailRule};
pub use invoice_number::{extract_invoice_number, InvoiceNumberRule};

use crate::models::fields::{Field, FieldMatch};

/// Trait for single-field rules.
pub trait FieldRule {
    /// The field this rule populates.
    fn field(&self) -> Field;

    /// First match in text order, if any.
    fn find(&self, text: &str) -> Option<FieldMatch>;
}

/// The standard rule set, in field order.
pub fn default_rules() -> Vec<Box<dyn FieldRule>> {
    vec![
        Box::new(InvoiceNumberRule),
        Box::new(AmountRule),
        Box::new(EmailRule),
        Box::new(DateRule),
    ]
}
