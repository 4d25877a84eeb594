//! Structured fields extracted from document text.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The four attributes the field extractor knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    InvoiceNumber,
    Amount,
    Email,
    Date,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::InvoiceNumber, Field::Amount, Field::Email, Field::Date];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::InvoiceNumber => "invoice_number",
            Field::Amount => "amount",
            Field::Email => "email",
            Field::Date => "date",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rule hit: which field, the value stored, and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMatch {
    pub field: Field,
    pub value: String,
    /// Byte offsets of the matched span in the source text.
    pub position: (usize, usize),
}

impl FieldMatch {
    pub fn new(field: Field, value: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            field,
            value: value.into(),
            position: (start, end),
        }
    }
}

/// Result of field extraction. Every attribute is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMap {
    invoice_number: Option<String>,
    amount: Option<String>,
    email: Option<String>,
    date: Option<String>,
}

impl FieldMap {
    /// Assemble a map from rule matches. Later matches for the same field are
    /// ignored.
    pub fn from_matches(matches: impl IntoIterator<Item = FieldMatch>) -> Self {
        let mut map = Self::default();
        for m in matches {
            let slot = match m.field {
                Field::InvoiceNumber => &mut map.invoice_number,
                Field::Amount => &mut map.amount,
                Field::Email => &mut map.email,
                Field::Date => &mut map.date,
            };
            if slot.is_none() {
                *slot = Some(m.value);
            }
        }
        map
    }

    pub fn invoice_number(&self) -> Option<&str> {
        self.invoice_number.as_deref()
    }

    /// The amount exactly as matched, currency marker included.
    pub fn amount(&self) -> Option<&str> {
        self.amount.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::InvoiceNumber => self.invoice_number(),
            Field::Amount => self.amount(),
            Field::Email => self.email(),
            Field::Date => self.date(),
        }
    }

    /// True when no rule matched.
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).is_none())
    }

    /// Numeric reading of the amount, if it parses.
    pub fn amount_value(&self) -> Option<Decimal> {
        self.amount().and_then(parse_amount)
    }
}

/// Parse a matched amount such as "$1,250.00" or "Rs. 12 500" into a decimal.
///
/// Drops the currency marker and the comma/space thousands separators.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let digits = s
        .trim()
        .trim_start_matches("USD")
        .trim_start_matches("INR")
        .trim_start_matches("Rs")
        .trim_start_matches(['.', '₹', '$']);

    let cleaned: String = digits
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}
