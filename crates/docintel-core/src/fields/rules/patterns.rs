//! Compiled regex patterns for field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "Invoice", optional "no"/"#"/"number", optional ":" or "-", then the token
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)invoice\s*(?:no|#|number)?\s*[:\-]?\s*([A-Za-z0-9\-_/]+)"
    ).unwrap();

    // Optional currency marker, optional whitespace, thousands-grouped number
    pub static ref AMOUNT: Regex = Regex::new(
        r"(?:USD|INR|Rs\.?|₹|\$)?\s?[0-9]{1,3}(?:[, ]?[0-9]{3})*(?:\.[0-9]{1,2})?"
    ).unwrap();

    pub static ref EMAIL: Regex = Regex::new(
        r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}"
    ).unwrap();

    // D[D]/M[M]/YY[YY] or YYYY/M[M]/D[D], slash or dash
    pub static ref DATE: Regex = Regex::new(
        r"\b(\d{1,2}[/-]\d{1,2}[/-]\d{2,4}|\d{4}[/-]\d{1,2}[/-]\d{1,2})\b"
    ).unwrap();
}
