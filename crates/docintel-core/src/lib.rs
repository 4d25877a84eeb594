//! Core library for document intelligence.
//!
//! This crate provides:
//! - Text extraction from images (OCR) and PDFs (embedded text with an OCR
//!   fallback for scanned documents)
//! - Pattern-based field extraction (invoice number, amount, email, date)
//! - Pluggable OCR backends and PDF readers

pub mod error;
pub mod fields;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod text;

pub use error::{DocintelError, Result};
pub use fields::{explain_fields, extract_fields, FieldExtractor};
pub use models::config::DocintelConfig;
pub use models::document::{MediaType, RawDocument};
pub use models::fields::{Field, FieldMap, FieldMatch};
pub use ocr::{create_backend, OcrBackend};
pub use pdf::{LopdfReader, PdfDocument, PdfPage, PdfReader};
pub use pipeline::{DocumentPipeline, ProcessedDocument};
pub use text::{Extraction, TextExtractor, TextSource};
