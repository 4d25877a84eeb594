//! Error types for the docintel-core library.

use thiserror::Error;

use crate::models::document::MediaType;

/// Main error type for the docintel library.
///
/// Only the input-rejection variants ever reach a caller of the text
/// extractor; OCR and rasterization failures are absorbed there.
#[derive(Error, Debug)]
pub enum DocintelError {
    /// The declared type is neither an image nor PDF, and the bytes do not
    /// decode as an image either.
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// The bytes cannot be parsed as the declared type.
    #[error("corrupt {media_type} payload: {reason}")]
    CorruptPayload { media_type: MediaType, reason: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl DocintelError {
    /// Whether the error is a rejection of the input itself rather than an
    /// environment problem.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedMediaType(_) | Self::CorruptPayload { .. }
        )
    }
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is encrypted and cannot be opened with an empty password.
    #[error("PDF is encrypted")]
    Encrypted,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// Failed to turn a page into a bitmap.
    #[error("failed to rasterize page {page}: {reason}")]
    Rasterize { page: u32, reason: String },
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The backend is not installed or not configured.
    #[error("OCR backend unavailable: {0}")]
    Unavailable(String),

    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Result type for the docintel library.
pub type Result<T> = std::result::Result<T, DocintelError>;
