//! Text extraction with embedded-text preference and OCR fallback.
//!
//! Dispatch, in order:
//! 1. recognized image types are decoded and OCR'd;
//! 2. PDFs use their embedded text, and only when the whole document yields
//!    none are the pages rasterized and OCR'd;
//! 3. anything else is tried as an image, and rejected as unsupported if it
//!    does not decode or OCR fails on it.
//!
//! For images and PDFs, OCR and rasterization failures never reach the caller.
//! They produce empty text with [`Extraction::backend_unavailable`] set.

use std::time::Instant;

use image::DynamicImage;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{DocintelError, Result};
use crate::models::config::{DocintelConfig, PdfConfig};
use crate::models::document::{MediaType, RawDocument};
use crate::ocr::{create_backend, OcrBackend, TesseractBackend};
use crate::pdf::{LopdfReader, PdfDocument, PdfReader, PdftoppmRasterizer};

/// Where the extracted text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    /// OCR of an image upload.
    Ocr,
    /// Selectable text embedded in a PDF.
    EmbeddedText,
    /// OCR of rasterized PDF pages.
    OcrFallback,
}

/// Text extraction result before it is collapsed to a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub text: String,
    pub source: TextSource,
    /// OCR or rasterization failed and `text` is empty because of it.
    pub backend_unavailable: bool,
}

impl Extraction {
    fn new(text: String, source: TextSource) -> Self {
        Self {
            text,
            source,
            backend_unavailable: false,
        }
    }

    fn degraded(source: TextSource) -> Self {
        Self {
            text: String::new(),
            source,
            backend_unavailable: true,
        }
    }
}

/// Produces text from raw document bytes.
pub struct TextExtractor {
    ocr: Box<dyn OcrBackend>,
    pdf_reader: Box<dyn PdfReader>,
    config: PdfConfig,
}

/// Builder for [`TextExtractor`].
pub struct TextExtractorBuilder {
    ocr: Option<Box<dyn OcrBackend>>,
    pdf_reader: Option<Box<dyn PdfReader>>,
    config: PdfConfig,
}

impl TextExtractorBuilder {
    pub fn new() -> Self {
        Self {
            ocr: None,
            pdf_reader: None,
            config: PdfConfig::default(),
        }
    }

    /// Set the OCR backend.
    pub fn with_ocr(mut self, backend: impl OcrBackend + 'static) -> Self {
        self.ocr = Some(Box::new(backend));
        self
    }

    /// Set the PDF reader.
    pub fn with_pdf_reader(mut self, reader: impl PdfReader + 'static) -> Self {
        self.pdf_reader = Some(Box::new(reader));
        self
    }

    /// Set PDF configuration.
    pub fn with_config(mut self, config: PdfConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the extractor. Unset parts default to tesseract and lopdf.
    pub fn build(self) -> TextExtractor {
        let config = self.config;
        let pdf_reader = self.pdf_reader.unwrap_or_else(|| {
            Box::new(
                LopdfReader::new()
                    .with_rasterizer(PdftoppmRasterizer::new(config.pdftoppm_cmd.clone())),
            )
        });

        TextExtractor {
            ocr: self.ocr.unwrap_or_else(|| Box::new(TesseractBackend::default())),
            pdf_reader,
            config,
        }
    }
}

impl Default for TextExtractorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor {
    /// Create a new builder.
    pub fn builder() -> TextExtractorBuilder {
        TextExtractorBuilder::new()
    }

    /// Extractor wired from configuration.
    pub fn from_config(config: &DocintelConfig) -> Self {
        Self::builder()
            .with_ocr(create_backend(&config.ocr))
            .with_config(config.pdf.clone())
            .build()
    }

    /// Extract text, keeping track of how it was obtained.
    pub fn extract(&self, document: &RawDocument<'_>) -> Result<Extraction> {
        let start = Instant::now();
        let media_type = document.media_type();

        let extraction = match &media_type {
            mt if mt.is_image() => {
                let image = image::load_from_memory(document.bytes).map_err(|e| {
                    DocintelError::CorruptPayload {
                        media_type: media_type.clone(),
                        reason: e.to_string(),
                    }
                })?;
                self.ocr_image(&image)
            }
            MediaType::Pdf => self.extract_pdf(document.bytes)?,
            other => self.ocr_unknown(other, document.bytes)?,
        };

        info!(
            "Extracted {} chars from {} via {:?} in {}ms",
            extraction.text.len(),
            media_type,
            extraction.source,
            start.elapsed().as_millis()
        );

        Ok(extraction)
    }

    /// Extract text only. Empty text is a valid result.
    pub fn extract_text(&self, document: &RawDocument<'_>) -> Result<String> {
        Ok(self.extract(document)?.text)
    }

    fn ocr_image(&self, image: &DynamicImage) -> Extraction {
        match self.ocr.image_to_text(image) {
            Ok(text) => Extraction::new(text, TextSource::Ocr),
            Err(e) => {
                warn!("OCR backend {} failed, returning empty text: {}", self.ocr.name(), e);
                Extraction::degraded(TextSource::Ocr)
            }
        }
    }

    /// Last resort for unrecognized types. Unlike a declared image, an OCR
    /// failure here rejects the input.
    fn ocr_unknown(&self, media_type: &MediaType, bytes: &[u8]) -> Result<Extraction> {
        debug!("Unrecognized media type {}, trying as image", media_type);
        let unsupported = || DocintelError::UnsupportedMediaType(media_type.to_string());

        let image = image::load_from_memory(bytes).map_err(|_| unsupported())?;
        match self.ocr.image_to_text(&image) {
            Ok(text) => Ok(Extraction::new(text, TextSource::Ocr)),
            Err(e) => {
                warn!("OCR of {} payload failed: {}", media_type, e);
                Err(unsupported())
            }
        }
    }

    fn extract_pdf(&self, bytes: &[u8]) -> Result<Extraction> {
        let document = self
            .pdf_reader
            .open(bytes)
            .map_err(|e| DocintelError::CorruptPayload {
                media_type: MediaType::Pdf,
                reason: e.to_string(),
            })?;

        let embedded = self.embedded_text(document.as_ref());
        if !embedded.is_empty() {
            debug!("Using embedded text from {} pages", document.page_count());
            return Ok(Extraction::new(embedded, TextSource::EmbeddedText));
        }

        debug!(
            "No embedded text in {} pages, rasterizing at {} DPI for OCR",
            document.page_count(),
            self.config.render_dpi
        );

        match self.ocr_pages(document.as_ref()) {
            Ok(text) => Ok(Extraction::new(text, TextSource::OcrFallback)),
            Err(reason) => {
                warn!("PDF OCR fallback unavailable, returning empty text: {}", reason);
                Ok(Extraction::degraded(TextSource::OcrFallback))
            }
        }
    }

    /// Phase 1: page texts joined in page order, then trimmed.
    fn embedded_text(&self, document: &dyn PdfDocument) -> String {
        let pages: Vec<String> = document
            .pages()
            .map(|page| {
                page.text().unwrap_or_else(|e| {
                    warn!("No text from page {}: {}", page.number(), e);
                    String::new()
                })
            })
            .collect();

        pages.join(&self.config.page_separator).trim().to_string()
    }

    /// Phase 2: rasterize and OCR every page in order. Any failure aborts the
    /// whole phase.
    fn ocr_pages(&self, document: &dyn PdfDocument) -> std::result::Result<String, String> {
        let mut texts = Vec::with_capacity(document.page_count() as usize);

        for page in document.pages() {
            let image = page
                .rasterize(self.config.render_dpi)
                .map_err(|e| e.to_string())?;
            let text = self
                .ocr
                .image_to_text(&image)
                .map_err(|e| format!("page {}: {}", page.number(), e))?;
            texts.push(text);
        }

        Ok(texts.join(&self.config.page_separator).trim().to_string())
    }
}
