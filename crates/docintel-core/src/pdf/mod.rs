//! PDF reading module.

mod extractor;
mod raster;

pub use extractor::{LopdfDocument, LopdfReader};
pub use raster::PdftoppmRasterizer;

#[cfg(test)]
pub(crate) use extractor::tests::{build_pdf, build_pdf_with_missing_font};

use crate::error::PdfError;
use image::DynamicImage;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Opens PDF payloads.
pub trait PdfReader {
    /// Parse the payload. Fails when the bytes are not a readable PDF.
    fn open(&self, data: &[u8]) -> Result<Box<dyn PdfDocument>>;
}

/// An opened PDF. Page numbers are 1-indexed.
pub trait PdfDocument {
    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Embedded/selectable text of a page; empty when the page has none.
    fn page_text(&self, page: u32) -> Result<String>;

    /// Render a page as an image at the specified DPI.
    fn rasterize(&self, page: u32, dpi: u32) -> Result<DynamicImage>;
}

impl dyn PdfDocument + '_ {
    /// Pages in document order.
    pub fn pages(&self) -> impl Iterator<Item = PdfPage<'_>> + '_ {
        (1..=self.page_count()).map(move |number| PdfPage {
            document: self,
            number,
        })
    }
}

/// Handle to one page of an opened document.
#[derive(Clone, Copy)]
pub struct PdfPage<'a> {
    document: &'a dyn PdfDocument,
    number: u32,
}

impl PdfPage<'_> {
    /// Page number (1-indexed).
    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn text(&self) -> Result<String> {
        self.document.page_text(self.number)
    }

    pub fn rasterize(&self, dpi: u32) -> Result<DynamicImage> {
        self.document.rasterize(self.number, dpi)
    }
}
