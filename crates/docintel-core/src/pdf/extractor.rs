//! PDF text extraction and page rasterization using lopdf and pdf-extract.

use image::{DynamicImage, GenericImageView, ImageBuffer, Rgba};
use lopdf::{Document, Object, ObjectId};
use tracing::{debug, trace, warn};

use super::{PdfDocument, PdfReader, PdftoppmRasterizer, Result};
use crate::error::PdfError;

/// [`PdfReader`] backed by lopdf for structure and pdf-extract for text.
#[derive(Debug, Clone, Default)]
pub struct LopdfReader {
    rasterizer: PdftoppmRasterizer,
}

impl LopdfReader {
    /// Create a new PDF reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific rasterizer for the OCR fallback.
    pub fn with_rasterizer(mut self, rasterizer: PdftoppmRasterizer) -> Self {
        self.rasterizer = rasterizer;
        self
    }

    /// Open a document with concrete type.
    pub fn load(&self, data: &[u8]) -> Result<LopdfDocument> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        let raw_data = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            decrypted_data
        } else {
            data.to_vec()
        };

        let page_count = doc.get_pages().len() as u32;

        let page_texts = extract_page_texts(&raw_data).unwrap_or_else(|e| {
            warn!("Treating pages as textless: {}", e);
            Vec::new()
        });

        debug!(
            "Loaded PDF with {} pages ({} with text layer output)",
            page_count,
            page_texts.len()
        );

        Ok(LopdfDocument {
            document: doc,
            raw_data,
            page_texts,
            page_count,
            rasterizer: self.rasterizer.clone(),
        })
    }
}

impl PdfReader for LopdfReader {
    fn open(&self, data: &[u8]) -> Result<Box<dyn PdfDocument>> {
        Ok(Box::new(self.load(data)?))
    }
}

/// A PDF opened by [`LopdfReader`].
pub struct LopdfDocument {
    document: Document,
    raw_data: Vec<u8>,
    page_texts: Vec<String>,
    page_count: u32,
    rasterizer: PdftoppmRasterizer,
}

impl LopdfDocument {
    fn check_page(&self, page: u32) -> Result<()> {
        if page == 0 || page > self.page_count {
            return Err(PdfError::InvalidPage(page));
        }
        Ok(())
    }

    /// Decode the image XObjects placed on a page.
    pub fn page_images(&self, page: u32) -> Result<Vec<DynamicImage>> {
        self.check_page(page)?;
        let doc = &self.document;

        let pages = doc.get_pages();
        let page_id = pages.get(&page).ok_or(PdfError::InvalidPage(page))?;

        let mut images = Vec::new();

        if let Some(resources) = get_page_resources(doc, *page_id) {
            if let Ok(xobjects) = resources.get(b"XObject") {
                if let Ok((_, Object::Dictionary(xobj_dict))) = doc.dereference(xobjects) {
                    for (_name, obj_ref) in xobj_dict.iter() {
                        if let Ok((_, obj)) = doc.dereference(obj_ref) {
                            if let Some(img) = try_extract_image_from_object(doc, obj) {
                                images.push(img);
                            }
                        }
                    }
                }
            }
        }

        debug!("Extracted {} images from page {}", images.len(), page);
        Ok(images)
    }

    /// The largest embedded image on the page, which for a scanned page is the
    /// scan itself.
    fn largest_page_image(&self, page: u32) -> Result<DynamicImage> {
        self.page_images(page)?
            .into_iter()
            .max_by_key(|img| {
                let (w, h) = img.dimensions();
                u64::from(w) * u64::from(h)
            })
            .ok_or_else(|| PdfError::Rasterize {
                page,
                reason: "no decodable images on page".to_string(),
            })
    }
}

impl PdfDocument for LopdfDocument {
    fn page_count(&self) -> u32 {
        self.page_count
    }

    fn page_text(&self, page: u32) -> Result<String> {
        self.check_page(page)?;
        Ok(self
            .page_texts
            .get((page - 1) as usize)
            .cloned()
            .unwrap_or_default())
    }

    fn rasterize(&self, page: u32, dpi: u32) -> Result<DynamicImage> {
        self.check_page(page)?;

        match self.rasterizer.render(&self.raw_data, page, dpi) {
            Ok(image) => Ok(image),
            Err(e) => {
                debug!("Falling back to embedded page image: {}", e);
                self.largest_page_image(page)
            }
        }
    }
}

/// Per-page text via pdf-extract. Fonts missing from `/Resources` make it
/// panic rather than return an error, so both count as a failure here.
fn extract_page_texts(data: &[u8]) -> Result<Vec<String>> {
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(data)
    }));

    match outcome {
        Ok(Ok(texts)) => Ok(texts),
        Ok(Err(e)) => Err(PdfError::TextExtraction(e.to_string())),
        Err(panic) => {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "pdf-extract panicked".to_string());
            Err(PdfError::TextExtraction(reason))
        }
    }
}

fn try_extract_image_from_object(doc: &Document, obj: &Object) -> Option<DynamicImage> {
    let Object::Stream(stream) = obj else {
        return None;
    };
    let dict = &stream.dict;

    // Check if it's an image XObject
    let subtype = dict.get(b"Subtype").ok()?;
    if subtype.as_name().ok()? != b"Image" {
        return None;
    }

    let width = dict.get(b"Width").ok()?.as_i64().ok()? as u32;
    let height = dict.get(b"Height").ok()?.as_i64().ok()? as u32;

    trace!("Found image object: {}x{}", width, height);

    let data = match stream.decompressed_content() {
        Ok(d) => d,
        Err(_) => stream.content.clone(),
    };

    if let Ok(filter) = dict.get(b"Filter") {
        let filter_name = match filter {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(arr) if !arr.is_empty() => arr.first().and_then(|o| o.as_name().ok()),
            _ => None,
        };

        match filter_name {
            Some(b"DCTDecode") => {
                // JPEG data, already compressed
                return image::load_from_memory_with_format(
                    &stream.content,
                    image::ImageFormat::Jpeg,
                )
                .ok();
            }
            Some(b"JPXDecode") | Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
                trace!("Skipping unsupported image filter");
                return None;
            }
            _ => {}
        }
    }

    let color_space = dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|o| match o {
            Object::Name(name) => Some(name.as_slice()),
            Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
            Object::Reference(r) => doc.get_object(*r).ok().and_then(|o| o.as_name().ok()),
            _ => None,
        })
        .unwrap_or(b"DeviceRGB");

    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(8) as u8;

    create_image_from_raw(&data, width, height, color_space, bits)
}

fn create_image_from_raw(
    data: &[u8],
    width: u32,
    height: u32,
    color_space: &[u8],
    bits_per_component: u8,
) -> Option<DynamicImage> {
    if bits_per_component != 8 {
        trace!("Unsupported bits per component: {}", bits_per_component);
        return None;
    }

    let pixels = (width as usize) * (height as usize);
    let channels = match color_space {
        b"DeviceRGB" | b"RGB" => 3,
        b"DeviceGray" | b"G" => 1,
        _ => return None,
    };

    if data.len() < pixels * channels {
        trace!(
            "Image data too short: {} bytes for {}x{}x{}",
            data.len(),
            width,
            height,
            channels
        );
        return None;
    }

    let mut rgba_data = Vec::with_capacity(pixels * 4);
    for px in data[..pixels * channels].chunks_exact(channels) {
        match px {
            [r, g, b] => rgba_data.extend_from_slice(&[*r, *g, *b, 255]),
            [gray] => rgba_data.extend_from_slice(&[*gray, *gray, *gray, 255]),
            _ => unreachable!(),
        }
    }

    ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rgba_data).map(DynamicImage::ImageRgba8)
}

/// Resources dictionary for a page, following inheritance up the page tree.
fn get_page_resources(doc: &Document, node_id: ObjectId) -> Option<lopdf::Dictionary> {
    let Object::Dictionary(dict) = doc.get_object(node_id).ok()? else {
        return None;
    };

    if let Ok(resources) = dict.get(b"Resources") {
        if let Ok((_, Object::Dictionary(res_dict))) = doc.dereference(resources) {
            return Some(res_dict.clone());
        }
    }

    match dict.get(b"Parent") {
        Ok(Object::Reference(parent_id)) => get_page_resources(doc, *parent_id),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Stream};

    /// Build a PDF with one page per entry. `Some(text)` pages get a text
    /// operator, `None` pages get a 4x2 grayscale image.
    pub(crate) fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });

        let mut kids = Vec::new();
        for page in pages {
            let (content, resources) = match page {
                Some(text) => (
                    Content {
                        operations: vec![
                            Operation::new("BT", vec![]),
                            Operation::new("Tf", vec!["F1".into(), 24.into()]),
                            Operation::new("Td", vec![72.into(), 700.into()]),
                            Operation::new("Tj", vec![Object::string_literal(*text)]),
                            Operation::new("ET", vec![]),
                        ],
                    },
                    dictionary! { "Font" => dictionary! { "F1" => font_id } },
                ),
                None => {
                    let image_id = doc.add_object(Stream::new(
                        dictionary! {
                            "Type" => "XObject",
                            "Subtype" => "Image",
                            "Width" => 4,
                            "Height" => 2,
                            "ColorSpace" => "DeviceGray",
                            "BitsPerComponent" => 8,
                        },
                        vec![0, 64, 128, 255, 255, 128, 64, 0],
                    ));
                    (
                        Content {
                            operations: vec![
                                Operation::new("q", vec![]),
                                Operation::new(
                                    "cm",
                                    vec![400.into(), 0.into(), 0.into(), 200.into(), 100.into(), 400.into()],
                                ),
                                Operation::new("Do", vec!["Im1".into()]),
                                Operation::new("Q", vec![]),
                            ],
                        },
                        dictionary! { "XObject" => dictionary! { "Im1" => image_id } },
                    )
                }
            };

            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let resources_id = doc.add_object(resources);
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    /// One page that selects font `/F9` without declaring any resources.
    pub(crate) fn build_pdf_with_missing_font() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F9".into(), 12.into()]),
                Operation::new("Tj", vec![Object::string_literal("Hi")]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn reader_without_pdftoppm() -> LopdfReader {
        LopdfReader::new().with_rasterizer(PdftoppmRasterizer::new("docintel-no-such-pdftoppm"))
    }

    #[test]
    fn test_rejects_garbage() {
        let result = LopdfReader::new().load(b"definitely not a pdf");
        assert!(matches!(result, Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_reads_page_text() {
        let bytes = build_pdf(&[Some("Hello Invoice")]);
        let doc = reader_without_pdftoppm().load(&bytes).unwrap();

        assert_eq!(doc.page_count(), 1);
        assert!(doc.page_text(1).unwrap().contains("Hello Invoice"));
        assert!(matches!(doc.page_text(2), Err(PdfError::InvalidPage(2))));
    }

    #[test]
    fn test_image_page_has_no_text() {
        let bytes = build_pdf(&[None]);
        let doc = reader_without_pdftoppm().load(&bytes).unwrap();

        assert_eq!(doc.page_count(), 1);
        assert!(doc.page_text(1).unwrap().trim().is_empty());
    }

    #[test]
    fn test_rasterize_falls_back_to_embedded_image() {
        let bytes = build_pdf(&[None]);
        let doc = reader_without_pdftoppm().load(&bytes).unwrap();

        let image = doc.rasterize(1, 300).unwrap();
        assert_eq!(image.dimensions(), (4, 2));
    }

    #[test]
    fn test_rasterize_text_page_without_images_fails() {
        let bytes = build_pdf(&[Some("Only text")]);
        let doc = reader_without_pdftoppm().load(&bytes).unwrap();

        assert!(matches!(
            doc.rasterize(1, 300),
            Err(PdfError::Rasterize { page: 1, .. })
        ));
    }

    #[test]
    fn test_missing_font_is_textless_not_fatal() {
        let bytes = build_pdf_with_missing_font();
        assert!(matches!(
            extract_page_texts(&bytes),
            Err(PdfError::TextExtraction(_))
        ));

        let doc = reader_without_pdftoppm().load(&bytes).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.page_text(1).unwrap(), "");
    }

    #[test]
    fn test_create_image_from_raw_gray() {
        let img = create_image_from_raw(&[10, 20, 30, 40], 2, 2, b"DeviceGray", 8).unwrap();
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.to_rgba8().get_pixel(1, 1).0, [40, 40, 40, 255]);
    }

    #[test]
    fn test_create_image_from_raw_rejects_short_data() {
        assert!(create_image_from_raw(&[1, 2, 3], 2, 2, b"DeviceRGB", 8).is_none());
        assert!(create_image_from_raw(&[0; 16], 2, 2, b"DeviceCMYK", 8).is_none());
        assert!(create_image_from_raw(&[0; 4], 2, 2, b"DeviceGray", 1).is_none());
    }
}
