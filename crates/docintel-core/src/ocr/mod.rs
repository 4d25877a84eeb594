//! OCR backends.
//!
//! The pipeline only ever sees [`OcrBackend`]; which engine sits behind it is
//! decided by configuration through [`create_backend`].

mod disabled;
#[cfg(feature = "native")]
mod pure_engine;
mod tesseract;

pub use disabled::DisabledBackend;
#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;
pub use tesseract::TesseractBackend;

use image::DynamicImage;
use tracing::warn;

use crate::error::OcrError;
use crate::models::config::{OcrBackendKind, OcrConfig};

/// Result type for OCR operations.
pub type Result<T> = std::result::Result<T, OcrError>;

/// Capability to turn a bitmap into text.
///
/// Implementations are synchronous and may block. An implementation that
/// cannot run at all should return [`OcrError::Unavailable`].
pub trait OcrBackend {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// Recognize the text in an image.
    fn image_to_text(&self, image: &DynamicImage) -> Result<String>;
}

impl<T: OcrBackend + ?Sized> OcrBackend for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn image_to_text(&self, image: &DynamicImage) -> Result<String> {
        (**self).image_to_text(image)
    }
}

/// Build the backend selected in the configuration.
///
/// Model loading problems are logged and turned into a [`DisabledBackend`],
/// so a misconfigured engine behaves like an absent one.
pub fn create_backend(config: &OcrConfig) -> Box<dyn OcrBackend> {
    match config.backend {
        OcrBackendKind::Tesseract => Box::new(TesseractBackend::new(
            config.tesseract_cmd.clone(),
            config.language.clone(),
        )),
        OcrBackendKind::Onnx => create_onnx_backend(config),
        OcrBackendKind::Disabled => Box::new(DisabledBackend::new("disabled by configuration")),
    }
}

#[cfg(feature = "native")]
fn create_onnx_backend(config: &OcrConfig) -> Box<dyn OcrBackend> {
    match PureOcrEngine::from_dir(&config.model_dir, config.keep_unk) {
        Ok(engine) => Box::new(engine),
        Err(e) => {
            warn!("Failed to load ONNX OCR models: {}", e);
            Box::new(DisabledBackend::new(e.to_string()))
        }
    }
}

#[cfg(not(feature = "native"))]
fn create_onnx_backend(_config: &OcrConfig) -> Box<dyn OcrBackend> {
    warn!("ONNX OCR requested but the `native` feature is not enabled");
    Box::new(DisabledBackend::new("built without the `native` feature"))
}
