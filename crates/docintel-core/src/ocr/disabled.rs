//! Backend used when OCR is switched off or could not be set up.

use image::DynamicImage;

use super::{OcrBackend, Result};
use crate::error::OcrError;

/// OCR backend that always reports itself as unavailable.
pub struct DisabledBackend {
    reason: String,
}

impl DisabledBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl OcrBackend for DisabledBackend {
    fn name(&self) -> &str {
        "disabled"
    }

    fn image_to_text(&self, _image: &DynamicImage) -> Result<String> {
        Err(OcrError::Unavailable(self.reason.clone()))
    }
}
