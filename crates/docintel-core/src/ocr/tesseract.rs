//! OCR through the `tesseract` command line tool.

use std::io::ErrorKind;
use std::process::Command;
use std::time::Instant;

use image::{DynamicImage, GenericImageView, ImageFormat};
use tracing::{debug, info};

use super::{OcrBackend, Result};
use crate::error::OcrError;

/// Runs `tesseract <image> stdout -l <lang>` on a temporary PNG.
pub struct TesseractBackend {
    command: String,
    language: String,
}

impl TesseractBackend {
    pub fn new(command: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            language: language.into(),
        }
    }
}

impl Default for TesseractBackend {
    fn default() -> Self {
        Self::new("tesseract", "eng")
    }
}

impl OcrBackend for TesseractBackend {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn image_to_text(&self, image: &DynamicImage) -> Result<String> {
        let start = Instant::now();
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(OcrError::InvalidImage(format!("{}x{}", width, height)));
        }

        let input = tempfile::Builder::new()
            .prefix("docintel-ocr-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| OcrError::Recognition(format!("failed to create temp file: {}", e)))?;

        // Tesseract reads 8-bit RGB reliably regardless of the source format.
        image
            .to_rgb8()
            .save_with_format(input.path(), ImageFormat::Png)
            .map_err(|e| OcrError::InvalidImage(e.to_string()))?;

        let output = Command::new(&self.command)
            .arg(input.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    OcrError::Unavailable(format!("{} not found", self.command))
                }
                _ => OcrError::Recognition(format!("failed to run {}: {}", self.command, e)),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Recognition(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();

        debug!("tesseract stderr: {}", String::from_utf8_lossy(&output.stderr).trim());
        info!(
            "OCR complete: {}x{} image, {} chars in {}ms",
            width,
            height,
            text.len(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }
}
