//! Page rasterization through poppler's `pdftoppm`.

use std::io::{ErrorKind, Write};
use std::process::Command;

use image::DynamicImage;
use tracing::debug;

use super::Result;
use crate::error::PdfError;

/// Renders single PDF pages to PNG with `pdftoppm` and loads the result.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    command: String,
}

impl PdftoppmRasterizer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Render `page` of the PDF in `data` at `dpi`.
    pub fn render(&self, data: &[u8], page: u32, dpi: u32) -> Result<DynamicImage> {
        let err = |reason: String| PdfError::Rasterize { page, reason };

        let work_dir = tempfile::tempdir().map_err(|e| err(format!("temp dir: {}", e)))?;
        let input_path = work_dir.path().join("input.pdf");
        let output_prefix = work_dir.path().join("page");

        let mut input = std::fs::File::create(&input_path)
            .map_err(|e| err(format!("write input: {}", e)))?;
        input
            .write_all(data)
            .map_err(|e| err(format!("write input: {}", e)))?;
        drop(input);

        let output = Command::new(&self.command)
            .arg("-png")
            .arg("-r")
            .arg(dpi.to_string())
            .arg("-f")
            .arg(page.to_string())
            .arg("-l")
            .arg(page.to_string())
            .arg("-singlefile")
            .arg(&input_path)
            .arg(&output_prefix)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => err(format!("{} not found", self.command)),
                _ => err(format!("failed to run {}: {}", self.command, e)),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(err(format!("{} failed: {}", self.command, stderr.trim())));
        }

        let png_path = output_prefix.with_extension("png");
        let image = image::open(&png_path).map_err(|e| err(format!("load render: {}", e)))?;

        debug!(
            "Rendered page {} at {} DPI: {}x{}",
            page,
            dpi,
            image.width(),
            image.height()
        );

        Ok(image)
    }
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self::new("pdftoppm")
    }
}
