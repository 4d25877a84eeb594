//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DocintelError, Result};

/// Main configuration for the docintel pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocintelConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,
}

/// Which OCR backend to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrBackendKind {
    /// The `tesseract` command line tool.
    Tesseract,
    /// Pure Rust ONNX models (requires the `native` feature).
    Onnx,
    /// No OCR; image inputs yield empty text.
    Disabled,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Backend to use.
    pub backend: OcrBackendKind,

    /// Tesseract language code.
    pub language: String,

    /// Tesseract executable name or path.
    pub tesseract_cmd: String,

    /// Directory holding `det.onnx`, `latin_rec.onnx` and `latin_dict.txt`.
    pub model_dir: PathBuf,

    /// Keep `[UNK]` tokens emitted by the ONNX recognizer.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            backend: OcrBackendKind::Tesseract,
            language: "eng".to_string(),
            tesseract_cmd: "tesseract".to_string(),
            model_dir: PathBuf::from("models"),
            keep_unk: false,
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// DPI for rasterizing pages before OCR.
    pub render_dpi: u32,

    /// poppler `pdftoppm` executable name or path.
    pub pdftoppm_cmd: String,

    /// Joins per-page text.
    pub page_separator: String,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            render_dpi: 300,
            pdftoppm_cmd: "pdftoppm".to_string(),
            page_separator: "\n".to_string(),
        }
    }
}

impl DocintelConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| DocintelError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| DocintelError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DocintelConfig::default();
        assert_eq!(config.pdf.render_dpi, 300);
        assert_eq!(config.pdf.page_separator, "\n");
        assert_eq!(config.ocr.backend, OcrBackendKind::Tesseract);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: DocintelConfig =
            serde_json::from_str(r#"{"ocr": {"backend": "disabled"}}"#).unwrap();
        assert_eq!(config.ocr.backend, OcrBackendKind::Disabled);
        assert_eq!(config.ocr.language, "eng");
        assert_eq!(config.pdf.render_dpi, 300);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = DocintelConfig::default();
        config.pdf.render_dpi = 150;
        config.save(&path).unwrap();

        let loaded = DocintelConfig::from_file(&path).unwrap();
        assert_eq!(loaded.pdf.render_dpi, 150);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = DocintelConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, DocintelError::Config(_)));
    }
}
