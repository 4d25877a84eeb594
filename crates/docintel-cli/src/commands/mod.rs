//! Subcommands and the report format they share.

pub mod batch;
pub mod config;
pub mod process;

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use tracing::debug;

use docintel_core::models::config::OcrBackendKind;
use docintel_core::{
    DocintelConfig, DocumentPipeline, FieldMap, FieldMatch, MediaType, RawDocument, TextSource,
};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// What the CLI reports for one processed file.
#[derive(Debug, Serialize)]
pub struct DocumentReport {
    pub filename: String,
    pub media_type: String,
    pub source: TextSource,
    pub backend_unavailable: bool,
    pub fields: FieldMap,
    /// Numeric reading of `fields.amount`, markers and separators removed.
    pub amount_value: Option<String>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<Vec<FieldMatch>>,
}

/// Pipeline for the given configuration. `text_only` swaps the OCR backend
/// for a disabled one.
pub fn build_pipeline(config: &DocintelConfig, text_only: bool) -> DocumentPipeline {
    let mut config = config.clone();
    if text_only {
        config.ocr.backend = OcrBackendKind::Disabled;
    }
    DocumentPipeline::from_config(&config)
}

/// Declared media type for a file: the explicit one if given, otherwise
/// guessed from the extension.
pub fn media_type_for(path: &Path, declared: Option<&str>) -> String {
    match declared {
        Some(declared) => declared.to_string(),
        None => {
            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            MediaType::from_extension(extension).as_str().to_string()
        }
    }
}

/// Read a file and run it through the pipeline.
pub fn process_file(
    pipeline: &DocumentPipeline,
    path: &Path,
    declared_media_type: Option<&str>,
    explain: bool,
) -> anyhow::Result<DocumentReport> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let media_type = media_type_for(path, declared_media_type);

    debug!("Processing {} as '{}'", path.display(), media_type);

    let processed = pipeline
        .process(&RawDocument::new(&bytes, &media_type))
        .with_context(|| format!("Failed to process {}", path.display()))?;

    let matches = explain.then(|| pipeline.field_extractor().explain(&processed.text));

    Ok(DocumentReport {
        filename: path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string(),
        media_type: MediaType::parse(&media_type).to_string(),
        source: processed.source,
        backend_unavailable: processed.backend_unavailable,
        amount_value: processed.fields.amount_value().map(|d| d.to_string()),
        fields: processed.fields,
        text: processed.text,
        matches,
    })
}

impl DocumentReport {
    pub fn render(&self, format: OutputFormat) -> anyhow::Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Csv => self.format_csv(),
            OutputFormat::Text => Ok(self.format_text()),
        }
    }

    fn format_csv(&self) -> anyhow::Result<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);

        wtr.write_record([
            "filename",
            "invoice_number",
            "amount",
            "amount_value",
            "email",
            "date",
            "backend_unavailable",
        ])?;

        wtr.write_record([
            self.filename.as_str(),
            self.fields.invoice_number().unwrap_or_default(),
            self.fields.amount().unwrap_or_default(),
            self.amount_value.as_deref().unwrap_or_default(),
            self.fields.email().unwrap_or_default(),
            self.fields.date().unwrap_or_default(),
            if self.backend_unavailable { "true" } else { "false" },
        ])?;

        Ok(String::from_utf8(wtr.into_inner()?)?)
    }

    fn format_text(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("File: {} ({})\n", self.filename, self.media_type));
        output.push_str(&format!("Source: {:?}\n", self.source));
        if self.backend_unavailable {
            output.push_str("OCR unavailable, text may be missing\n");
        }
        output.push('\n');

        output.push_str(&format!(
            "Invoice number: {}\n",
            self.fields.invoice_number().unwrap_or("-")
        ));
        output.push_str(&format!("Amount:         {}\n", self.fields.amount().unwrap_or("-")));
        if let Some(value) = &self.amount_value {
            output.push_str(&format!("  as number:    {}\n", value));
        }
        output.push_str(&format!("Email:          {}\n", self.fields.email().unwrap_or("-")));
        output.push_str(&format!("Date:           {}\n", self.fields.date().unwrap_or("-")));

        if let Some(matches) = &self.matches {
            output.push_str("\nMatches:\n");
            for m in matches {
                output.push_str(&format!(
                    "  {} @ {}..{}: {}\n",
                    m.field, m.position.0, m.position.1, m.value
                ));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docintel_core::extract_fields;

    fn report() -> DocumentReport {
        let text = "Invoice # A-1, total $5.00, ap@shop.io".to_string();
        let fields = extract_fields(&text);
        DocumentReport {
            filename: "a, b.png".into(),
            media_type: "image/png".into(),
            source: TextSource::Ocr,
            backend_unavailable: false,
            amount_value: fields.amount_value().map(|d| d.to_string()),
            fields,
            text,
            matches: None,
        }
    }

    #[test]
    fn test_media_type_for() {
        assert_eq!(media_type_for(Path::new("scan.PDF"), None), "application/pdf");
        assert_eq!(media_type_for(Path::new("a.jpg"), None), "image/jpeg");
        assert_eq!(media_type_for(Path::new("a.pdf"), Some("image/png")), "image/png");
        assert_eq!(media_type_for(Path::new("noext"), None), "");
    }

    #[test]
    fn test_csv_quotes_and_blanks() {
        let csv = report().render(OutputFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("filename,invoice_number,amount,amount_value,email,date,backend_unavailable")
        );
        assert_eq!(lines.next(), Some("\"a, b.png\",A-1,$5.00,5.00,ap@shop.io,,false"));
    }

    #[test]
    fn test_json_omits_matches_unless_explained() {
        let json = report().render(OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("matches").is_none());
        assert_eq!(value["fields"]["date"], serde_json::Value::Null);
        assert_eq!(value["source"], "ocr");
        assert_eq!(value["amount_value"], "5.00");
    }

    #[test]
    fn test_text_shows_dashes_for_missing() {
        let text = report().render(OutputFormat::Text).unwrap();
        assert!(text.contains("Invoice number: A-1"));
        assert!(text.contains("Date:           -"));
    }
}
