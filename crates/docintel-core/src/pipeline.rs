//! End-to-end processing of one document: text, then fields.

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::fields::FieldExtractor;
use crate::models::config::DocintelConfig;
use crate::models::document::RawDocument;
use crate::models::fields::FieldMap;
use crate::text::{TextExtractor, TextSource};

/// Output of [`DocumentPipeline::process`].
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedDocument {
    /// Extracted text, trimmed.
    pub text: String,
    pub fields: FieldMap,
    pub source: TextSource,
    pub backend_unavailable: bool,
}

/// Text extractor followed by field extractor.
pub struct DocumentPipeline {
    text_extractor: TextExtractor,
    field_extractor: FieldExtractor,
}

impl DocumentPipeline {
    pub fn new(text_extractor: TextExtractor, field_extractor: FieldExtractor) -> Self {
        Self {
            text_extractor,
            field_extractor,
        }
    }

    /// Pipeline with configured backends and the standard field rules.
    pub fn from_config(config: &DocintelConfig) -> Self {
        Self::new(TextExtractor::from_config(config), FieldExtractor::new())
    }

    pub fn field_extractor(&self) -> &FieldExtractor {
        &self.field_extractor
    }

    /// Process one document. Only unsupported or corrupt input is an error.
    pub fn process(&self, document: &RawDocument<'_>) -> Result<ProcessedDocument> {
        let extraction = self.text_extractor.extract(document)?;
        let text = extraction.text.trim().to_string();
        let fields = self.field_extractor.extract(&text);

        debug!("Extracted fields: {:?}", fields);

        Ok(ProcessedDocument {
            text,
            fields,
            source: extraction.source,
            backend_unavailable: extraction.backend_unavailable,
        })
    }
}
