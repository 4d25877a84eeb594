//! Input document and media type models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A document handed to the pipeline by its caller.
///
/// Borrowed for the duration of one extraction call and never retained.
#[derive(Debug, Clone, Copy)]
pub struct RawDocument<'a> {
    /// Opaque binary payload.
    pub bytes: &'a [u8],
    /// Caller-supplied media type; may be empty or wrong.
    pub declared_media_type: &'a str,
}

impl<'a> RawDocument<'a> {
    pub fn new(bytes: &'a [u8], declared_media_type: &'a str) -> Self {
        Self {
            bytes,
            declared_media_type,
        }
    }

    /// Parsed view of the declared media type.
    pub fn media_type(&self) -> MediaType {
        MediaType::parse(self.declared_media_type)
    }
}

/// Media types the text extractor dispatches on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum MediaType {
    Png,
    Jpeg,
    Webp,
    Bmp,
    Tiff,
    Pdf,
    /// Anything else, including an empty declaration. Holds the raw value.
    Other(String),
}

impl MediaType {
    /// Parse a declared media type. Matching ignores case, surrounding
    /// whitespace and any `;`-separated parameters.
    pub fn parse(declared: &str) -> Self {
        let essence = declared
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "image/png" => Self::Png,
            "image/jpeg" | "image/jpg" => Self::Jpeg,
            "image/webp" => Self::Webp,
            "image/bmp" => Self::Bmp,
            "image/tiff" => Self::Tiff,
            "application/pdf" => Self::Pdf,
            _ => Self::Other(declared.trim().to_string()),
        }
    }

    /// Guess the media type from a file extension (without the dot).
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            "webp" => Self::Webp,
            "bmp" => Self::Bmp,
            "tif" | "tiff" => Self::Tiff,
            "pdf" => Self::Pdf,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether this is one of the recognized image types.
    pub fn is_image(&self) -> bool {
        matches!(
            self,
            Self::Png | Self::Jpeg | Self::Webp | Self::Bmp | Self::Tiff
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
            Self::Pdf => "application/pdf",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(raw) if raw.is_empty() => f.write_str("unknown"),
            _ => f.write_str(self.as_str()),
        }
    }
}

impl From<String> for MediaType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<MediaType> for String {
    fn from(value: MediaType) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_recognized_types() {
        assert_eq!(MediaType::parse("image/png"), MediaType::Png);
        assert_eq!(MediaType::parse("image/jpg"), MediaType::Jpeg);
        assert_eq!(MediaType::parse("IMAGE/JPEG"), MediaType::Jpeg);
        assert_eq!(MediaType::parse("image/tiff"), MediaType::Tiff);
        assert_eq!(
            MediaType::parse("application/pdf; charset=binary"),
            MediaType::Pdf
        );
    }

    #[test]
    fn test_parse_unknown_types() {
        assert_eq!(
            MediaType::parse("text/plain"),
            MediaType::Other("text/plain".to_string())
        );
        assert_eq!(MediaType::parse(""), MediaType::Other(String::new()));
        assert!(!MediaType::parse("image/gif").is_image());
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(MediaType::from_extension("PDF"), MediaType::Pdf);
        assert_eq!(MediaType::from_extension("tif"), MediaType::Tiff);
        assert!(MediaType::from_extension("webp").is_image());
        assert_eq!(
            MediaType::from_extension("docx"),
            MediaType::Other("docx".to_string())
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(MediaType::Pdf.to_string(), "application/pdf");
        assert_eq!(MediaType::Other(String::new()).to_string(), "unknown");
    }

    #[test]
    fn test_raw_document_media_type() {
        let doc = RawDocument::new(b"%PDF-1.5", "application/pdf");
        assert_eq!(doc.media_type(), MediaType::Pdf);
    }
}
