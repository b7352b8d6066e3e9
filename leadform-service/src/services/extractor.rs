//! Document-to-text capability consumed by the documents glue.

use thiserror::Error;

/// Error type for text extraction.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("Corrupt content: {0}")]
    CorruptContent(String),
}

/// Extracts plain text from raw document bytes.
///
/// A trait seam so richer extractors (PDF, DOCX) can be injected without
/// touching the handlers.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8], file_type: &str) -> Result<String, ExtractError>;
}

/// Extractor for plain-text files.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8], file_type: &str) -> Result<String, ExtractError> {
        match file_type {
            "txt" => {
                let text = String::from_utf8_lossy(bytes).into_owned();
                if text.trim().is_empty() {
                    return Err(ExtractError::CorruptContent(
                        "Document contains no text".to_string(),
                    ));
                }
                Ok(text)
            }
            other => Err(ExtractError::UnsupportedType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_utf8_text() {
        let text = PlainTextExtractor
            .extract(b"Plans start at $10/mo", "txt")
            .unwrap();
        assert_eq!(text, "Plans start at $10/mo");
    }

    #[test]
    fn rejects_unsupported_types() {
        let err = PlainTextExtractor.extract(b"%PDF-1.4", "pdf").unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedType(t) if t == "pdf"));
    }

    #[test]
    fn rejects_empty_content() {
        let err = PlainTextExtractor.extract(b"   \n", "txt").unwrap_err();
        assert!(matches!(err, ExtractError::CorruptContent(_)));
    }
}
