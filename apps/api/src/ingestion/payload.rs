use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;

use crate::ingestion::ExtractionError;
use crate::llm_client::DocumentPayload;

pub const PDF: &str = "application/pdf";
pub const PLAIN_TEXT: &str = "text/plain";

/// One uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedDocument {
    pub fn new(name: impl Into<String>, content_type: Option<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            content_type,
            bytes,
        }
    }

    /// Resolves the media type from the declared content type, then the extension.
    /// Only PDF and plain text are accepted.
    pub fn media_type(&self) -> Result<&'static str, ExtractionError> {
        let declared = self
            .content_type
            .as_deref()
            .map(|ct| ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase());
        match declared.as_deref() {
            Some(PDF) => return Ok(PDF),
            Some(PLAIN_TEXT) => return Ok(PLAIN_TEXT),
            _ => {}
        }

        let lower = self.name.to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            Ok(PDF)
        } else if lower.ends_with(".txt") {
            Ok(PLAIN_TEXT)
        } else {
            Err(ExtractionError::UnsupportedDocument(format!(
                "'{}' is not a PDF or plain text file",
                self.name
            )))
        }
    }

    /// PDFs are Base64-encoded for inline transmission; text files travel as their
    /// UTF-8 contents.
    pub fn to_payload(&self) -> Result<DocumentPayload, ExtractionError> {
        if self.bytes.is_empty() {
            return Err(ExtractionError::UnsupportedDocument(format!(
                "'{}' is empty",
                self.name
            )));
        }
        match self.media_type()? {
            PLAIN_TEXT => String::from_utf8(self.bytes.to_vec())
                .map(DocumentPayload::TextFile)
                .map_err(|_| {
                    ExtractionError::UnsupportedDocument(format!(
                        "'{}' is not valid UTF-8 text",
                        self.name
                    ))
                }),
            media_type => Ok(DocumentPayload::Inline {
                media_type: media_type.to_string(),
                data_base64: general_purpose::STANDARD.encode(&self.bytes),
            }),
        }
    }
}
