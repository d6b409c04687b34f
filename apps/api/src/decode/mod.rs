//! Document decoding: uploaded bytes → plain text.
//!
//! Format is chosen from the file extension only: `.pdf`, `.docx`, and anything
//! else is read as UTF-8 with invalid sequences dropped.

mod docx;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX archive is unreadable: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("DOCX markup is malformed: {0}")]
    Markup(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extracted text and the name of the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    pub filename: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    pub fn from_filename(filename: &str) -> Self {
        let lower = filename.to_lowercase();
        if lower.ends_with(".pdf") {
            DocumentKind::Pdf
        } else if lower.ends_with(".docx") {
            DocumentKind::Docx
        } else {
            DocumentKind::PlainText
        }
    }
}

/// Decodes an uploaded file. The returned text is trimmed and may be empty.
pub fn decode_document(bytes: &[u8], filename: &str) -> Result<RawDocument, DecodeError> {
    let kind = DocumentKind::from_filename(filename);
    tracing::debug!(?kind, size = bytes.len(), "decoding document");

    let text = match kind {
        DocumentKind::Pdf => extract_pdf(bytes)?,
        DocumentKind::Docx => docx::extract_text(bytes)?,
        DocumentKind::PlainText => decode_utf8_lossy(bytes),
    };

    Ok(RawDocument {
        filename: filename.to_string(),
        text: text.trim().to_string(),
    })
}

// The PDF backend can panic on malformed object streams.
fn extract_pdf(bytes: &[u8]) -> Result<String, DecodeError> {
    std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| DecodeError::Pdf("decoder aborted on malformed input".to_string()))?
        .map_err(|e| DecodeError::Pdf(e.to_string()))
}

fn decode_utf8_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).replace(char::REPLACEMENT_CHARACTER, "")
}
