//! Locally selected files
//!
//! Upload eligibility is decided by MIME type alone, the same rule the file
//! picker applies. `inspect_pdf` reads the page count so the viewer can be
//! sized before the renderer finishes loading.

use std::rc::Rc;

use lopdf::Document;
use serde::Serialize;

use crate::error::ClientError;

pub const PDF_MIME: &str = "application/pdf";

/// A file picked or dropped by the user.
///
/// Clones share the same byte buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    pub mime: String,
    pub bytes: Rc<[u8]>,
}

/// Information read from a PDF without rendering it
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct PdfInfo {
    /// Number of pages in the document
    pub page_count: u32,
    /// PDF version string (e.g., "1.7")
    pub version: String,
    /// Document title from metadata (if available)
    pub title: Option<String>,
}

impl LocalFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.mime.eq_ignore_ascii_case(PDF_MIME)
    }
}

/// Parse a PDF and report its page count and metadata
pub fn inspect_pdf(bytes: &[u8]) -> Result<PdfInfo, ClientError> {
    if bytes.len() < 8 {
        return Err(ClientError::Validation(
            "File too small to be a valid PDF".to_string(),
        ));
    }

    if !bytes.starts_with(b"%PDF-") {
        return Err(ClientError::Validation(
            "Not a valid PDF file (missing %PDF- header)".to_string(),
        ));
    }

    let document = Document::load_mem(bytes)
        .map_err(|e| ClientError::Validation(format!("Failed to parse PDF: {}", e)))?;

    let page_count = document.get_pages().len() as u32;
    if page_count == 0 {
        return Err(ClientError::Validation("PDF has no pages".to_string()));
    }

    Ok(PdfInfo {
        page_count,
        version: extract_version(bytes),
        title: extract_title(&document),
    })
}

/// Header format: %PDF-1.7
fn extract_version(bytes: &[u8]) -> String {
    std::str::from_utf8(&bytes[5..8])
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|_| "1.4".to_string())
}

fn extract_title(document: &Document) -> Option<String> {
    let info_id = document.trailer.get(b"Info").ok()?.as_reference().ok()?;
    let info = document.objects.get(&info_id)?.as_dict().ok()?;
    let title = info.get(b"Title").ok()?.as_str().ok()?;
    let decoded = String::from_utf8_lossy(title).trim().to_string();
    (!decoded.is_empty()).then_some(decoded)
}
