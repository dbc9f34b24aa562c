//! PDF text extraction.
//!
//! Text is pulled page by page in page order, and every page's text is followed by a
//! newline. Pages without a text layer (scanned images) contribute an empty line.
//!
//! Encrypted documents are opened with the empty user password, so files that only carry
//! an owner password (print or copy restrictions) still yield their text.

use crate::{FilesError, FilesResult};
use lopdf::Document;
use std::path::Path;

/// Extracts the text of every page of an in-memory PDF.
///
/// # Errors
///
/// Returns `FilesError` if:
/// - the bytes are not a parseable PDF,
/// - the document is encrypted and cannot be opened without a password,
/// - a page's content stream cannot be decoded.
pub fn extract_text(bytes: &[u8]) -> FilesResult<String> {
    let mut document = Document::load_mem(bytes)?;
    if document.is_encrypted() {
        document.decrypt("").map_err(|e| {
            tracing::debug!(error = %e, "PDF needs a user password");
            FilesError::Encrypted
        })?;
    }
    extract_document_text(&document)
}

/// Reads a PDF from disk and extracts the text of every page.
///
/// # Errors
///
/// Returns `FilesError::Io` if the file cannot be read, otherwise the same errors as
/// [`extract_text`].
pub fn extract_text_from_path(path: &Path) -> FilesResult<String> {
    let bytes = std::fs::read(path).map_err(|e| {
        FilesError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read {}: {}", path.display(), e),
        ))
    })?;
    extract_text(&bytes)
}

fn extract_document_text(document: &Document) -> FilesResult<String> {
    let pages = document.get_pages();
    let mut text = String::new();
    for page_number in pages.keys() {
        text.push_str(&document.extract_text(&[*page_number])?);
        text.push('\n');
    }

    tracing::debug!(pages = pages.len(), chars = text.len(), "extracted PDF text");
    Ok(text)
}
