//! CRMS Files
//!
//! This crate handles the documents clinic staff upload alongside a patient record.
//!
//! ## Design Principles
//!
//! - Uploads are validated before any parsing happens: non-empty, within the configured
//!   size limit, and sniffed as `application/pdf` from their magic bytes (the filename
//!   extension and the client-supplied content type are not trusted)
//! - Every accepted upload is fingerprinted with SHA-256 so logs can refer to a document
//!   without repeating any of its content
//! - Nothing is written to disk; extraction works on the in-memory bytes
//!
//! ## Example Usage
//!
//! ```no_run
//! use crms_files::{extract_text, inspect_upload};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("history.pdf")?;
//! let metadata = inspect_upload("history.pdf", &bytes, 20 * 1024 * 1024)?;
//! let text = extract_text(&bytes)?;
//! println!("{} ({} bytes): {} chars", metadata.sha256, metadata.size_bytes, text.len());
//! # Ok(())
//! # }
//! ```

mod constants;
mod pdf;
mod upload;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use constants::{DEFAULT_MAX_UPLOAD_BYTES, PDF_MEDIA_TYPE};
pub use pdf::{extract_text, extract_text_from_path};
pub use upload::{inspect_upload, UploadMetadata};

/// Errors that can occur while validating or reading an uploaded document
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// The upload contained no bytes
    #[error("uploaded file is empty")]
    EmptyUpload,

    /// The upload is larger than the configured limit
    #[error("uploaded file is {size} bytes, exceeding the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },

    /// The upload's content is not a PDF
    #[error("uploaded file is not a PDF (detected: {0})")]
    NotPdf(String),

    /// The PDF is password protected
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF could not be parsed or its text could not be decoded
    #[error("{0}")]
    Pdf(#[from] lopdf::Error),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FilesResult<T> = std::result::Result<T, FilesError>;
