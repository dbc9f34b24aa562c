//! Upload validation.
//!
//! An upload is accepted only when it is non-empty, within the configured size limit and
//! its leading bytes identify it as a PDF. The returned [`UploadMetadata`] describes the
//! document without containing any of its content, so it is safe to log.

use crate::constants::{HASH_ALGORITHM, PDF_MEDIA_TYPE};
use crate::{FilesError, FilesResult};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Metadata for an accepted upload
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct UploadMetadata {
    /// Hashing algorithm used (always "sha256")
    pub hash_algorithm: String,

    /// Hexadecimal SHA-256 digest of the upload
    pub sha256: String,

    /// Size of the upload in bytes
    pub size_bytes: u64,

    /// Detected media type (always `application/pdf` once accepted)
    pub media_type: String,

    /// Filename supplied by the client, or "unknown"
    pub original_filename: String,

    /// UTC timestamp when the upload was inspected
    pub received_at: DateTime<Utc>,
}

/// Validates an uploaded document and describes it.
///
/// # Arguments
///
/// * `filename` - Filename supplied by the client (informational only)
/// * `bytes` - The uploaded content
/// * `max_bytes` - Upper bound on the upload size
///
/// # Errors
///
/// Returns `FilesError` if:
/// - the upload is empty,
/// - the upload exceeds `max_bytes`,
/// - the content is not recognised as a PDF.
pub fn inspect_upload(filename: &str, bytes: &[u8], max_bytes: u64) -> FilesResult<UploadMetadata> {
    if bytes.is_empty() {
        return Err(FilesError::EmptyUpload);
    }

    let size_bytes = bytes.len() as u64;
    if size_bytes > max_bytes {
        return Err(FilesError::TooLarge {
            size: size_bytes,
            limit: max_bytes,
        });
    }

    let media_type = infer::get(bytes)
        .map(|kind| kind.mime_type())
        .unwrap_or("unknown");
    if media_type != PDF_MEDIA_TYPE {
        return Err(FilesError::NotPdf(media_type.to_string()));
    }

    let original_filename = match filename.trim() {
        "" => "unknown".to_string(),
        name => name.to_string(),
    };

    let metadata = UploadMetadata {
        hash_algorithm: HASH_ALGORITHM.to_string(),
        sha256: hex::encode(Sha256::digest(bytes)),
        size_bytes,
        media_type: media_type.to_string(),
        original_filename,
        received_at: Utc::now(),
    };

    tracing::debug!(
        sha256 = %metadata.sha256,
        size_bytes = metadata.size_bytes,
        "accepted upload"
    );

    Ok(metadata)
}
