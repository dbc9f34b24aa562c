/// Media type reported by `infer` for PDF documents.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Default upload size limit (20 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

/// Hashing algorithm recorded in upload metadata.
pub(crate) const HASH_ALGORITHM: &str = "sha256";
