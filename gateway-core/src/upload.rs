//! Upload acceptance rules. Bytes are never kept; only name and size are reported.

use crate::{GatewayError, UploadMetadata};

/// Largest accepted upload, in bytes (2 MiB).
pub const MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

pub const ALLOWED_MEDIA_TYPES: &[&str] = &["image/png", "image/jpeg"];

pub const FILE_NOT_FOUND: &str = "File Not Found";
pub const INVALID_FILE_FORMAT: &str = "Invalid file format. Only PNG and JPG allowed";
pub const FILE_TOO_LARGE: &str = "File too large";

/// An uploaded file as seen by the ingestion layer.
#[derive(Debug, Clone, Copy)]
pub struct IncomingFile<'a> {
    pub filename: &'a str,
    pub media_type: Option<&'a str>,
    pub size: usize,
}

pub fn is_allowed_media_type(media_type: &str) -> bool {
    ALLOWED_MEDIA_TYPES.contains(&media_type)
}

/// Media type check, run before any bytes are read.
pub fn validate_media_type(media_type: Option<&str>) -> Result<(), GatewayError> {
    if media_type.is_some_and(is_allowed_media_type) {
        Ok(())
    } else {
        Err(GatewayError::BadRequest(INVALID_FILE_FORMAT.to_string()))
    }
}

pub fn validate_size(size: usize) -> Result<(), GatewayError> {
    if size > MAX_UPLOAD_BYTES {
        Err(GatewayError::PayloadTooLarge(FILE_TOO_LARGE.to_string()))
    } else {
        Ok(())
    }
}

/// Decide whether an upload is accepted.
pub fn accept_upload(file: Option<IncomingFile<'_>>) -> Result<UploadMetadata, GatewayError> {
    let file = file.ok_or_else(|| GatewayError::NotFound(FILE_NOT_FOUND.to_string()))?;

    validate_media_type(file.media_type)?;
    validate_size(file.size)?;

    Ok(UploadMetadata {
        filename: file.filename.to_string(),
        size: file.size as u64,
    })
}
