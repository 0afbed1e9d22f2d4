use std::io::Write;

use actix_multipart::Multipart;
use futures::{StreamExt, TryStreamExt};

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

/// Multipart field name the upload must arrive under.
pub const IMAGE_FIELD: &str = "image";

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No image uploaded")]
    MissingFile,
    #[error("Unsupported image type: {0}")]
    InvalidMediaType(String),
    #[error("Image exceeds the 5 MiB size limit")]
    PayloadTooLarge,
    #[error("Failed to read upload: {0}")]
    Stream(String),
}

/// An inbound image as declared by the client. Discarded once the
/// classifier call completes; never persisted.
#[derive(Clone, Debug)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub file_name: String,
}

/// Structural validation of the declared metadata only. The bytes are not
/// content-sniffed; a mislabeled payload passes here and fails at the
/// classifier instead. Content sniffing would be an enhancement, not a
/// contract change.
pub fn validate(image: UploadedImage) -> Result<UploadedImage, UploadError> {
    if !ACCEPTED_MIME_TYPES.contains(&image.mime_type.as_str()) {
        return Err(UploadError::InvalidMediaType(image.mime_type.clone()));
    }
    if image.bytes.len() > MAX_IMAGE_BYTES {
        return Err(UploadError::PayloadTooLarge);
    }
    Ok(image)
}

/// Pulls the first `image` file out of the multipart stream; any further
/// files are ignored. Buffering stops at the size ceiling so an oversized
/// upload cannot exhaust memory before validation runs.
pub async fn read_first_image(mut payload: Multipart) -> Result<UploadedImage, UploadError> {
    while let Ok(Some(mut field)) = payload.try_next().await {
        if field.name() != Some(IMAGE_FIELD) {
            // Drain unrelated fields so the stream can advance.
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| UploadError::Stream(e.to_string()))?;
            }
            continue;
        }

        let mime_type = field
            .content_type()
            .map(|m| m.to_string())
            .unwrap_or_default();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or("upload")
            .to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| UploadError::Stream(e.to_string()))?;
            if bytes.len() + data.len() > MAX_IMAGE_BYTES {
                return Err(UploadError::PayloadTooLarge);
            }
            bytes
                .write_all(&data)
                .map_err(|e| UploadError::Stream(e.to_string()))?;
        }

        if bytes.is_empty() {
            return Err(UploadError::MissingFile);
        }
        return Ok(UploadedImage {
            bytes,
            mime_type,
            file_name,
        });
    }

    Err(UploadError::MissingFile)
}
