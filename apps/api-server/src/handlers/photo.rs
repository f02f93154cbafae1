//! Raw image uploads.

use std::future::Future;

use actix_web::{HttpRequest, http::header, web};
use uuid::Uuid;

use daybook_core::{error::DomainError, ports::BlobStore};

use crate::middleware::error::{AppError, AppResult};

/// Largest accepted upload body.
pub(crate) const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// File extension for the request's image `Content-Type`.
fn extension(req: &HttpRequest) -> AppResult<&'static str> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "image/jpeg" | "image/jpg" => Ok("jpg"),
        "image/png" => Ok("png"),
        "image/gif" => Ok("gif"),
        "image/webp" => Ok("webp"),
        other => Err(AppError::UnsupportedMediaType(format!(
            "Photos must be sent as an image content type, got '{other}'"
        ))),
    }
}

/// Validated upload: extension plus the non-empty body.
pub(crate) fn upload(req: &HttpRequest, body: web::Bytes) -> AppResult<(&'static str, Vec<u8>)> {
    let extension = extension(req)?;
    if body.is_empty() {
        return Err(AppError::BadRequest("Please upload a photo.".to_string()));
    }
    Ok((extension, body.to_vec()))
}

/// Store an upload and record its URL with `attach`. If recording fails the
/// blob is deleted again, so no photo is left without an owner.
pub(crate) async fn store_and_attach<T, F, Fut>(
    blobs: &dyn BlobStore,
    owner: Uuid,
    extension: &str,
    bytes: Vec<u8>,
    attach: F,
) -> AppResult<T>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    let url = blobs.store_photo(owner, extension, bytes).await?;

    match attach(url.clone()).await {
        Ok(record) => Ok(record),
        Err(err) => {
            if let Err(cleanup) = blobs.delete_photo(&url).await {
                tracing::warn!(%url, error = %cleanup, "Orphaned photo left in storage");
            }
            Err(err.into())
        }
    }
}
