/// Image upload for posts
///
/// Clients upload the image first, then pass the returned `filePath` as
/// `imageUrl` to `createPost` / `updatePost`.
use actix_multipart::Multipart;
use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use futures_util::stream::StreamExt;
use serde_json::json;
use tracing::{debug, error, info};

use crate::config::UploadConfig;
use crate::error::BlogError;
use crate::images::{is_accepted_mime, ImageStore};
use crate::middleware::AuthState;

const IMAGE_FIELD: &str = "image";
const OLD_PATH_FIELD: &str = "oldPath";

struct ImageUpload {
    file_name: String,
    bytes: Vec<u8>,
}

fn malformed() -> BlogError {
    BlogError::BadRequest("Malformed upload".into())
}

/// PUT /post-image
///
/// `oldPath` is cleared for any authenticated caller; it is not checked
/// against the posts the caller owns.
pub async fn upload_post_image(
    http_req: HttpRequest,
    images: web::Data<ImageStore>,
    uploads: web::Data<UploadConfig>,
    mut payload: Multipart,
) -> Result<HttpResponse, BlogError> {
    let authenticated = http_req
        .extensions()
        .get::<AuthState>()
        .map(AuthState::is_authenticated)
        .unwrap_or(false);
    if !authenticated {
        return Err(BlogError::Unauthenticated);
    }

    let mut image: Option<ImageUpload> = None;
    let mut old_path: Option<String> = None;
    let mut total_bytes: usize = 0;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| {
            debug!(error = %e, "Malformed multipart body");
            malformed()
        })?;

        let name = field.name().to_string();
        let file_name = field
            .content_disposition()
            .get_filename()
            .unwrap_or_default()
            .to_string();
        let accepted = field
            .content_type()
            .map(|mime| is_accepted_mime(mime.essence_str()))
            .unwrap_or(false);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| {
                error!("Error reading upload field: {}", e);
                malformed()
            })?;

            total_bytes += chunk.len();
            if total_bytes > uploads.max_upload_bytes {
                return Err(BlogError::PayloadTooLarge(format!(
                    "Upload exceeds {} bytes",
                    uploads.max_upload_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        match name.as_str() {
            IMAGE_FIELD if accepted => image = Some(ImageUpload { file_name, bytes }),
            IMAGE_FIELD => debug!(file = %file_name, "Ignoring image with unsupported type"),
            OLD_PATH_FIELD => old_path = String::from_utf8(bytes).ok(),
            _ => {}
        }
    }

    let Some(upload) = image else {
        return Ok(HttpResponse::Ok().json(json!({ "message": "No image file selected" })));
    };

    let file_path = images.save(&upload.file_name, &upload.bytes).await?;

    if let Some(old) = old_path.filter(|p| !p.trim().is_empty()) {
        images.clear(old.trim()).await;
    }

    info!(file_path = %file_path, size = upload.bytes.len(), "Post image stored");
    Ok(HttpResponse::Created().json(json!({
        "message": "File stored",
        "filePath": file_path,
    })))
}
