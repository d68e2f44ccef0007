use actix_web::{http::header, web, HttpResponse};
use tracing::debug;

use crate::images::{ImageStore, PUBLIC_PREFIX};

fn content_type_for(file: &str) -> &'static str {
    let ext = file.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// Serve a previously uploaded image
pub async fn serve_image(images: web::Data<ImageStore>, file: web::Path<String>) -> HttpResponse {
    let file = file.into_inner();
    let Some(path) = images.resolve(&format!("{}/{}", PUBLIC_PREFIX, file)) else {
        return HttpResponse::NotFound().finish();
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => HttpResponse::Ok()
            .insert_header((header::CONTENT_TYPE, content_type_for(&file)))
            .body(bytes),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Image not readable");
            HttpResponse::NotFound().finish()
        }
    }
}
