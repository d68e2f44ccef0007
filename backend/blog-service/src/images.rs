//! Local image storage for post images
//!
//! Files live in a single directory and are exposed to clients as
//! `images/<file>`, the same string stored in `Post.image_url`.

use std::path::PathBuf;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::Result;

/// URL prefix under which stored images are served
pub const PUBLIC_PREFIX: &str = "images";

const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/png", "image/jpg", "image/jpeg"];

pub fn is_accepted_mime(mime: &str) -> bool {
    ACCEPTED_MIME_TYPES
        .iter()
        .any(|accepted| accepted.eq_ignore_ascii_case(mime))
}

/// Reduce a client-supplied filename to a safe basename
fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Write `bytes` under a collision-free name and return its public path
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        let file_name = format!("{}-{}", Uuid::new_v4(), sanitize_file_name(original_name));
        tokio::fs::write(self.dir.join(&file_name), bytes).await?;

        debug!(file = %file_name, size = bytes.len(), "Stored image");
        Ok(format!("{}/{}", PUBLIC_PREFIX, file_name))
    }

    /// Resolve a public path (`images/<file>`) to a file inside the store.
    /// Anything that is not a plain file name under the prefix resolves to `None`.
    pub fn resolve(&self, public_path: &str) -> Option<PathBuf> {
        let trimmed = public_path.trim_start_matches('/');
        let file_name = trimmed
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(trimmed);

        let valid = !file_name.is_empty()
            && file_name != "."
            && file_name != ".."
            && !file_name.contains(['/', '\\']);
        valid.then(|| self.dir.join(file_name))
    }

    /// Best-effort removal of a previously stored image. Failures are logged only.
    pub async fn clear(&self, public_path: &str) {
        let Some(path) = self.resolve(public_path) else {
            warn!(path = %public_path, "Refusing to clear image outside image store");
            return;
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!(path = %path.display(), "Cleared image"),
            Err(e) => warn!(path = %path.display(), error = %e, "Error while deleting image file"),
        }
    }
}
