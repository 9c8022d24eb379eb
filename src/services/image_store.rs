// src/services/image_store.rs
use crate::errors::ToneError;
use chrono::Utc;
use log::{debug, warn};
use std::path::PathBuf;
use tokio::fs;
use uuid::Uuid;

/// A file written by [`ImageStore::put`].
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub path: PathBuf,
    pub url: String,
}

/// Durable storage for analysed photos. Files land under
/// `{root}/{user_id}/` and are served back at `{public_base_url}/images/`.
pub struct ImageStore {
    root: PathBuf,
    public_base_url: String,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Writes the image and returns where it lives on disk and its public URL.
    pub async fn put(
        &self,
        user_id: &str,
        bytes: &[u8],
        extension: &str,
    ) -> Result<StoredImage, ToneError> {
        if !is_safe_segment(user_id) {
            return Err(ToneError::Validation(format!("Invalid user id: {}", user_id)));
        }

        let dir = self.root.join(user_id);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| ToneError::Persistence(format!("Failed to upload image: {}", e)))?;

        let filename = format!(
            "{}-{}.{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            extension
        );
        let path = dir.join(&filename);
        fs::write(&path, bytes)
            .await
            .map_err(|e| ToneError::Persistence(format!("Failed to upload image: {}", e)))?;

        debug!("Stored {} bytes at {}", bytes.len(), path.display());
        let url = format!("{}/images/{}/{}", self.public_base_url, user_id, filename);
        Ok(StoredImage { path, url })
    }

    /// Removes an image whose record never made it to the store.
    pub async fn discard(&self, stored: &StoredImage) {
        match fs::remove_file(&stored.path).await {
            Ok(()) => debug!("Removed orphaned image {}", stored.path.display()),
            Err(e) => warn!(
                "Failed to remove orphaned image {}: {}",
                stored.path.display(),
                e
            ),
        }
    }
}

fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment.len() <= 128
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
