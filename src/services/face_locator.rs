// src/services/face_locator.rs
use crate::errors::ToneError;
use crate::models::FaceCandidate;
use crate::services::image_processor::SourceImage;
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Finds faces in an image. Candidate order carries no meaning.
#[async_trait]
pub trait FaceLocator: Send + Sync {
    async fn detect(&self, image: &SourceImage) -> Result<Vec<FaceCandidate>, ToneError>;
}

/// Calls a remote detection service that answers with BlazeFace-shaped boxes.
pub struct HttpFaceLocator {
    endpoint: String,
    client: Client,
}

#[derive(Deserialize)]
struct DetectResponse {
    faces: Vec<FaceCandidate>,
}

impl HttpFaceLocator {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, ToneError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ToneError::FaceLocator(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { endpoint, client })
    }
}

#[async_trait]
impl FaceLocator for HttpFaceLocator {
    async fn detect(&self, image: &SourceImage) -> Result<Vec<FaceCandidate>, ToneError> {
        let base64_image = general_purpose::STANDARD.encode(&image.encoded.bytes);
        let (width, height) = image.dimensions();

        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({
                "image": base64_image,
                "width": width,
                "height": height
            }))
            .send()
            .await
            .map_err(|e| ToneError::FaceLocator(format!("Detection request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ToneError::FaceLocator(format!(
                "Detection service returned {}: {}",
                status, error_text
            )));
        }

        let result: DetectResponse = response.json().await.map_err(|e| {
            ToneError::FaceLocator(format!("Failed to parse detection response: {}", e))
        })?;

        debug!("Face locator returned {} candidates", result.faces.len());
        Ok(result.faces)
    }
}

/// Returns the same candidates for every image.
pub struct FixedFaceLocator {
    faces: Vec<FaceCandidate>,
}

impl FixedFaceLocator {
    pub fn new(faces: Vec<FaceCandidate>) -> Self {
        Self { faces }
    }
}

#[async_trait]
impl FaceLocator for FixedFaceLocator {
    async fn detect(&self, _image: &SourceImage) -> Result<Vec<FaceCandidate>, ToneError> {
        Ok(self.faces.clone())
    }
}
