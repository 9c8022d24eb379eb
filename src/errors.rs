// src/errors.rs
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToneError {
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("No faces detected in the image")]
    NoFaceDetected,

    #[error("Sample point ({x}, {y}) is outside a {width}x{height} image")]
    SampleOutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    #[error("Face locator error: {0}")]
    FaceLocator(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Analysis superseded by a newer submission")]
    Superseded,
}

impl ToneError {
    /// Stable machine-readable code for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ToneError::InvalidImage(_) => "invalid_image",
            ToneError::NoFaceDetected => "no_face_detected",
            ToneError::SampleOutOfBounds { .. } => "sample_out_of_bounds",
            ToneError::FaceLocator(_) => "face_locator_failure",
            ToneError::Persistence(_) => "persistence_failure",
            ToneError::NotFound(_) => "not_found",
            ToneError::Validation(_) => "validation",
            ToneError::Superseded => "superseded",
        }
    }

    fn user_message(&self) -> String {
        match self {
            ToneError::NoFaceDetected => {
                "No faces detected in the image. Please try another photo.".to_string()
            }
            ToneError::SampleOutOfBounds { .. } => {
                "An error occurred during analysis. Please try again.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl ResponseError for ToneError {
    fn status_code(&self) -> StatusCode {
        match self {
            ToneError::InvalidImage(_) | ToneError::Validation(_) => StatusCode::BAD_REQUEST,
            ToneError::NoFaceDetected => StatusCode::UNPROCESSABLE_ENTITY,
            ToneError::SampleOutOfBounds { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ToneError::FaceLocator(_) | ToneError::Persistence(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ToneError::NotFound(_) => StatusCode::NOT_FOUND,
            ToneError::Superseded => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.kind(),
            "message": self.user_message()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(
            ToneError::NoFaceDetected.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ToneError::Persistence("down".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(ToneError::Superseded.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ToneError::InvalidImage("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn kinds_are_distinct() {
        let errors = [
            ToneError::InvalidImage(String::new()),
            ToneError::NoFaceDetected,
            ToneError::SampleOutOfBounds {
                x: 0,
                y: 0,
                width: 0,
                height: 0,
            },
            ToneError::FaceLocator(String::new()),
            ToneError::Persistence(String::new()),
            ToneError::NotFound(String::new()),
            ToneError::Validation(String::new()),
            ToneError::Superseded,
        ];
        let mut kinds: Vec<_> = errors.iter().map(|e| e.kind()).collect();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), errors.len());
    }
}
