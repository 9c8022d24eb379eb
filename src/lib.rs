// src/lib.rs
//! Personal color season analysis: samples a skin tone from a detected face,
//! classifies it into a season and undertone, and curates a palette.

use actix_web::web;
use std::sync::Arc;

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;

use crate::errors::ToneError;
use crate::services::{AnalysisStore, ColorAnalyzer, SubmissionTracker};

const MAX_JSON_BYTES: usize = 20 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<ColorAnalyzer>,
    pub store: Arc<dyn AnalysisStore>,
    pub tracker: Arc<SubmissionTracker>,
}

impl AppState {
    pub fn new(analyzer: ColorAnalyzer, store: Arc<dyn AnalysisStore>) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            store,
            tracker: Arc::new(SubmissionTracker::new()),
        }
    }
}

/// Registers the API routes. Static image serving is mounted by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    use crate::handlers::*;

    cfg.app_data(
        web::JsonConfig::default()
            .limit(MAX_JSON_BYTES)
            .error_handler(|err, _req| ToneError::Validation(err.to_string()).into()),
    )
    .service(
        web::scope("/api/v1")
            .route("/sessions", web::post().to(create_session))
            .route("/users/{user_id}/analyze", web::post().to(analyze_image))
            .route("/users/{user_id}/upload", web::post().to(upload_image))
            .route("/users/{user_id}/analyses", web::post().to(save_analysis))
            .route("/users/{user_id}/analyses", web::get().to(list_analyses))
            .route("/analyses/{analysis_id}", web::get().to(get_analysis)),
    )
    .route("/health", web::get().to(health_check));
}
