// src/handlers.rs
use crate::services::analyzer::draft_from_computed;
use crate::{AppState, errors::ToneError, models::*};
use actix_multipart::Multipart;
use actix_web::{Error, HttpResponse, web};
use futures_util::TryStreamExt;
use log::{error, info};
use uuid::Uuid;

const MAX_UPLOAD_BYTES: usize = 15 * 1024 * 1024;

pub async fn create_session() -> Result<HttpResponse, Error> {
    let session = SessionResponse {
        user_id: Uuid::new_v4().to_string(),
        created_at: chrono::Utc::now(),
    };
    info!("Started anonymous session {}", session.user_id);
    Ok(HttpResponse::Ok().json(session))
}

pub async fn analyze_image(
    path: web::Path<String>,
    data: web::Data<AppState>,
    body: web::Json<AnalyzeRequest>,
) -> Result<HttpResponse, Error> {
    let user_id = path.into_inner();
    let token = data.tracker.begin(&user_id);

    let result = match data.analyzer.image_processor().load_data_url(&body.image) {
        Ok(image) => {
            data.analyzer
                .analyze_current(&data.tracker, &user_id, token, &image)
                .await
        }
        Err(e) => Err(e),
    };

    let report = data.tracker.finish(&user_id, token, result)?;
    Ok(HttpResponse::Ok().json(report))
}

/// Collects the first multipart field, capped at [`MAX_UPLOAD_BYTES`].
async fn read_upload(payload: &mut Multipart) -> Result<Vec<u8>, Error> {
    let mut image_data = Vec::new();
    if let Some(mut field) = payload.try_next().await? {
        while let Some(chunk) = field.try_next().await? {
            if image_data.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(ToneError::InvalidImage("Upload exceeds 15MB".to_string()).into());
            }
            image_data.extend_from_slice(&chunk);
        }
    }

    if image_data.is_empty() {
        return Err(ToneError::Validation("No image provided".to_string()).into());
    }
    Ok(image_data)
}

pub async fn upload_image(
    path: web::Path<String>,
    mut payload: Multipart,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let user_id = path.into_inner();
    let image_data = read_upload(&mut payload).await?;

    // Only a fully received upload becomes a tracked submission.
    let token = data.tracker.begin(&user_id);
    let result = match data.analyzer.image_processor().load(image_data) {
        Ok(image) => {
            data.analyzer
                .analyze_current(&data.tracker, &user_id, token, &image)
                .await
        }
        Err(e) => Err(e),
    };

    let report = data.tracker.finish(&user_id, token, result)?;
    Ok(HttpResponse::Ok().json(report))
}

pub async fn save_analysis(
    path: web::Path<String>,
    data: web::Data<AppState>,
    body: web::Json<SaveAnalysisRequest>,
) -> Result<HttpResponse, Error> {
    let user_id = path.into_inner();
    let request = body.into_inner();

    let skin_tone = ColorSample::from_hex(&request.skin_tone)?;
    let image = data
        .analyzer
        .image_processor()
        .validate_data_url(&request.image)?;
    let draft = draft_from_computed(&user_id, skin_tone, request.season)?;

    let record = data.store.save(draft, &image).await.map_err(|e| {
        error!("Error saving analysis for {}: {}", user_id, e);
        e
    })?;

    info!("Saved analysis {} for {}", record.id, user_id);
    Ok(HttpResponse::Created().json(&record))
}

pub async fn list_analyses(
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let user_id = path.into_inner();

    let analyses = data.store.list_for_user(&user_id).await.map_err(|e| {
        error!("Error getting analysis history for {}: {}", user_id, e);
        e
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "user_id": user_id,
        "count": analyses.len(),
        "analyses": analyses
    })))
}

pub async fn get_analysis(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let analysis_id = path.into_inner();

    let analysis = data
        .store
        .get_by_id(&analysis_id)
        .await?
        .ok_or_else(|| ToneError::NotFound(format!("analysis {}", analysis_id)))?;

    Ok(HttpResponse::Ok().json(&analysis))
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "toned",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
