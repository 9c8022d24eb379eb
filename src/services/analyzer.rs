// src/services/analyzer.rs
use crate::errors::ToneError;
use crate::models::{AnalysisDraft, AnalysisReport, ColorSample, Season};
use crate::services::face_locator::FaceLocator;
use crate::services::image_processor::{ImageProcessor, SourceImage};
use crate::services::record::AnalysisRecordBuilder;
use crate::services::sampler::SkinToneSampler;
use crate::services::{classifier, palette};
use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Runs one image through locate → sample → classify → curate.
pub struct ColorAnalyzer {
    locator: Arc<dyn FaceLocator>,
    sampler: SkinToneSampler,
    image_processor: ImageProcessor,
}

impl ColorAnalyzer {
    pub fn new(locator: Arc<dyn FaceLocator>, sampler: SkinToneSampler) -> Self {
        Self {
            locator,
            sampler,
            image_processor: ImageProcessor::new(),
        }
    }

    pub fn image_processor(&self) -> &ImageProcessor {
        &self.image_processor
    }

    pub async fn analyze(&self, image: &SourceImage) -> Result<AnalysisReport, ToneError> {
        let faces = self.locator.detect(image).await?;
        debug!("Detected {} faces", faces.len());

        let skin_tone = self.sampler.sample(&image.pixels, &faces)?;
        let (season, undertone) = classifier::classify(skin_tone);
        info!(
            "Classified skin tone {} as {} / {}",
            skin_tone.hex(),
            season,
            undertone
        );

        let (recommended_colors, colors_to_avoid) = palette::partition(palette::curate(season));

        Ok(AnalysisReport {
            faces_detected: faces.len(),
            skin_tone,
            skin_tone_hex: skin_tone.hex(),
            season,
            undertone,
            recommended_colors,
            colors_to_avoid,
        })
    }

    /// Analyses `image` for a tracked submission. Detection is skipped once a
    /// newer submission for the same user has arrived.
    pub async fn analyze_current(
        &self,
        tracker: &SubmissionTracker,
        user_id: &str,
        token: u64,
        image: &SourceImage,
    ) -> Result<AnalysisReport, ToneError> {
        if !tracker.is_current(user_id, token) {
            debug!("Skipping detection for stale token {} of {}", token, user_id);
            return Err(ToneError::Superseded);
        }
        self.analyze(image).await
    }
}

/// Assembles a draft from values already produced by [`ColorAnalyzer`].
/// Nothing is re-sampled; the season must be the one `skin_tone` classifies as.
pub fn draft_from_computed(
    user_id: &str,
    skin_tone: ColorSample,
    season: Season,
) -> Result<AnalysisDraft, ToneError> {
    let (classified, _) = classifier::classify(skin_tone);
    if classified != season {
        return Err(ToneError::Validation(format!(
            "Skin tone {} classifies as {}, not {}",
            skin_tone.hex(),
            classified,
            season
        )));
    }

    AnalysisRecordBuilder::build(
        user_id,
        "",
        skin_tone,
        season,
        season.undertone(),
        palette::curate(season),
    )
}

/// Last-submission-wins bookkeeping for in-flight analyses, keyed by user.
#[derive(Default)]
pub struct SubmissionTracker {
    next: AtomicU64,
    latest: Mutex<HashMap<String, u64>>,
}

impl SubmissionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new submission; any earlier token for the user becomes stale.
    pub fn begin(&self, user_id: &str) -> u64 {
        let token = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        let mut latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        latest.insert(user_id.to_string(), token);
        token
    }

    pub fn is_current(&self, user_id: &str, token: u64) -> bool {
        let latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        latest.get(user_id) == Some(&token)
    }

    /// Returns `result` if `token` is still the newest submission, `Superseded` otherwise.
    pub fn finish<T>(
        &self,
        user_id: &str,
        token: u64,
        result: Result<T, ToneError>,
    ) -> Result<T, ToneError> {
        let mut latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        if latest.get(user_id) != Some(&token) {
            debug!("Discarding stale analysis token {} for {}", token, user_id);
            return Err(ToneError::Superseded);
        }
        latest.remove(user_id);
        result
    }
}
