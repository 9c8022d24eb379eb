// src/services/store.rs
use crate::errors::ToneError;
use crate::models::{AnalysisDraft, AnalysisResult};
use crate::services::image_processor::EncodedImage;
use crate::services::image_store::ImageStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{error, info};
use redis::aio::Connection;
use redis::{AsyncCommands, Client};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Durable home for analysis records.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Uploads the source image, assigns `id` and `created_at`, and records the result.
    async fn save(
        &self,
        draft: AnalysisDraft,
        image: &EncodedImage,
    ) -> Result<AnalysisResult, ToneError>;

    /// Newest first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<AnalysisResult>, ToneError>;

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<AnalysisResult>, ToneError>;
}

/// Uploads the image, then hands the finished record to `write`. If the write
/// fails the uploaded file is removed again.
async fn persist<F, Fut>(
    images: &ImageStore,
    draft: AnalysisDraft,
    image: &EncodedImage,
    write: F,
) -> Result<AnalysisResult, ToneError>
where
    F: FnOnce(AnalysisResult) -> Fut,
    Fut: Future<Output = Result<(), ToneError>>,
{
    let stored = images
        .put(&draft.user_id, &image.bytes, image.extension())
        .await?;
    let record = AnalysisResult::from_draft(draft, Uuid::new_v4(), stored.url.clone(), Utc::now());

    if let Err(e) = write(record.clone()).await {
        images.discard(&stored).await;
        return Err(e);
    }
    Ok(record)
}

pub struct RedisStore {
    client: Client,
    images: Arc<ImageStore>,
}

impl RedisStore {
    pub async fn new(redis_url: &str, images: Arc<ImageStore>) -> Result<Self, ToneError> {
        let client =
            Client::open(redis_url).map_err(|e| ToneError::Persistence(e.to_string()))?;

        // Test connection
        let mut conn = client
            .get_async_connection()
            .await
            .map_err(|e| ToneError::Persistence(e.to_string()))?;

        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| ToneError::Persistence(e.to_string()))?;

        info!("Connected to redis at {}", redis_url);
        Ok(Self { client, images })
    }

    async fn connection(&self) -> Result<Connection, ToneError> {
        self.client
            .get_async_connection()
            .await
            .map_err(|e| ToneError::Persistence(e.to_string()))
    }
}

fn analysis_key(id: impl std::fmt::Display) -> String {
    format!("analysis:{}", id)
}

fn user_index_key(user_id: &str) -> String {
    format!("user:{}:analyses", user_id)
}

/// Sorted-set score. Microseconds keep saves within the same millisecond
/// ordered and stay exact as a redis double.
fn index_score(created_at: &DateTime<Utc>) -> i64 {
    created_at.timestamp_micros()
}

fn decode(value: &str) -> Result<AnalysisResult, ToneError> {
    serde_json::from_str(value)
        .map_err(|e| ToneError::Persistence(format!("Corrupt analysis record: {}", e)))
}

#[async_trait]
impl AnalysisStore for RedisStore {
    async fn save(
        &self,
        draft: AnalysisDraft,
        image: &EncodedImage,
    ) -> Result<AnalysisResult, ToneError> {
        let mut conn = self.connection().await?;

        persist(&self.images, draft, image, |record| async move {
            let value = serde_json::to_string(&record)
                .map_err(|e| ToneError::Persistence(e.to_string()))?;

            let mut pipe = redis::pipe();
            pipe.atomic()
                .set(analysis_key(record.id), value)
                .ignore()
                .zadd(
                    user_index_key(&record.user_id),
                    record.id.to_string(),
                    index_score(&record.created_at),
                )
                .ignore();

            pipe.query_async::<_, ()>(&mut conn).await.map_err(|e| {
                error!("Failed to save analysis {}: {}", record.id, e);
                ToneError::Persistence(format!("Failed to save analysis data: {}", e))
            })
        })
        .await
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<AnalysisResult>, ToneError> {
        let mut conn = self.connection().await?;

        let ids: Vec<String> = conn
            .zrevrange(user_index_key(user_id), 0, -1)
            .await
            .map_err(|e| {
                ToneError::Persistence(format!("Failed to retrieve analysis history: {}", e))
            })?;

        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            let value: Option<String> = conn
                .get(analysis_key(&id))
                .await
                .map_err(|e| {
                    ToneError::Persistence(format!("Failed to retrieve analysis history: {}", e))
                })?;
            // Index entries whose record is gone are skipped.
            if let Some(value) = value {
                records.push(decode(&value)?);
            }
        }

        Ok(records)
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<AnalysisResult>, ToneError> {
        let mut conn = self.connection().await?;

        let value: Option<String> = conn
            .get(analysis_key(id))
            .await
            .map_err(|e| ToneError::Persistence(format!("Failed to retrieve analysis: {}", e)))?;

        value.as_deref().map(decode).transpose()
    }
}

/// Process-local store with the same contract as [`RedisStore`].
pub struct MemoryStore {
    records: RwLock<Vec<AnalysisResult>>,
    images: Arc<ImageStore>,
}

impl MemoryStore {
    pub fn new(images: Arc<ImageStore>) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            images,
        }
    }
}

#[async_trait]
impl AnalysisStore for MemoryStore {
    async fn save(
        &self,
        draft: AnalysisDraft,
        image: &EncodedImage,
    ) -> Result<AnalysisResult, ToneError> {
        persist(&self.images, draft, image, |record| async move {
            self.records.write().await.push(record);
            Ok(())
        })
        .await
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<AnalysisResult>, ToneError> {
        let records = self.records.read().await;
        let mut matching: Vec<AnalysisResult> = records
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<AnalysisResult>, ToneError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == *id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColorSample, Season};
    use crate::services::image_processor::ImageProcessor;
    use crate::services::image_processor::tests::png_bytes;
    use crate::services::palette;
    use crate::services::record::AnalysisRecordBuilder;

    fn draft(user_id: &str, season: Season) -> AnalysisDraft {
        AnalysisRecordBuilder::build(
            user_id,
            "inline",
            ColorSample::new(120, 110, 100),
            season,
            season.undertone(),
            palette::curate(season),
        )
        .unwrap()
    }

    fn source() -> EncodedImage {
        ImageProcessor::new()
            .validate_image(png_bytes(2, 2, [1, 2, 3, 255]))
            .unwrap()
    }

    #[tokio::test]
    async fn save_then_fetch_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new(Arc::new(ImageStore::new(dir.path(), "http://h")));
        let built = draft("u1", Season::Autumn);

        let saved = store.save(built.clone(), &source()).await.unwrap();
        let fetched = store.get_by_id(&saved.id).await.unwrap().unwrap();

        assert_eq!(fetched, saved);
        assert_eq!(fetched.skin_tone, built.skin_tone);
        assert_eq!(fetched.season, built.season);
        assert_eq!(fetched.undertone, built.undertone);
        assert_eq!(fetched.recommended_colors, built.recommended_colors);
        assert_eq!(fetched.colors_to_avoid, built.colors_to_avoid);
        assert_ne!(fetched.image_reference, built.image_reference);
        assert!(fetched.image_reference.starts_with("http://h/images/u1/"));
    }

    #[tokio::test]
    async fn history_is_newest_first_and_per_user() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new(Arc::new(ImageStore::new(dir.path(), "http://h")));

        let first = store.save(draft("u1", Season::Spring), &source()).await.unwrap();
        let second = store.save(draft("u1", Season::Winter), &source()).await.unwrap();
        store.save(draft("u2", Season::Summer), &source()).await.unwrap();

        let history = store.list_for_user("u1").await.unwrap();

        let ids: Vec<_> = history.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn missing_id_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new(Arc::new(ImageStore::new(dir.path(), "http://h")));
        assert!(store.get_by_id(&Uuid::new_v4()).await.unwrap().is_none());
    }

    #[test]
    fn corrupt_records_are_persistence_errors() {
        assert!(matches!(decode("{"), Err(ToneError::Persistence(_))));
    }

    #[tokio::test]
    async fn failed_write_removes_uploaded_image() {
        let dir = tempfile::tempdir().unwrap();
        let images = ImageStore::new(dir.path(), "http://h");

        let result = persist(&images, draft("u1", Season::Autumn), &source(), |_| async {
            Err(ToneError::Persistence("connection reset".to_string()))
        })
        .await;

        assert!(matches!(result, Err(ToneError::Persistence(_))));
        let left = std::fs::read_dir(dir.path().join("u1")).unwrap().count();
        assert_eq!(left, 0);
    }

    #[test]
    fn index_scores_order_saves_within_a_millisecond() {
        let first = DateTime::parse_from_rfc3339("2024-05-01T10:00:00.123400Z")
            .unwrap()
            .with_timezone(&Utc);
        let second = first + chrono::Duration::microseconds(1);

        assert_eq!(first.timestamp_millis(), second.timestamp_millis());
        assert!(index_score(&second) > index_score(&first));
    }

    #[test]
    fn keys_share_one_format() {
        let id = Uuid::nil();
        assert_eq!(analysis_key(id), analysis_key(id.to_string()));
        assert_eq!(analysis_key(id), format!("analysis:{}", id));
        assert_eq!(user_index_key("u1"), "user:u1:analyses");
    }
}
