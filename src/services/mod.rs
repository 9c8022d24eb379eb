// src/services/mod.rs
pub mod analyzer;
pub mod classifier;
pub mod face_locator;
pub mod image_processor;
pub mod image_store;
pub mod palette;
pub mod record;
pub mod sampler;
pub mod store;

pub use analyzer::{ColorAnalyzer, SubmissionTracker};
pub use face_locator::{FaceLocator, FixedFaceLocator, HttpFaceLocator};
pub use image_processor::{EncodedImage, ImageProcessor, SourceImage};
pub use image_store::{ImageStore, StoredImage};
pub use sampler::SkinToneSampler;
pub use store::{AnalysisStore, MemoryStore, RedisStore};
