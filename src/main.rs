// src/main.rs
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use anyhow::Context;
use log::info;
use std::sync::Arc;

use toned::config::{AppConfig, StoreBackend};
use toned::services::{
    AnalysisStore, ColorAnalyzer, HttpFaceLocator, ImageStore, MemoryStore, RedisStore,
    SkinToneSampler,
};
use toned::{AppState, configure};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting toned service...");

    let config = AppConfig::from_env().map_err(anyhow::Error::msg)?;

    std::fs::create_dir_all(&config.image_dir)
        .with_context(|| format!("creating {}", config.image_dir.display()))?;
    let images = Arc::new(ImageStore::new(
        config.image_dir.clone(),
        &config.public_base_url,
    ));

    // Initialize services
    let store: Arc<dyn AnalysisStore> = match config.store_backend {
        StoreBackend::Redis => Arc::new(
            RedisStore::new(&config.redis_url, images.clone())
                .await
                .context("connecting to redis")?,
        ),
        StoreBackend::Memory => Arc::new(MemoryStore::new(images.clone())),
    };
    let locator = Arc::new(
        HttpFaceLocator::new(config.face_locator_url.clone(), config.face_locator_timeout)
            .context("building face locator client")?,
    );
    let analyzer = ColorAnalyzer::new(locator, SkinToneSampler::new(config.sample_radius));

    let app_state = AppState::new(analyzer, store);
    let image_dir = config.image_dir.clone();

    info!("Starting HTTP server on {}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .configure(configure)
            .service(Files::new("/images", image_dir.clone()))
    })
    .bind(&config.bind_addr)?
    .run()
    .await?;

    Ok(())
}
