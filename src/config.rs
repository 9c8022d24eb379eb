// src/config.rs
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(StoreBackend::Redis),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub redis_url: String,
    pub store_backend: StoreBackend,
    pub face_locator_url: String,
    pub face_locator_timeout: Duration,
    pub image_dir: PathBuf,
    pub public_base_url: String,
    pub sample_radius: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let face_locator_url =
            lookup("FACE_LOCATOR_URL").ok_or_else(|| "FACE_LOCATOR_URL must be set".to_string())?;

        Ok(Self {
            bind_addr: or("BIND_ADDR", "0.0.0.0:8080"),
            redis_url: or("REDIS_URL", "redis://127.0.0.1:6379"),
            store_backend: or("STORE_BACKEND", "redis").parse()?,
            face_locator_url,
            face_locator_timeout: Duration::from_secs(parse(
                "FACE_LOCATOR_TIMEOUT_SECS",
                &or("FACE_LOCATOR_TIMEOUT_SECS", "30"),
            )?),
            image_dir: PathBuf::from(or("IMAGE_DIR", "./data/images")),
            public_base_url: or("PUBLIC_BASE_URL", "http://localhost:8080"),
            sample_radius: parse("SAMPLE_RADIUS", &or("SAMPLE_RADIUS", "1"))?,
        })
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("{} has an invalid value: {}", key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig, String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let cfg = config(&[("FACE_LOCATOR_URL", "http://detector/detect")]).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080");
        assert_eq!(cfg.store_backend, StoreBackend::Redis);
        assert_eq!(cfg.sample_radius, 1);
        assert_eq!(cfg.face_locator_timeout, Duration::from_secs(30));
    }

    #[test]
    fn locator_url_is_required() {
        assert!(config(&[]).is_err());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config(&[("FACE_LOCATOR_URL", "x"), ("SAMPLE_RADIUS", "-1")]).is_err());
        assert!(config(&[("FACE_LOCATOR_URL", "x"), ("STORE_BACKEND", "sqlite")]).is_err());
    }

    #[test]
    fn memory_backend() {
        let cfg = config(&[("FACE_LOCATOR_URL", "x"), ("STORE_BACKEND", "Memory")]).unwrap();
        assert_eq!(cfg.store_backend, StoreBackend::Memory);
    }
}
