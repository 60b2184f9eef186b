use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::extraction::cache::DEFAULT_CACHE_CAPACITY;

/// Application configuration loaded from environment variables.
/// Every variable has a default; invalid values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// JSON skill catalog to load instead of the bundled one.
    pub catalog_path: Option<PathBuf>,
    pub cache_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let cache_capacity = match lookup("EXTRACTION_CACHE_CAPACITY") {
            Some(raw) => raw
                .parse::<usize>()
                .context("EXTRACTION_CACHE_CAPACITY must be a positive integer")?,
            None => DEFAULT_CACHE_CAPACITY,
        };
        if cache_capacity == 0 {
            bail!("EXTRACTION_CACHE_CAPACITY must be at least 1");
        }

        Ok(Config {
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            catalog_path: lookup("SKILL_CATALOG_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            cache_capacity,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            catalog_path: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}
