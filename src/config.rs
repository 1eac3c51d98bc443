use crate::error::{EtlError, Result};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub sources: SourcesConfig,
    pub omdb: OmdbConfig,
    pub database: DatabaseConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    pub movies_csv: String,
    pub ratings_csv: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OmdbConfig {
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    pub timeout_seconds: u64,
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Optional cap on the number of movies processed per run.
    pub max_movies: Option<usize>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| EtlError::Config(format!("Failed to read config file '{}': {}", path, e)))?;

        let mut config: Config = toml::from_str(&content)?;

        // An OMDB_API_KEY environment variable wins over the config file,
        // so the key never has to be committed alongside the config.
        if let Ok(key) = std::env::var("OMDB_API_KEY") {
            if !key.trim().is_empty() {
                config.omdb.api_key = key;
            }
        }

        Ok(config)
    }
}
