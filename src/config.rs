// src/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub results_path: PathBuf,
    pub search_query: String,
    pub search_location: String,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: AppConfig,
    production: AppConfig,
}

impl AppConfig {
    /// Load configuration for the current environment. Without a
    /// config.yaml the built-in defaults apply, so the CLI works out of
    /// the box.
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();

        let config_path = PathBuf::from(CONFIG_FILE);
        if !config_path.exists() {
            info!("No {} found, using default configuration", CONFIG_FILE);
            return Ok(Self::default_config());
        }

        info!("Loading configuration for environment: {}", environment);
        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", CONFIG_FILE))?;
        let config_file: ConfigFile =
            serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", CONFIG_FILE))?;

        let config = match environment.as_str() {
            "production" => config_file.production,
            _ => config_file.local,
        };

        Ok(Self {
            database_path: Self::resolve_path(config.database_path)?,
            results_path: Self::resolve_path(config.results_path)?,
            search_query: config.search_query,
            search_location: config.search_location,
        })
    }

    fn get_environment() -> String {
        std::env::var("JOBSCOUT_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn resolve_path(path: PathBuf) -> Result<PathBuf> {
        if path.is_absolute() {
            return Ok(path);
        }
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(current_dir.join(path))
    }

    fn default_config() -> Self {
        Self {
            database_path: PathBuf::from("data/jobs.sqlite"),
            results_path: PathBuf::from("data/results"),
            search_query: "software developer".to_string(),
            search_location: "Boston,Massachusetts".to_string(),
        }
    }

    /// The SerpApi key lives in the environment only, never in config.yaml.
    pub fn api_key() -> Result<String> {
        std::env::var("SERPAPI_KEY")
            .map_err(|_| anyhow::anyhow!("SERPAPI_KEY environment variable not set"))
    }
}
