use serde::Deserialize;

use crate::services::featured::{DEFAULT_FEATURED_COUNT, MAX_FEATURED_COUNT};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// OMDb API key
    pub omdb_api_key: String,

    /// OMDb API base URL
    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    /// Base URL of the movie buddy recommendation backend
    #[serde(default = "default_recommender_url")]
    pub recommender_url: String,

    /// PostgreSQL connection URL; documents are kept in memory when unset
    #[serde(default)]
    pub database_url: Option<String>,

    /// Redis connection URL; catalog responses are not cached when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of featured movies served when the client does not ask for a count
    #[serde(default = "default_featured_count")]
    pub featured_count: usize,
}

fn default_omdb_api_url() -> String {
    "https://www.omdbapi.com".to_string()
}

fn default_recommender_url() -> String {
    "https://cinebackend-jpbq.onrender.com".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_featured_count() -> usize {
    DEFAULT_FEATURED_COUNT
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?
            .validate()
    }

    /// Rejects settings the request handlers would refuse on every call
    fn validate(self) -> anyhow::Result<Self> {
        if self.featured_count > MAX_FEATURED_COUNT {
            anyhow::bail!(
                "FEATURED_COUNT must be at most {}, got {}",
                MAX_FEATURED_COUNT,
                self.featured_count
            );
        }
        Ok(self)
    }
}
