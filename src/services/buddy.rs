/// Movie buddy: conversational recommendations
///
/// The recommendation backend turns free text into a comma separated list of
/// titles; each title is resolved against the catalog (first search hit,
/// then full details).
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::Movie,
    services::catalog::MovieCatalog,
};

/// External service that suggests movie titles for a conversation
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationBackend: Send + Sync {
    /// Raw comma separated title list for the conversation
    async fn suggest_titles(&self, conversation: &str) -> AppResult<String>;
}

#[derive(Debug, Serialize)]
struct SuggestRequest<'a> {
    conversation: &'a str,
}

#[derive(Debug, Deserialize)]
struct SuggestResponse {
    #[serde(default)]
    movie: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BackendError {
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the `/movie-name` recommendation endpoint
#[derive(Clone)]
pub struct HttpRecommendationBackend {
    http_client: HttpClient,
    api_url: String,
}

impl HttpRecommendationBackend {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
        }
    }
}

#[async_trait::async_trait]
impl RecommendationBackend for HttpRecommendationBackend {
    async fn suggest_titles(&self, conversation: &str) -> AppResult<String> {
        let url = format!("{}/movie-name", self.api_url.trim_end_matches('/'));

        let response = self
            .http_client
            .post(&url)
            .json(&SuggestRequest { conversation })
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = %status, "Recommendation backend responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<BackendError>(&body)
                .ok()
                .and_then(|e| e.error)
                .unwrap_or_else(|| format!("Recommendation backend returned status {}", status));
            return Err(AppError::ExternalApi(message));
        }

        let suggestion: SuggestResponse = response.json().await?;
        suggestion
            .movie
            .filter(|titles| !titles.trim().is_empty())
            .ok_or_else(|| {
                AppError::ExternalApi("No movie names returned from backend".to_string())
            })
    }
}

/// Splits the backend's comma separated answer into clean titles
pub fn parse_titles(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BuddyReply {
    pub titles: Vec<String>,
    pub movies: Vec<Movie>,
    pub message: String,
}

pub struct MovieBuddy {
    backend: Arc<dyn RecommendationBackend>,
    catalog: Arc<dyn MovieCatalog>,
}

impl MovieBuddy {
    pub fn new(backend: Arc<dyn RecommendationBackend>, catalog: Arc<dyn MovieCatalog>) -> Self {
        Self { backend, catalog }
    }

    /// Answers a conversation with catalog-resolved movie suggestions
    pub async fn ask(&self, conversation: &str) -> AppResult<BuddyReply> {
        let conversation = conversation.trim();
        if conversation.is_empty() {
            return Err(AppError::InvalidInput(
                "Conversation cannot be empty".to_string(),
            ));
        }

        let raw = self.backend.suggest_titles(conversation).await?;
        let titles = parse_titles(&raw);

        tracing::info!(titles = ?titles, "Buddy suggested titles");

        let mut movies: Vec<Movie> = Vec::new();
        for title in &titles {
            match self.resolve_title(title).await {
                Ok(Some(movie)) => {
                    if !movies.iter().any(|m| m.imdb_id == movie.imdb_id) {
                        movies.push(movie);
                    }
                }
                Ok(None) => tracing::debug!(title = %title, "No catalog match for suggestion"),
                Err(e) => tracing::warn!(title = %title, error = %e, "Suggestion lookup failed"),
            }
        }

        let message = if movies.is_empty() {
            format!(
                "I couldn't find any movies related to \"{}\". Try asking about a different movie or genre.",
                raw.trim()
            )
        } else {
            format!(
                "Based on your request \"{}\", I found these movies: {}",
                conversation,
                titles.join(", ")
            )
        };

        Ok(BuddyReply {
            titles,
            movies,
            message,
        })
    }

    /// First search hit for a title, with full details
    async fn resolve_title(&self, title: &str) -> AppResult<Option<Movie>> {
        let hits = self.catalog.search(title).await?;
        let Some(first) = hits.into_iter().next() else {
            return Ok(None);
        };
        let movie = self.catalog.fetch_movie(&first.imdb_id).await?;
        Ok(Some(movie))
    }
}
