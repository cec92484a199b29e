/// OMDb catalog client
///
/// API Flow:
/// 1. Title search: `?apikey=..&s={query}` → `{Search: [...], totalResults, Response}`
/// 2. Details: `?apikey=..&i={imdb_id}&plot=short` → full record with `Response`
///
/// OMDb reports "not found" with HTTP 200 and `Response: "False"`; searches turn
/// that into an empty list, detail lookups into an error. A `"N/A"` poster is
/// replaced with the placeholder image before anything is cached or returned.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{Movie, OmdbEnvelope, OmdbSearchResponse},
    services::catalog::MovieCatalog,
};
use reqwest::Client as HttpClient;

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour
const DETAILS_CACHE_TTL: u64 = 86400; // 1 day

#[derive(Clone)]
pub struct OmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Option<Cache>,
}

impl OmdbClient {
    pub fn new(api_key: String, api_url: String, cache: Option<Cache>) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            cache,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/", self.api_url.trim_end_matches('/'))
    }

    /// Issues a GET with the API key and returns the JSON body
    async fn get_json(&self, params: &[(&str, &str)]) -> AppResult<serde_json::Value> {
        let response = self
            .http_client
            .get(self.endpoint())
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OMDb API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    async fn request_search(&self, query: &str) -> AppResult<Vec<Movie>> {
        let body = self.get_json(&[("s", query)]).await?;
        let movies = parse_search_response(body)?;

        tracing::info!(
            query = %query,
            results = movies.len(),
            catalog = "omdb",
            "Title search completed"
        );

        Ok(movies)
    }

    async fn request_movie(&self, imdb_id: &str) -> AppResult<Movie> {
        let body = self
            .get_json(&[("i", imdb_id), ("plot", "short")])
            .await?;
        let movie = parse_detail_response(body)?;

        tracing::debug!(imdb_id = %imdb_id, title = %movie.title, "Movie details fetched");

        Ok(movie)
    }
}

/// Extracts search hits, treating `Response: "False"` as no results
fn parse_search_response(body: serde_json::Value) -> AppResult<Vec<Movie>> {
    let response: OmdbSearchResponse = serde_json::from_value(body)
        .map_err(|e| AppError::ExternalApi(format!("Failed to parse OMDb search: {}", e)))?;

    if !response.response.eq_ignore_ascii_case("true") {
        tracing::debug!(
            error = response.error.as_deref().unwrap_or("unknown"),
            "OMDb search returned no results"
        );
        return Ok(Vec::new());
    }

    Ok(response
        .search
        .into_iter()
        .filter(|movie| !movie.imdb_id.is_empty())
        .map(Movie::with_poster_fallback)
        .collect())
}

/// Extracts a detail record, treating `Response: "False"` as an error
fn parse_detail_response(body: serde_json::Value) -> AppResult<Movie> {
    let envelope: OmdbEnvelope = serde_json::from_value(body.clone())
        .map_err(|e| AppError::ExternalApi(format!("Failed to parse OMDb details: {}", e)))?;

    if !envelope.is_success() {
        return Err(AppError::ExternalApi(
            envelope
                .error
                .unwrap_or_else(|| "OMDb lookup failed".to_string()),
        ));
    }

    serde_json::from_value(body)
        .map(Movie::with_poster_fallback)
        .map_err(|e| AppError::ExternalApi(format!("Failed to parse OMDb details: {}", e)))
}

#[async_trait::async_trait]
impl MovieCatalog for OmdbClient {
    async fn search(&self, query: &str) -> AppResult<Vec<Movie>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        match &self.cache {
            Some(cache) => cached!(
                cache,
                CacheKey::MovieSearch(query.to_string()),
                SEARCH_CACHE_TTL,
                self.request_search(query)
            ),
            None => self.request_search(query).await,
        }
    }

    async fn fetch_movie(&self, imdb_id: &str) -> AppResult<Movie> {
        let imdb_id = imdb_id.trim();
        if imdb_id.is_empty() {
            return Err(AppError::InvalidInput("IMDb id cannot be empty".to_string()));
        }

        match &self.cache {
            Some(cache) => cached!(
                cache,
                CacheKey::MovieDetails(imdb_id.to_string()),
                DETAILS_CACHE_TTL,
                self.request_movie(imdb_id)
            ),
            None => self.request_movie(imdb_id).await,
        }
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}
