use std::sync::Arc;

use std::collections::HashMap;

use async_trait::async_trait;
use axum::{
    extract::{Query, State},
    http::{HeaderName, HeaderValue},
    routing::get,
    Json, Router,
};
use axum_test::{TestRequest, TestServer};
use serde_json::{json, Value};

use cinephile::{
    db::MemoryStore,
    error::{AppError, AppResult},
    models::Movie,
    routes::{create_router, AppState},
    services::{MovieCatalog, OmdbClient, RecommendationBackend},
};

/// Catalog answering from a fixed set of movies
///
/// Any `tt` id resolves to a synthesized record so featured sampling always
/// succeeds; ids starting with `tt000` are unknown.
pub struct StubCatalog {
    movies: Vec<Movie>,
}

pub fn movie(id: &str, title: &str, genre: &str) -> Movie {
    Movie {
        title: title.to_string(),
        year: "2010".to_string(),
        imdb_id: id.to_string(),
        kind: "movie".to_string(),
        poster: "N/A".to_string(),
        rating: Some("8.0".to_string()),
        genre: Some(genre.to_string()),
        ..Default::default()
    }
}

impl StubCatalog {
    pub fn new() -> Self {
        Self {
            movies: vec![
                movie("tt0133093", "The Matrix", "Action, Sci-Fi"),
                movie("tt0234215", "The Matrix Reloaded", "Action, Sci-Fi"),
                movie("tt1375666", "Inception", "Action, Adventure, Sci-Fi"),
                movie("tt0081505", "The Shining", "Drama, Horror"),
                movie("tt7888888", "Horror Express", "Comedy"),
                movie("tt5555555", "Drama Club", "Drama, Comedy"),
            ],
        }
    }
}

#[async_trait]
impl MovieCatalog for StubCatalog {
    async fn search(&self, query: &str) -> AppResult<Vec<Movie>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }
        Ok(self
            .movies
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&query))
            .map(|m| Movie {
                title: m.title.clone(),
                year: m.year.clone(),
                imdb_id: m.imdb_id.clone(),
                kind: m.kind.clone(),
                poster: m.poster.clone(),
                ..Default::default()
            })
            .collect())
    }

    async fn fetch_movie(&self, imdb_id: &str) -> AppResult<Movie> {
        if let Some(found) = self.movies.iter().find(|m| m.imdb_id == imdb_id) {
            return Ok(found.clone());
        }
        if imdb_id.starts_with("tt000") || !imdb_id.starts_with("tt") {
            return Err(AppError::ExternalApi("Incorrect IMDb ID.".to_string()));
        }
        Ok(movie(imdb_id, &format!("Movie {}", imdb_id), "Drama"))
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Recommendation backend returning a fixed answer
pub struct StubBackend;

#[async_trait]
impl RecommendationBackend for StubBackend {
    async fn suggest_titles(&self, _conversation: &str) -> AppResult<String> {
        Ok("Inception, Some Unknown Film, The Matrix".to_string())
    }
}

pub fn create_test_server() -> TestServer {
    let state = AppState::new(
        Arc::new(StubCatalog::new()),
        Arc::new(StubBackend),
        Arc::new(MemoryStore::new()),
        8,
    );
    TestServer::builder()
        .build(create_router(state))
        .expect("Failed to build TestServer")
}

/// Answers OMDb `s=` and `i=` queries from the stub catalog's movies
async fn fake_omdb(
    State(movies): State<Arc<Vec<Movie>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    if let Some(query) = params.get("s") {
        let query = query.to_lowercase();
        let hits: Vec<Value> = movies
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&query))
            .map(|m| {
                json!({
                    "Title": m.title,
                    "Year": m.year,
                    "imdbID": m.imdb_id,
                    "Type": m.kind,
                    "Poster": m.poster,
                })
            })
            .collect();
        return Json(json!({
            "Search": hits,
            "totalResults": hits.len().to_string(),
            "Response": "True",
        }));
    }

    let id = params.get("i").map(String::as_str).unwrap_or_default();
    match movies.iter().find(|m| m.imdb_id == id) {
        Some(found) => {
            let mut body = serde_json::to_value(found).unwrap();
            body["Response"] = json!("True");
            Json(body)
        }
        None => Json(json!({ "Response": "False", "Error": "Incorrect IMDb ID." })),
    }
}

/// Test server whose catalog is a real `OmdbClient` talking to a local fake
pub async fn create_omdb_backed_server() -> TestServer {
    let fake = Router::new()
        .route("/", get(fake_omdb))
        .with_state(Arc::new(StubCatalog::new().movies));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, fake).await.unwrap();
    });

    let catalog = OmdbClient::new("test_key".to_string(), format!("http://{}", addr), None);
    let state = AppState::new(
        Arc::new(catalog),
        Arc::new(StubBackend),
        Arc::new(MemoryStore::new()),
        8,
    );
    TestServer::builder()
        .build(create_router(state))
        .expect("Failed to build TestServer")
}

pub struct TestUser {
    pub uid: &'static str,
    pub email: &'static str,
    pub name: &'static str,
}

pub const ANA: TestUser = TestUser {
    uid: "ana",
    email: "ana@example.com",
    name: "Ana",
};

pub const BO: TestUser = TestUser {
    uid: "bo",
    email: "bo@example.com",
    name: "Bo",
};

/// Adds the identity headers the front end forwards for a signed-in user
pub fn signed_in(request: TestRequest, user: &TestUser) -> TestRequest {
    request
        .add_header(
            HeaderName::from_static("x-user-id"),
            HeaderValue::from_static(user.uid),
        )
        .add_header(
            HeaderName::from_static("x-user-email"),
            HeaderValue::from_static(user.email),
        )
        .add_header(
            HeaderName::from_static("x-user-name"),
            HeaderValue::from_static(user.name),
        )
}
