use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::Movie,
    services::{catalog, featured::MAX_FEATURED_COUNT, genres},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Deserialize)]
pub struct FeaturedQuery {
    count: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct GenreQuery {
    #[serde(default)]
    genres: String,
}

/// Title search with details for every hit
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let movies = catalog::search_with_details(state.catalog.as_ref(), &params.q).await?;
    Ok(Json(movies))
}

fn featured_count(state: &AppState, params: &FeaturedQuery) -> AppResult<usize> {
    let count = params.count.unwrap_or(state.featured_count);
    if count > MAX_FEATURED_COUNT {
        return Err(AppError::InvalidInput(format!(
            "count must be at most {}",
            MAX_FEATURED_COUNT
        )));
    }
    Ok(count)
}

pub async fn featured(
    State(state): State<AppState>,
    Query(params): Query<FeaturedQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let count = featured_count(&state, &params)?;
    Ok(Json(state.featured.featured(count).await))
}

/// Draws a new featured sample
pub async fn refresh_featured(
    State(state): State<AppState>,
    Query(params): Query<FeaturedQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let count = featured_count(&state, &params)?;
    Ok(Json(state.featured.refresh(count).await))
}

pub async fn genre_list() -> Json<&'static [&'static str]> {
    Json(genres::GENRES)
}

/// Movies matching any of the comma separated `genres`
pub async fn by_genre(
    State(state): State<AppState>,
    Query(params): Query<GenreQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let selected = genres::parse_genres(&params.genres);
    Ok(Json(genres::browse(state.catalog.as_ref(), &selected).await))
}

/// Full details for one movie; an unknown id yields a record carrying only the id
pub async fn details(
    State(state): State<AppState>,
    Path(imdb_id): Path<String>,
) -> AppResult<Json<Movie>> {
    Ok(Json(
        catalog::movie_details(state.catalog.as_ref(), imdb_id).await,
    ))
}
