use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    middleware::CurrentUser,
    models::{ListKind, Movie, Watchlist},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub from: ListKind,
    pub movie: Movie,
}

#[derive(Debug, Serialize)]
pub struct RemovedResponse {
    pub removed: usize,
}

pub async fn get_watchlist(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Watchlist>> {
    Ok(Json(state.watchlists.get(&user.uid).await?))
}

pub async fn add_movie(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(list): Path<String>,
    Json(movie): Json<Movie>,
) -> AppResult<Json<Watchlist>> {
    let kind: ListKind = list.parse()?;
    Ok(Json(state.watchlists.add(&user.uid, kind, &movie).await?))
}

/// Removes the exact stored record sent in the body
pub async fn remove_movie(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(list): Path<String>,
    Json(movie): Json<Movie>,
) -> AppResult<Json<Watchlist>> {
    let kind: ListKind = list.parse()?;
    Ok(Json(state.watchlists.remove(&user.uid, kind, &movie).await?))
}

pub async fn remove_movie_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((list, imdb_id)): Path<(String, String)>,
) -> AppResult<Json<RemovedResponse>> {
    let kind: ListKind = list.parse()?;
    let removed = state
        .watchlists
        .remove_by_id(&user.uid, kind, &imdb_id)
        .await?;
    Ok(Json(RemovedResponse { removed }))
}

pub async fn move_movie(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<MoveRequest>,
) -> AppResult<Json<Watchlist>> {
    let list = state
        .watchlists
        .move_movie(&user.uid, request.from, &request.movie)
        .await?;
    Ok(Json(list))
}
