use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

pub mod buddy;
pub mod movies;
pub mod social;
pub mod state;
pub mod watchlist;

pub use state::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/movies/search", get(movies::search))
        .route("/movies/featured", get(movies::featured))
        .route("/movies/featured/refresh", post(movies::refresh_featured))
        .route("/movies/genres", get(movies::genre_list))
        .route("/movies/genre", get(movies::by_genre))
        .route("/movies/{imdb_id}", get(movies::details))
        .route("/buddy", post(buddy::ask))
        // Profile
        .route("/me", get(social::get_me).put(social::put_me))
        // Watchlist
        .route("/watchlist", get(watchlist::get_watchlist))
        .route("/watchlist/move", post(watchlist::move_movie))
        .route(
            "/watchlist/{list}",
            post(watchlist::add_movie).delete(watchlist::remove_movie),
        )
        .route(
            "/watchlist/{list}/{imdb_id}",
            delete(watchlist::remove_movie_by_id),
        )
        // Friends
        .route("/friends", get(social::list_friends))
        .route("/friends/reconcile", post(social::reconcile))
        .route("/friends/matches", get(social::matches))
        .route("/friends/{friend_id}", delete(social::unfriend))
        .route(
            "/friend-requests",
            get(social::incoming_requests).post(social::send_request),
        )
        .route("/friend-requests/{id}/accept", post(social::accept_request))
        .route("/friend-requests/{id}/decline", post(social::decline_request))
        // Notifications
        .route("/notifications", get(social::notifications))
        .route("/notifications/read-all", post(social::mark_all_read))
        .route("/notifications/{id}/read", post(social::mark_read))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
