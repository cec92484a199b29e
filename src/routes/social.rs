use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    error::AppResult,
    middleware::CurrentUser,
    models::{Friend, FriendMatches, FriendRequest, Notification, SendOutcome, UserProfile},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct SendRequestBody {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: usize,
}

// Profile

/// Stored profile, or the header identity when the user never saved one
pub async fn get_me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<UserProfile>> {
    let profile = state.social.get_profile(&user.uid).await?;
    Ok(Json(profile.unwrap_or(user.0)))
}

pub async fn put_me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<UserProfile>> {
    Ok(Json(state.social.upsert_profile(&user).await?))
}

// Friends

pub async fn list_friends(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Friend>>> {
    Ok(Json(state.social.friends(&user.uid).await?))
}

pub async fn unfriend(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(friend_id): Path<String>,
) -> AppResult<StatusCode> {
    state.social.unfriend(&user.uid, &friend_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reconcile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<CountResponse>> {
    let count = state.social.reconcile(&user).await?;
    Ok(Json(CountResponse { count }))
}

pub async fn matches(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<FriendMatches>>> {
    let matches = state
        .social
        .matches_for(&state.watchlists, &user.uid)
        .await?;
    Ok(Json(matches))
}

// Friend requests

pub async fn incoming_requests(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<FriendRequest>>> {
    Ok(Json(state.social.incoming_requests(&user).await?))
}

/// 201 with the request when sent; 409 or 404 with an `outcome` field otherwise
pub async fn send_request(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<SendRequestBody>,
) -> AppResult<Response> {
    let outcome = state.social.send_request(&user, &body.email).await?;

    let response = match outcome {
        SendOutcome::Sent(request) => (StatusCode::CREATED, Json(json!(request))),
        SendOutcome::AlreadyFriends => (
            StatusCode::CONFLICT,
            Json(json!({ "outcome": "already_friends", "error": "You are already friends" })),
        ),
        SendOutcome::AlreadySent => (
            StatusCode::CONFLICT,
            Json(json!({ "outcome": "already_sent", "error": "Friend request already sent" })),
        ),
        SendOutcome::UserNotFound => (
            StatusCode::NOT_FOUND,
            Json(json!({ "outcome": "user_not_found", "error": "No user with that email" })),
        ),
    };

    Ok(response.into_response())
}

pub async fn accept_request(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<FriendRequest>> {
    Ok(Json(state.social.accept_request(&user, &id).await?))
}

pub async fn decline_request(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<FriendRequest>> {
    Ok(Json(state.social.decline_request(&user, &id).await?))
}

// Notifications

pub async fn notifications(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Notification>>> {
    Ok(Json(state.social.notifications(&user.uid).await?))
}

pub async fn mark_read(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.social.mark_read(&user.uid, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<CountResponse>> {
    let count = state.social.mark_all_read(&user.uid).await?;
    Ok(Json(CountResponse { count }))
}
