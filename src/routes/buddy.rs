use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{error::AppResult, services::BuddyReply};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct BuddyRequest {
    pub conversation: String,
}

/// Handler for the movie buddy endpoint
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<BuddyRequest>,
) -> AppResult<Json<BuddyReply>> {
    let reply = state.buddy.ask(&request.conversation).await?;
    Ok(Json(reply))
}
