/// Signed-in user extracted from identity headers
///
/// Authentication happens upstream; the front end forwards the verified
/// identity in `x-user-*` headers on every request.
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{error::AppError, models::UserProfile};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_NAME_HEADER: &str = "x-user-name";
pub const USER_PHOTO_HEADER: &str = "x-user-photo";

/// Extractor for routes that require a signed-in user; rejects with 401
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserProfile);

impl std::ops::Deref for CurrentUser {
    type Target = UserProfile;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn header(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let uid = header(parts, USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthorized("Sign in required".to_string()))?;

        Ok(CurrentUser(UserProfile {
            uid,
            display_name: header(parts, USER_NAME_HEADER),
            email: header(parts, USER_EMAIL_HEADER),
            photo_url: header(parts, USER_PHOTO_HEADER),
        }))
    }
}
