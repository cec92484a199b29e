use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Movie;

/// Identity forwarded by the authentication provider, stored under `users/{uid}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "photoURL", default)]
    pub photo_url: Option<String>,
}

impl UserProfile {
    /// Display name, falling back to the email address and then the uid
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.uid)
    }
}

/// Lowercased, trimmed email used for every comparison and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Declined,
}

/// Friend request stored under `friendRequests/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    pub id: String,
    pub from_user_id: String,
    pub from_email: String,
    #[serde(default)]
    pub from_name: Option<String>,
    pub to_email: String,
    #[serde(default)]
    pub to_user_id: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub responded_at: Option<DateTime<Utc>>,
}

/// One direction of a friendship, stored under `friends/{userId}_{friendId}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub user_id: String,
    pub friend_id: String,
    #[serde(default)]
    pub friend_email: Option<String>,
    #[serde(default)]
    pub friend_name: Option<String>,
    pub since: DateTime<Utc>,
}

impl Friend {
    pub fn document_id(user_id: &str, friend_id: &str) -> String {
        format!("{}_{}", user_id, friend_id)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    FriendRequest,
    FriendAccepted,
}

/// Feed entry stored under `notifications/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub kind: NotificationKind,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Result of sending a friend request
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    Sent(FriendRequest),
    AlreadyFriends,
    AlreadySent,
    UserNotFound,
}

/// Movies a friend shares with the viewer's watchlists
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FriendMatches {
    pub friend: Friend,
    pub movies: Vec<Movie>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_field_names() {
        let profile = UserProfile {
            uid: "u1".to_string(),
            display_name: Some("Ana".to_string()),
            email: Some("ana@example.com".to_string()),
            photo_url: None,
        };
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["displayName"], "Ana");
        assert!(value.get("photoURL").is_some());
    }

    #[test]
    fn test_profile_label_fallbacks() {
        let mut profile = UserProfile {
            uid: "u1".to_string(),
            display_name: None,
            email: Some("ana@example.com".to_string()),
            photo_url: None,
        };
        assert_eq!(profile.label(), "ana@example.com");
        profile.email = None;
        assert_eq!(profile.label(), "u1");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }

    #[test]
    fn test_request_status_serialization() {
        assert_eq!(
            serde_json::to_string(&RequestStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&NotificationKind::FriendAccepted).unwrap(),
            "\"friend_accepted\""
        );
    }

    #[test]
    fn test_friend_document_id() {
        assert_eq!(Friend::document_id("a", "b"), "a_b");
    }
}
