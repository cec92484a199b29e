/// Friends, friend requests and notifications
///
/// Request Flow:
/// 1. Send: sender → `friendRequests/{uuid}` (pending) + `friend_request` notification
/// 2. Accept: status accepted → edge recipient→sender → edge sender→recipient
///    → `friend_accepted` notification for the sender
///
/// The store has no multi-document transactions, so acceptance is a sequence
/// of idempotent steps. Edge ids are deterministic (`{userId}_{friendId}`), so
/// accepting again or running `reconcile` fills in whatever a failed
/// acceptance left missing.
use chrono::Utc;
use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::{collections::HashSet, sync::Arc};
use uuid::Uuid;

use crate::{
    db::{store::not_found, Document, DocumentStore},
    error::{AppError, AppResult},
    models::{
        social::normalize_email, Friend, FriendMatches, FriendRequest, Movie, Notification,
        NotificationKind, RequestStatus, SendOutcome, UserProfile, Watchlist,
    },
    services::watchlist::WatchlistService,
};

pub const USERS: &str = "users";
pub const FRIENDS: &str = "friends";
pub const FRIEND_REQUESTS: &str = "friendRequests";
pub const NOTIFICATIONS: &str = "notifications";

fn decode<T: DeserializeOwned>(doc: Document) -> AppResult<T> {
    Ok(serde_json::from_value(doc.data)?)
}

fn decode_all<T: DeserializeOwned>(docs: Vec<Document>) -> AppResult<Vec<T>> {
    docs.into_iter().map(decode).collect()
}

/// Movies the viewer shares with a friend, in the viewer's order without repeats
///
/// Both lists of each side count; membership is by IMDb id.
pub fn movie_matches(mine: &Watchlist, theirs: &Watchlist) -> Vec<Movie> {
    let theirs: HashSet<&str> = theirs.combined().map(|m| m.imdb_id.as_str()).collect();
    let mut seen: HashSet<&str> = HashSet::new();

    mine.combined()
        .filter(|m| theirs.contains(m.imdb_id.as_str()) && seen.insert(m.imdb_id.as_str()))
        .cloned()
        .collect()
}

pub struct SocialService {
    store: Arc<dyn DocumentStore>,
}

impl SocialService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    // Profiles

    /// Stores the signed-in identity under `users/{uid}`
    pub async fn upsert_profile(&self, profile: &UserProfile) -> AppResult<UserProfile> {
        let mut profile = profile.clone();
        profile.email = profile
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|e| !e.is_empty());

        self.store
            .set(USERS, &profile.uid, serde_json::to_value(&profile)?)
            .await?;

        tracing::info!(uid = %profile.uid, "User profile saved");

        Ok(profile)
    }

    pub async fn get_profile(&self, uid: &str) -> AppResult<Option<UserProfile>> {
        match self.store.get(USERS, uid).await? {
            Some(data) => Ok(Some(serde_json::from_value(data)?)),
            None => Ok(None),
        }
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserProfile>> {
        let docs = self.store.query(USERS, &[("email", json!(email))]).await?;
        docs.into_iter().next().map(decode).transpose()
    }

    // Requests

    /// Sends a friend request from `sender` to the account registered under `to_email`
    pub async fn send_request(&self, sender: &UserProfile, to_email: &str) -> AppResult<SendOutcome> {
        let sender_email = sender
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                AppError::InvalidInput("An email address is required to send requests".to_string())
            })?;
        let target_email = normalize_email(to_email);

        if target_email.is_empty() {
            return Err(AppError::InvalidInput("Email cannot be empty".to_string()));
        }
        if target_email == sender_email {
            return Err(AppError::InvalidInput(
                "You cannot send a friend request to yourself".to_string(),
            ));
        }

        let existing_edges = self
            .store
            .query(
                FRIENDS,
                &[
                    ("userId", json!(sender.uid)),
                    ("friendEmail", json!(target_email)),
                ],
            )
            .await?;
        if !existing_edges.is_empty() {
            return Ok(SendOutcome::AlreadyFriends);
        }

        let pending = self
            .store
            .query(
                FRIEND_REQUESTS,
                &[
                    ("fromUserId", json!(sender.uid)),
                    ("toEmail", json!(target_email)),
                    ("status", json!(RequestStatus::Pending)),
                ],
            )
            .await?;
        if !pending.is_empty() {
            return Ok(SendOutcome::AlreadySent);
        }

        let Some(target) = self.find_user_by_email(&target_email).await? else {
            return Ok(SendOutcome::UserNotFound);
        };
        if target.uid == sender.uid {
            return Err(AppError::InvalidInput(
                "You cannot send a friend request to yourself".to_string(),
            ));
        }

        let request = FriendRequest {
            id: Uuid::new_v4().to_string(),
            from_user_id: sender.uid.clone(),
            from_email: sender_email,
            from_name: sender.display_name.clone(),
            to_email: target_email,
            to_user_id: Some(target.uid.clone()),
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            responded_at: None,
        };

        self.store
            .set(FRIEND_REQUESTS, &request.id, serde_json::to_value(&request)?)
            .await?;

        self.notify(
            &target.uid,
            NotificationKind::FriendRequest,
            format!("{} sent you a friend request", sender.label()),
        )
        .await?;

        tracing::info!(
            request_id = %request.id,
            from = %sender.uid,
            to = %target.uid,
            "Friend request sent"
        );

        Ok(SendOutcome::Sent(request))
    }

    async fn get_request(&self, id: &str) -> AppResult<FriendRequest> {
        let data = self
            .store
            .get(FRIEND_REQUESTS, id)
            .await?
            .ok_or_else(|| not_found(FRIEND_REQUESTS, id))?;
        Ok(serde_json::from_value(data)?)
    }

    fn ensure_recipient(user: &UserProfile, request: &FriendRequest) -> AppResult<()> {
        let by_id = request.to_user_id.as_deref() == Some(user.uid.as_str());
        let by_email = user
            .email
            .as_deref()
            .map(normalize_email)
            .is_some_and(|email| email == request.to_email);

        if by_id || by_email {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Only the recipient can respond to a friend request".to_string(),
            ))
        }
    }

    /// Accepts a request addressed to `user`
    ///
    /// Safe to repeat: an accepted request re-runs the edge writes, which only
    /// create what is missing, and does not notify the sender again.
    pub async fn accept_request(&self, user: &UserProfile, id: &str) -> AppResult<FriendRequest> {
        let mut request = self.get_request(id).await?;
        Self::ensure_recipient(user, &request)?;

        let first_acceptance = match request.status {
            RequestStatus::Declined => {
                return Err(AppError::Conflict(
                    "A declined request cannot be accepted".to_string(),
                ))
            }
            RequestStatus::Pending => true,
            RequestStatus::Accepted => false,
        };

        if first_acceptance {
            let now = Utc::now();
            self.store
                .update(
                    FRIEND_REQUESTS,
                    id,
                    json!({
                        "status": RequestStatus::Accepted,
                        "respondedAt": now,
                        "toUserId": user.uid,
                    }),
                )
                .await?;
            request.status = RequestStatus::Accepted;
            request.responded_at = Some(now);
            request.to_user_id = Some(user.uid.clone());
        }

        let created = self.ensure_friendship(&request, user).await?;

        if first_acceptance {
            self.notify(
                &request.from_user_id,
                NotificationKind::FriendAccepted,
                format!("{} accepted your friend request", user.label()),
            )
            .await?;
        }

        tracing::info!(
            request_id = %id,
            user = %user.uid,
            friend = %request.from_user_id,
            edges_created = created,
            repeated = !first_acceptance,
            "Friend request accepted"
        );

        Ok(request)
    }

    /// Declines a pending request addressed to `user`
    pub async fn decline_request(&self, user: &UserProfile, id: &str) -> AppResult<FriendRequest> {
        let mut request = self.get_request(id).await?;
        Self::ensure_recipient(user, &request)?;

        match request.status {
            RequestStatus::Accepted => {
                return Err(AppError::Conflict(
                    "An accepted request cannot be declined".to_string(),
                ))
            }
            RequestStatus::Declined => return Ok(request),
            RequestStatus::Pending => {}
        }

        let now = Utc::now();
        self.store
            .update(
                FRIEND_REQUESTS,
                id,
                json!({ "status": RequestStatus::Declined, "respondedAt": now }),
            )
            .await?;
        request.status = RequestStatus::Declined;
        request.responded_at = Some(now);

        tracing::info!(request_id = %id, user = %user.uid, "Friend request declined");

        Ok(request)
    }

    /// Pending requests addressed to the user's email, newest first
    pub async fn incoming_requests(&self, user: &UserProfile) -> AppResult<Vec<FriendRequest>> {
        let Some(email) = user.email.as_deref().map(normalize_email) else {
            return Ok(Vec::new());
        };

        let docs = self
            .store
            .query(
                FRIEND_REQUESTS,
                &[
                    ("toEmail", json!(email)),
                    ("status", json!(RequestStatus::Pending)),
                ],
            )
            .await?;
        let mut requests: Vec<FriendRequest> = decode_all(docs)?;
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    // Friendships

    /// Writes `friends/{user}_{friend}` unless it already exists; returns whether it was created
    async fn ensure_edge(
        &self,
        user_id: &str,
        friend_id: &str,
        friend_email: Option<String>,
        friend_name: Option<String>,
    ) -> AppResult<bool> {
        let edge_id = Friend::document_id(user_id, friend_id);
        if self.store.get(FRIENDS, &edge_id).await?.is_some() {
            return Ok(false);
        }

        let edge = Friend {
            user_id: user_id.to_string(),
            friend_id: friend_id.to_string(),
            friend_email,
            friend_name,
            since: Utc::now(),
        };
        self.store
            .set(FRIENDS, &edge_id, serde_json::to_value(&edge)?)
            .await?;
        Ok(true)
    }

    /// Both edges for an accepted request; returns how many were created
    async fn ensure_friendship(
        &self,
        request: &FriendRequest,
        recipient: &UserProfile,
    ) -> AppResult<usize> {
        let recipient_email = recipient
            .email
            .as_deref()
            .map(normalize_email)
            .unwrap_or_else(|| request.to_email.clone());

        let mut created = 0;
        if self
            .ensure_edge(
                &recipient.uid,
                &request.from_user_id,
                Some(request.from_email.clone()),
                request.from_name.clone(),
            )
            .await?
        {
            created += 1;
        }
        if self
            .ensure_edge(
                &request.from_user_id,
                &recipient.uid,
                Some(recipient_email),
                recipient.display_name.clone(),
            )
            .await?
        {
            created += 1;
        }
        Ok(created)
    }

    /// Recreates missing edges for every accepted request involving `user`
    ///
    /// Returns the number of edges written.
    pub async fn reconcile(&self, user: &UserProfile) -> AppResult<usize> {
        let accepted = json!(RequestStatus::Accepted);

        let mut requests: Vec<FriendRequest> = decode_all(
            self.store
                .query(
                    FRIEND_REQUESTS,
                    &[("fromUserId", json!(user.uid)), ("status", accepted.clone())],
                )
                .await?,
        )?;
        requests.extend(decode_all::<FriendRequest>(
            self.store
                .query(
                    FRIEND_REQUESTS,
                    &[("toUserId", json!(user.uid)), ("status", accepted)],
                )
                .await?,
        )?);

        let mut seen: HashSet<String> = HashSet::new();
        let mut repaired = 0;

        for request in requests {
            if !seen.insert(request.id.clone()) {
                continue;
            }
            let Some(recipient_id) = request.to_user_id.clone() else {
                continue;
            };

            let recipient = if recipient_id == user.uid {
                user.clone()
            } else {
                self.get_profile(&recipient_id)
                    .await?
                    .unwrap_or_else(|| UserProfile {
                        uid: recipient_id.clone(),
                        display_name: None,
                        email: Some(request.to_email.clone()),
                        photo_url: None,
                    })
            };

            repaired += self.ensure_friendship(&request, &recipient).await?;
        }

        tracing::info!(user = %user.uid, repaired, "Friend edges reconciled");

        Ok(repaired)
    }

    pub async fn friends(&self, uid: &str) -> AppResult<Vec<Friend>> {
        let docs = self.store.query(FRIENDS, &[("userId", json!(uid))]).await?;
        decode_all(docs)
    }

    /// Removes both directions of a friendship; missing edges are ignored
    pub async fn unfriend(&self, uid: &str, friend_id: &str) -> AppResult<()> {
        self.store
            .delete(FRIENDS, &Friend::document_id(uid, friend_id))
            .await?;
        self.store
            .delete(FRIENDS, &Friend::document_id(friend_id, uid))
            .await?;

        tracing::info!(user = %uid, friend = %friend_id, "Friendship removed");

        Ok(())
    }

    /// Shared movies with every friend, recomputed on each call
    pub async fn matches_for(
        &self,
        watchlists: &WatchlistService,
        uid: &str,
    ) -> AppResult<Vec<FriendMatches>> {
        let mine = watchlists.get(uid).await?;
        let friends = self.friends(uid).await?;

        let theirs = try_join_all(friends.iter().map(|f| watchlists.get(&f.friend_id))).await?;

        Ok(friends
            .into_iter()
            .zip(theirs)
            .map(|(friend, list)| FriendMatches {
                movies: movie_matches(&mine, &list),
                friend,
            })
            .collect())
    }

    // Notifications

    async fn notify(&self, user_id: &str, kind: NotificationKind, message: String) -> AppResult<()> {
        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            kind,
            message,
            read: false,
            created_at: Utc::now(),
        };
        self.store
            .set(
                NOTIFICATIONS,
                &notification.id,
                serde_json::to_value(&notification)?,
            )
            .await
    }

    /// The user's notifications, newest first
    pub async fn notifications(&self, uid: &str) -> AppResult<Vec<Notification>> {
        let docs = self
            .store
            .query(NOTIFICATIONS, &[("userId", json!(uid))])
            .await?;
        let mut notifications: Vec<Notification> = decode_all(docs)?;
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    pub async fn mark_read(&self, uid: &str, id: &str) -> AppResult<()> {
        let data = self
            .store
            .get(NOTIFICATIONS, id)
            .await?
            .ok_or_else(|| not_found(NOTIFICATIONS, id))?;
        let notification: Notification = serde_json::from_value(data)?;
        if notification.user_id != uid {
            return Err(AppError::Forbidden(
                "Notification belongs to another user".to_string(),
            ));
        }

        self.store
            .update(NOTIFICATIONS, id, json!({ "read": true }))
            .await
    }

    /// Marks every unread notification as read; returns how many changed
    pub async fn mark_all_read(&self, uid: &str) -> AppResult<usize> {
        let unread = self
            .store
            .query(
                NOTIFICATIONS,
                &[("userId", json!(uid)), ("read", json!(false))],
            )
            .await?;

        for doc in &unread {
            self.store
                .update(NOTIFICATIONS, &doc.id, json!({ "read": true }))
                .await?;
        }
        Ok(unread.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::ListKind;

    fn user(uid: &str, email: &str) -> UserProfile {
        UserProfile {
            uid: uid.to_string(),
            display_name: Some(uid.to_uppercase()),
            email: Some(email.to_string()),
            photo_url: None,
        }
    }

    fn movie(id: &str) -> Movie {
        Movie {
            title: id.to_string(),
            imdb_id: id.to_string(),
            ..Default::default()
        }
    }

    fn watchlist(to_watch: &[&str], watched: &[&str]) -> Watchlist {
        Watchlist {
            to_watch: to_watch.iter().map(|id| movie(id)).collect(),
            watched: watched.iter().map(|id| movie(id)).collect(),
        }
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        social: SocialService,
        ana: UserProfile,
        bo: UserProfile,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let social = SocialService::new(store.clone());
        let ana = social
            .upsert_profile(&user("ana", "Ana@Example.com"))
            .await
            .unwrap();
        let bo = social
            .upsert_profile(&user("bo", "bo@example.com"))
            .await
            .unwrap();
        Fixture {
            store,
            social,
            ana,
            bo,
        }
    }

    async fn sent(f: &Fixture) -> FriendRequest {
        match f.social.send_request(&f.ana, "BO@example.com ").await.unwrap() {
            SendOutcome::Sent(request) => request,
            other => panic!("expected Sent, got {:?}", other),
        }
    }

    #[test]
    fn test_movie_matches_overlap() {
        let mine = watchlist(&["A", "B"], &["C"]);
        let theirs = watchlist(&["D"], &["C", "B"]);

        let ids: Vec<String> = movie_matches(&mine, &theirs)
            .into_iter()
            .map(|m| m.imdb_id)
            .collect();
        assert_eq!(ids, vec!["B", "C"]);
    }

    #[test]
    fn test_movie_matches_no_repeats() {
        let mine = watchlist(&["A", "B"], &["A"]);
        let theirs = watchlist(&["A"], &[]);
        assert_eq!(movie_matches(&mine, &theirs).len(), 1);
        assert!(movie_matches(&mine, &Watchlist::default()).is_empty());
    }

    #[tokio::test]
    async fn test_upsert_profile_normalizes_email() {
        let f = fixture().await;
        assert_eq!(f.ana.email.as_deref(), Some("ana@example.com"));
        let stored = f.social.get_profile("ana").await.unwrap().unwrap();
        assert_eq!(stored, f.ana);
        assert!(f.social.get_profile("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_send_request_notifies_target() {
        let f = fixture().await;
        let request = sent(&f).await;

        assert_eq!(request.to_email, "bo@example.com");
        assert_eq!(request.to_user_id.as_deref(), Some("bo"));
        assert_eq!(request.status, RequestStatus::Pending);

        let notifications = f.social.notifications("bo").await.unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationKind::FriendRequest);
        assert_eq!(notifications[0].message, "ANA sent you a friend request");
    }

    #[tokio::test]
    async fn test_second_request_is_already_sent() {
        let f = fixture().await;
        sent(&f).await;

        let outcome = f.social.send_request(&f.ana, "bo@example.com").await.unwrap();
        assert_eq!(outcome, SendOutcome::AlreadySent);
    }

    #[tokio::test]
    async fn test_send_request_unknown_user() {
        let f = fixture().await;
        let outcome = f
            .social
            .send_request(&f.ana, "ghost@example.com")
            .await
            .unwrap();
        assert_eq!(outcome, SendOutcome::UserNotFound);
    }

    #[tokio::test]
    async fn test_send_request_to_self_rejected() {
        let f = fixture().await;
        let result = f.social.send_request(&f.ana, "ANA@example.com").await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));

        let mut anonymous = f.bo.clone();
        anonymous.email = None;
        let result = f.social.send_request(&anonymous, "ana@example.com").await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_accept_creates_both_edges() {
        let f = fixture().await;
        let request = sent(&f).await;

        let accepted = f.social.accept_request(&f.bo, &request.id).await.unwrap();
        assert_eq!(accepted.status, RequestStatus::Accepted);
        assert!(accepted.responded_at.is_some());

        let bo_friends = f.social.friends("bo").await.unwrap();
        assert_eq!(bo_friends.len(), 1);
        assert_eq!(bo_friends[0].friend_id, "ana");
        assert_eq!(bo_friends[0].friend_email.as_deref(), Some("ana@example.com"));

        let ana_friends = f.social.friends("ana").await.unwrap();
        assert_eq!(ana_friends.len(), 1);
        assert_eq!(ana_friends[0].friend_id, "bo");

        let ana_notes = f.social.notifications("ana").await.unwrap();
        assert_eq!(ana_notes.len(), 1);
        assert_eq!(ana_notes[0].kind, NotificationKind::FriendAccepted);

        let outcome = f.social.send_request(&f.ana, "bo@example.com").await.unwrap();
        assert_eq!(outcome, SendOutcome::AlreadyFriends);
        assert!(f.social.incoming_requests(&f.bo).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_accept_again_repairs_without_duplicate_notification() {
        let f = fixture().await;
        let request = sent(&f).await;
        f.social.accept_request(&f.bo, &request.id).await.unwrap();

        // Simulate an acceptance that stopped after the first edge
        f.store
            .delete(FRIENDS, &Friend::document_id("ana", "bo"))
            .await
            .unwrap();
        assert!(f.social.friends("ana").await.unwrap().is_empty());

        f.social.accept_request(&f.bo, &request.id).await.unwrap();
        assert_eq!(f.social.friends("ana").await.unwrap().len(), 1);
        assert_eq!(f.social.friends("bo").await.unwrap().len(), 1);
        assert_eq!(f.social.notifications("ana").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_only_recipient_can_accept() {
        let f = fixture().await;
        let request = sent(&f).await;

        let result = f.social.accept_request(&f.ana, &request.id).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));

        let result = f.social.accept_request(&f.bo, "missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_declined_request_cannot_be_accepted() {
        let f = fixture().await;
        let request = sent(&f).await;

        assert_eq!(f.social.incoming_requests(&f.bo).await.unwrap().len(), 1);
        let declined = f.social.decline_request(&f.bo, &request.id).await.unwrap();
        assert_eq!(declined.status, RequestStatus::Declined);
        assert!(f.social.incoming_requests(&f.bo).await.unwrap().is_empty());

        let result = f.social.accept_request(&f.bo, &request.id).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert!(f.social.friends("bo").await.unwrap().is_empty());

        // A declined request no longer blocks a new one
        let outcome = f.social.send_request(&f.ana, "bo@example.com").await.unwrap();
        assert!(matches!(outcome, SendOutcome::Sent(_)));
    }

    #[tokio::test]
    async fn test_reconcile_restores_missing_edges() {
        let f = fixture().await;
        let request = sent(&f).await;
        f.social.accept_request(&f.bo, &request.id).await.unwrap();

        f.store
            .delete(FRIENDS, &Friend::document_id("bo", "ana"))
            .await
            .unwrap();
        f.store
            .delete(FRIENDS, &Friend::document_id("ana", "bo"))
            .await
            .unwrap();

        assert_eq!(f.social.reconcile(&f.ana).await.unwrap(), 2);
        assert_eq!(f.social.reconcile(&f.ana).await.unwrap(), 0);
        assert_eq!(f.social.reconcile(&f.bo).await.unwrap(), 0);

        let bo_friends = f.social.friends("bo").await.unwrap();
        assert_eq!(bo_friends[0].friend_name.as_deref(), Some("ANA"));
    }

    #[tokio::test]
    async fn test_unfriend_removes_both_edges() {
        let f = fixture().await;
        let request = sent(&f).await;
        f.social.accept_request(&f.bo, &request.id).await.unwrap();

        f.social.unfriend("ana", "bo").await.unwrap();
        assert!(f.social.friends("ana").await.unwrap().is_empty());
        assert!(f.social.friends("bo").await.unwrap().is_empty());
        f.social.unfriend("ana", "bo").await.unwrap();
    }

    #[tokio::test]
    async fn test_matches_for_friends() {
        let f = fixture().await;
        let request = sent(&f).await;
        f.social.accept_request(&f.bo, &request.id).await.unwrap();

        let watchlists = WatchlistService::new(f.store.clone());
        for id in ["A", "B", "C"] {
            watchlists.add("ana", ListKind::ToWatch, &movie(id)).await.unwrap();
        }
        for id in ["B", "C", "D"] {
            watchlists.add("bo", ListKind::Watched, &movie(id)).await.unwrap();
        }

        let matches = f.social.matches_for(&watchlists, "ana").await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].friend.friend_id, "bo");
        let ids: Vec<&str> = matches[0].movies.iter().map(|m| m.imdb_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "C"]);
    }

    #[tokio::test]
    async fn test_notification_read_flags() {
        let f = fixture().await;
        sent(&f).await;
        f.social.notify("bo", NotificationKind::FriendRequest, "hello".to_string())
            .await
            .unwrap();

        let notes = f.social.notifications("bo").await.unwrap();
        assert_eq!(notes.len(), 2);

        let result = f.social.mark_read("ana", &notes[0].id).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));

        f.social.mark_read("bo", &notes[0].id).await.unwrap();
        assert_eq!(f.social.mark_all_read("bo").await.unwrap(), 1);
        assert_eq!(f.social.mark_all_read("bo").await.unwrap(), 0);
        assert!(f
            .social
            .notifications("bo")
            .await
            .unwrap()
            .iter()
            .all(|n| n.read));
    }
}
