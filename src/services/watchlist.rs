/// Watchlist persistence
///
/// One document per user in `watchlists/{uid}` with two movie arrays. Adds go
/// through array union so repeated adds do not duplicate; removes match the
/// whole stored record, so a snapshot that drifted from the stored copy is
/// left in place. `remove_by_id` is the explicit escape hatch for that case.
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    db::DocumentStore,
    error::AppResult,
    models::{ListKind, Movie, Watchlist},
};

pub const WATCHLISTS: &str = "watchlists";

pub struct WatchlistService {
    store: Arc<dyn DocumentStore>,
}

impl WatchlistService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Both lists for a user; empty when nothing was saved yet
    pub async fn get(&self, uid: &str) -> AppResult<Watchlist> {
        match self.store.get(WATCHLISTS, uid).await? {
            Some(doc) => Ok(serde_json::from_value(doc)?),
            None => Ok(Watchlist::default()),
        }
    }

    /// Adds a movie snapshot; adding an identical record again has no effect
    pub async fn add(&self, uid: &str, kind: ListKind, movie: &Movie) -> AppResult<Watchlist> {
        let value = serde_json::to_value(movie)?;

        if self.store.get(WATCHLISTS, uid).await?.is_none() {
            self.store
                .set(WATCHLISTS, uid, json!({ kind.field(): [value] }))
                .await?;
        } else {
            self.store
                .array_union(WATCHLISTS, uid, kind.field(), value)
                .await?;
        }

        tracing::info!(uid = %uid, list = %kind, imdb_id = %movie.imdb_id, "Movie added to watchlist");

        self.get(uid).await
    }

    /// Removes stored records equal to `movie` field for field
    ///
    /// Absent documents, lists or records are a no-op.
    pub async fn remove(&self, uid: &str, kind: ListKind, movie: &Movie) -> AppResult<Watchlist> {
        let value = serde_json::to_value(movie)?;
        self.store
            .array_remove(WATCHLISTS, uid, kind.field(), &value)
            .await?;

        tracing::info!(uid = %uid, list = %kind, imdb_id = %movie.imdb_id, "Movie removed from watchlist");

        self.get(uid).await
    }

    /// Removes every stored record carrying `imdb_id`, whatever its other fields
    ///
    /// Returns how many records were removed.
    pub async fn remove_by_id(&self, uid: &str, kind: ListKind, imdb_id: &str) -> AppResult<usize> {
        let Some(doc) = self.store.get(WATCHLISTS, uid).await? else {
            return Ok(0);
        };

        let matching: Vec<Value> = doc
            .get(kind.field())
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter(|item| item.get("imdbID").and_then(Value::as_str) == Some(imdb_id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        for item in &matching {
            self.store
                .array_remove(WATCHLISTS, uid, kind.field(), item)
                .await?;
        }

        tracing::info!(
            uid = %uid,
            list = %kind,
            imdb_id = %imdb_id,
            removed = matching.len(),
            "Movie removed from watchlist by id"
        );

        Ok(matching.len())
    }

    /// Moves a record from `from` to the other list
    ///
    /// Remove then add; the two writes are not atomic.
    pub async fn move_movie(&self, uid: &str, from: ListKind, movie: &Movie) -> AppResult<Watchlist> {
        self.remove(uid, from, movie).await?;
        self.add(uid, from.other(), movie).await
    }
}
