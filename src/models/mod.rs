use serde::{Deserialize, Serialize};

pub mod social;
pub mod watchlist;

pub use social::{
    Friend, FriendMatches, FriendRequest, Notification, NotificationKind, RequestStatus,
    SendOutcome, UserProfile,
};
pub use watchlist::{ListKind, Watchlist};

/// Image shown when the catalog has no poster for a movie
pub const PLACEHOLDER_POSTER: &str = "/placeholder.png";

/// A movie snapshot as returned by the catalog
///
/// Field names follow the OMDb payload so that stored watchlist entries and
/// catalog responses share one representation. Optional fields are omitted
/// from the JSON when absent, which keeps stored records comparable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movie {
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
    #[serde(rename = "imdbRating", default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(rename = "Actors", default, skip_serializing_if = "Option::is_none")]
    pub actors: Option<String>,
    #[serde(rename = "Genre", default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(rename = "Plot", default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
}

impl Movie {
    /// Record carrying only an identifier, used when details cannot be fetched
    pub fn placeholder(imdb_id: impl Into<String>) -> Self {
        Self {
            imdb_id: imdb_id.into(),
            ..Default::default()
        }
    }

    /// Poster URL, or the placeholder image when the catalog has none
    pub fn poster_url(&self) -> &str {
        match self.poster.trim() {
            "" | "N/A" => PLACEHOLDER_POSTER,
            url => url,
        }
    }

    /// Stores the placeholder image in place of a missing poster
    pub fn with_poster_fallback(mut self) -> Self {
        if self.poster_url() == PLACEHOLDER_POSTER {
            self.poster = PLACEHOLDER_POSTER.to_string();
        }
        self
    }

    /// Whether the comma separated `Genre` field mentions `genre` (case-insensitive)
    pub fn has_genre(&self, genre: &str) -> bool {
        let needle = genre.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        self.genre
            .as_deref()
            .map(|g| g.to_lowercase().contains(&needle))
            .unwrap_or(false)
    }
}

/// Keeps the first occurrence of every identifier, preserving order
pub fn dedupe_by_id(movies: Vec<Movie>) -> Vec<Movie> {
    let mut seen = std::collections::HashSet::new();
    movies
        .into_iter()
        .filter(|movie| seen.insert(movie.imdb_id.clone()))
        .collect()
}

// ============================================================================
// OMDb API Types
// ============================================================================

/// Envelope shared by every OMDb response
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbEnvelope {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl OmdbEnvelope {
    pub fn is_success(&self) -> bool {
        self.response.eq_ignore_ascii_case("true")
    }
}

/// Response from a title search (`s=`)
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchResponse {
    #[serde(rename = "Search", default)]
    pub search: Vec<Movie>,
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<String>,
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}
