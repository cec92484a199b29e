use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use super::Movie;
use crate::error::AppError;

/// Which of the two watchlist arrays an operation targets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    ToWatch,
    Watched,
}

impl ListKind {
    /// Name of the array field inside the watchlist document
    pub fn field(self) -> &'static str {
        match self {
            ListKind::ToWatch => "movies",
            ListKind::Watched => "watchedMovies",
        }
    }

    pub fn other(self) -> Self {
        match self {
            ListKind::ToWatch => ListKind::Watched,
            ListKind::Watched => ListKind::ToWatch,
        }
    }
}

impl Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListKind::ToWatch => write!(f, "to_watch"),
            ListKind::Watched => write!(f, "watched"),
        }
    }
}

impl FromStr for ListKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "to_watch" | "movies" => Ok(ListKind::ToWatch),
            "watched" | "watchedMovies" => Ok(ListKind::Watched),
            other => Err(AppError::InvalidInput(format!(
                "Unknown watchlist '{}', expected 'to_watch' or 'watched'",
                other
            ))),
        }
    }
}

/// Per-user watchlist document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Watchlist {
    #[serde(rename = "movies", default)]
    pub to_watch: Vec<Movie>,
    #[serde(rename = "watchedMovies", default)]
    pub watched: Vec<Movie>,
}

impl Watchlist {
    /// Both lists, to-watch first
    pub fn combined(&self) -> impl Iterator<Item = &Movie> {
        self.to_watch.iter().chain(self.watched.iter())
    }
}
