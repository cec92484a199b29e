/// Movie catalog abstraction
///
/// A catalog answers title searches and detail lookups by IMDb id. The trait
/// methods are strict and report every failure; the free functions in this
/// module wrap them with the degrading behavior the rest of the application
/// relies on (partial or placeholder records instead of errors).
use futures::future::join_all;

use crate::{error::AppResult, models::Movie};

pub mod omdb;

pub use omdb::OmdbClient;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Search titles by free text
    ///
    /// An empty result set is `Ok(vec![])`, not an error.
    async fn search(&self, query: &str) -> AppResult<Vec<Movie>>;

    /// Fetch full details for one IMDb id
    async fn fetch_movie(&self, imdb_id: &str) -> AppResult<Movie>;

    /// Catalog name for logging
    fn name(&self) -> &'static str;
}

/// Starting point for a degrading detail fetch
#[derive(Debug, Clone, PartialEq)]
pub enum MovieSeed {
    /// Only an identifier is known
    Id(String),
    /// A partial record, typically a search hit
    Partial(Movie),
}

impl MovieSeed {
    pub fn imdb_id(&self) -> &str {
        match self {
            MovieSeed::Id(id) => id,
            MovieSeed::Partial(movie) => &movie.imdb_id,
        }
    }

    /// What a failed fetch degrades to
    fn into_fallback(self) -> Movie {
        match self {
            MovieSeed::Id(id) => Movie::placeholder(id),
            MovieSeed::Partial(movie) => movie,
        }
    }
}

impl From<&str> for MovieSeed {
    fn from(id: &str) -> Self {
        MovieSeed::Id(id.to_string())
    }
}

impl From<String> for MovieSeed {
    fn from(id: String) -> Self {
        MovieSeed::Id(id)
    }
}

impl From<Movie> for MovieSeed {
    fn from(movie: Movie) -> Self {
        MovieSeed::Partial(movie)
    }
}

/// Fetches full details, degrading instead of failing
///
/// On any failure returns the partial record it was given, or a placeholder
/// carrying only the identifier.
pub async fn movie_details(catalog: &dyn MovieCatalog, seed: impl Into<MovieSeed>) -> Movie {
    let seed = seed.into();
    match catalog.fetch_movie(seed.imdb_id()).await {
        Ok(movie) => movie,
        Err(e) => {
            tracing::warn!(
                imdb_id = %seed.imdb_id(),
                catalog = catalog.name(),
                error = %e,
                "Movie detail fetch failed, using fallback record"
            );
            seed.into_fallback()
        }
    }
}

/// Degrading detail fetch for many seeds, issued concurrently
///
/// Results follow input order, not completion order.
pub async fn details_batch<S>(catalog: &dyn MovieCatalog, seeds: Vec<S>) -> Vec<Movie>
where
    S: Into<MovieSeed>,
{
    join_all(seeds.into_iter().map(|seed| movie_details(catalog, seed))).await
}

/// Title search followed by a degrading detail fetch for every hit
///
/// A failed search is logged and yields no results; blank queries are rejected.
pub async fn search_with_details(catalog: &dyn MovieCatalog, query: &str) -> AppResult<Vec<Movie>> {
    let hits = match catalog.search(query).await {
        Ok(hits) => hits,
        Err(e @ crate::error::AppError::InvalidInput(_)) => return Err(e),
        Err(e) => {
            tracing::error!(query = %query, error = %e, "Movie search failed");
            return Ok(Vec::new());
        }
    };

    let movies = details_batch(catalog, hits).await;

    tracing::info!(
        query = %query,
        results = movies.len(),
        catalog = catalog.name(),
        "Search with details completed"
    );

    Ok(movies)
}
