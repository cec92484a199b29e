use futures::future::join_all;

use crate::{
    models::{dedupe_by_id, Movie},
    services::catalog::{details_batch, MovieCatalog},
};

/// Genres offered for filtering
pub const GENRES: &[&str] = &[
    "Action",
    "Adventure",
    "Animation",
    "Biography",
    "Comedy",
    "Crime",
    "Documentary",
    "Drama",
    "Family",
    "Fantasy",
    "Film-Noir",
    "History",
    "Horror",
    "Music",
    "Musical",
    "Mystery",
    "Romance",
    "Sci-Fi",
    "Sport",
    "Thriller",
    "War",
    "Western",
    "Reality-TV",
    "Short",
    "Talk-Show",
    "Game-Show",
    "Superhero",
    "Detective",
    "Classic",
    "Survival",
    "Cyberpunk",
    "Psychological",
];

/// Splits a comma separated genre selection, dropping blanks and repeats
pub fn parse_genres(raw: &str) -> Vec<String> {
    let mut genres: Vec<String> = Vec::new();
    for genre in raw.split(',').map(str::trim).filter(|g| !g.is_empty()) {
        if !genres.iter().any(|g| g.eq_ignore_ascii_case(genre)) {
            genres.push(genre.to_string());
        }
    }
    genres
}

/// Movies matching any of the selected genres
///
/// Each genre name is used as a title search; every hit is enriched with
/// details and kept only if its `Genre` field mentions a selected genre.
/// Searches that fail contribute nothing.
pub async fn browse(catalog: &dyn MovieCatalog, genres: &[String]) -> Vec<Movie> {
    if genres.is_empty() {
        return Vec::new();
    }

    let searches = join_all(genres.iter().map(|genre| catalog.search(genre))).await;

    let hits: Vec<Movie> = genres
        .iter()
        .zip(searches)
        .flat_map(|(genre, result)| match result {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!(genre = %genre, error = %e, "Genre search failed");
                Vec::new()
            }
        })
        .collect();

    let hit_count = hits.len();
    let detailed = details_batch(catalog, dedupe_by_id(hits)).await;

    let movies: Vec<Movie> = detailed
        .into_iter()
        .filter(|movie| genres.iter().any(|genre| movie.has_genre(genre)))
        .collect();

    tracing::info!(
        genres = ?genres,
        hits = hit_count,
        matched = movies.len(),
        "Genre browse completed"
    );

    movies
}
