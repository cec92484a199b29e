use futures::future::join_all;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{dedupe_by_id, Movie},
    services::catalog::MovieCatalog,
};

/// Draws per bucket before giving up on finding an unused candidate
const MAX_PICK_ATTEMPTS: usize = 10;

pub const DEFAULT_FEATURED_COUNT: usize = 8;

/// Upper bound on the number of featured movies per request
pub const MAX_FEATURED_COUNT: usize = 24;

/// Curated recent titles, one bucket per genre
const GENRE_BUCKETS: &[(&str, &[&str])] = &[
    (
        "Action",
        &[
            "tt6443346", "tt9376612", "tt9114286", "tt15239678", "tt6334354", "tt10872600",
            "tt1745960",
        ],
    ),
    (
        "Animation",
        &[
            "tt7146812", "tt2948372", "tt12801262", "tt13650600", "tt10954600", "tt5104604",
            "tt2953050",
        ],
    ),
    (
        "Comedy",
        &[
            "tt6139732", "tt11286314", "tt9243946", "tt11083552", "tt8367814", "tt6791350",
            "tt11286316",
        ],
    ),
    (
        "Drama",
        &[
            "tt9770150", "tt10633456", "tt12789558", "tt10095582", "tt11813216", "tt14208870",
            "tt10366460",
        ],
    ),
    (
        "Horror",
        &[
            "tt8332922", "tt11007312", "tt11245972", "tt7144666", "tt15071532", "tt10954984",
            "tt12758060",
        ],
    ),
    (
        "Romance",
        &[
            "tt12747748", "tt9647768", "tt15398776", "tt13651794", "tt11851214", "tt6723592",
            "tt11286318",
        ],
    ),
    (
        "SciFi",
        &[
            "tt1160419", "tt15359898", "tt11286020", "tt9777666", "tt6710474", "tt10838180",
            "tt11286322",
        ],
    ),
    (
        "Thriller",
        &[
            "tt2382320", "tt9731534", "tt1877830", "tt7846844", "tt11564570", "tt11286324",
            "tt10838056",
        ],
    ),
];

/// Well-known titles used to top up or replace the genre picks
const FALLBACK_MOVIES: &[&str] = &[
    "tt0111161", // The Shawshank Redemption
    "tt0468569", // The Dark Knight
    "tt1375666", // Inception
    "tt0109830", // Forrest Gump
    "tt0133093", // The Matrix
    "tt0110912", // Pulp Fiction
    "tt0167260", // LOTR: Return of the King
    "tt0816692", // Interstellar
];

/// Candidate pool for one genre
#[derive(Debug, Clone, PartialEq)]
pub struct GenreBucket {
    pub genre: String,
    pub candidates: Vec<String>,
}

impl GenreBucket {
    pub fn new(genre: &str, candidates: &[&str]) -> Self {
        Self {
            genre: genre.to_string(),
            candidates: candidates.iter().map(|id| id.to_string()).collect(),
        }
    }
}

/// Picks featured movies: one per genre bucket, no repeated ids
pub struct FeaturedSampler {
    catalog: Arc<dyn MovieCatalog>,
    buckets: Vec<GenreBucket>,
    fallback: Vec<String>,
}

impl FeaturedSampler {
    /// Sampler over the curated genre buckets and fallback list
    pub fn new(catalog: Arc<dyn MovieCatalog>) -> Self {
        let buckets = GENRE_BUCKETS
            .iter()
            .map(|(genre, ids)| GenreBucket::new(genre, ids))
            .collect();
        let fallback = FALLBACK_MOVIES.iter().map(|id| id.to_string()).collect();
        Self::with_pools(catalog, buckets, fallback)
    }

    pub fn with_pools(
        catalog: Arc<dyn MovieCatalog>,
        buckets: Vec<GenreBucket>,
        fallback: Vec<String>,
    ) -> Self {
        Self {
            catalog,
            buckets,
            fallback,
        }
    }

    /// Returns up to `count` featured movies with distinct ids
    pub async fn featured(&self, count: usize) -> Vec<Movie> {
        let mut rng = StdRng::from_os_rng();
        self.sample(count, &mut rng).await
    }

    /// A fresh sample; each call draws again
    pub async fn refresh(&self, count: usize) -> Vec<Movie> {
        self.featured(count).await
    }

    /// Same as [`featured`](Self::featured) with a caller-supplied RNG
    ///
    /// The result never holds two movies with the same id and has
    /// `min(count, unique obtainable candidates)` entries.
    pub async fn sample<R: Rng + Send>(&self, count: usize, rng: &mut R) -> Vec<Movie> {
        if count == 0 {
            return Vec::new();
        }

        match self.sample_buckets(count, rng).await {
            Ok(movies) => {
                tracing::info!(
                    requested = count,
                    returned = movies.len(),
                    "Featured movies sampled"
                );
                movies
            }
            Err(e) => {
                tracing::error!(error = %e, "Featured sampling failed, using fallback pool only");
                let mut movies = Vec::new();
                self.top_up(&mut movies, count, rng).await;
                dedupe_by_id(movies)
            }
        }
    }

    /// One pick per bucket, then a fallback top-up for any shortfall
    ///
    /// Fails only when picks were made and every one of them failed to fetch.
    async fn sample_buckets<R: Rng + Send>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> AppResult<Vec<Movie>> {
        let picks = pick_bucket_ids(&self.buckets, count, rng);
        let results = join_all(picks.iter().map(|id| self.catalog.fetch_movie(id))).await;

        let mut movies = Vec::new();
        let mut failures = 0;
        for (id, result) in picks.iter().zip(results) {
            match result {
                Ok(movie) => push_unique(&mut movies, movie),
                Err(e) => {
                    failures += 1;
                    tracing::warn!(imdb_id = %id, error = %e, "Featured pick could not be fetched");
                }
            }
        }

        if movies.is_empty() && failures > 0 {
            return Err(AppError::ExternalApi(format!(
                "All {} featured picks failed to fetch",
                failures
            )));
        }

        if movies.len() < count {
            self.top_up(&mut movies, count, rng).await;
        }

        Ok(dedupe_by_id(movies))
    }

    /// Fills `movies` up to `count` from the shuffled fallback pool
    ///
    /// Ids already present are skipped. Failed fetches are replaced by further
    /// fallback candidates until the pool runs out.
    async fn top_up<R: Rng + Send>(&self, movies: &mut Vec<Movie>, count: usize, rng: &mut R) {
        let mut pool: Vec<&String> = self
            .fallback
            .iter()
            .filter(|id| !movies.iter().any(|m| &m.imdb_id == *id))
            .collect();
        pool.shuffle(rng);

        let mut remaining = pool.into_iter();
        while movies.len() < count {
            let needed = count - movies.len();
            let batch: Vec<&String> = remaining.by_ref().take(needed).collect();
            if batch.is_empty() {
                break;
            }

            let results = join_all(batch.iter().map(|id| self.catalog.fetch_movie(id))).await;
            for (id, result) in batch.iter().zip(results) {
                match result {
                    Ok(movie) => push_unique(movies, movie),
                    Err(e) => {
                        tracing::warn!(imdb_id = %id, error = %e, "Fallback movie could not be fetched")
                    }
                }
            }
        }
    }
}

fn push_unique(movies: &mut Vec<Movie>, movie: Movie) {
    if !movies.iter().any(|existing| existing.imdb_id == movie.imdb_id) {
        movies.push(movie);
    }
}

/// Draws one unused id from each of the first `count` buckets
///
/// Each bucket gets at most `MAX_PICK_ATTEMPTS` uniform draws; a bucket whose
/// draws all hit used ids contributes nothing.
pub fn pick_bucket_ids<R: Rng + ?Sized>(
    buckets: &[GenreBucket],
    count: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut used: HashSet<&str> = HashSet::new();
    let mut picks = Vec::new();

    for bucket in buckets.iter().take(count) {
        if bucket.candidates.is_empty() {
            continue;
        }

        for _ in 0..MAX_PICK_ATTEMPTS {
            let candidate = &bucket.candidates[rng.random_range(0..bucket.candidates.len())];
            if used.insert(candidate.as_str()) {
                picks.push(candidate.clone());
                break;
            }
        }
    }

    picks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::MockMovieCatalog;

    fn movie(id: &str) -> Movie {
        Movie {
            title: format!("Movie {}", id),
            year: "2021".to_string(),
            imdb_id: id.to_string(),
            kind: "movie".to_string(),
            ..Default::default()
        }
    }

    fn echo_catalog() -> MockMovieCatalog {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_name().return_const("mock");
        catalog.expect_fetch_movie().returning(|id| Ok(movie(id)));
        catalog
    }

    fn ids(movies: &[Movie]) -> Vec<&str> {
        movies.iter().map(|m| m.imdb_id.as_str()).collect()
    }

    fn assert_unique(movies: &[Movie]) {
        let unique: HashSet<&str> = ids(movies).into_iter().collect();
        assert_eq!(unique.len(), movies.len(), "duplicate ids in {:?}", ids(movies));
    }

    #[test]
    fn test_curated_pools_shape() {
        assert_eq!(GENRE_BUCKETS.len(), 8);
        assert!(GENRE_BUCKETS.iter().all(|(_, ids)| ids.len() == 7));
        assert_eq!(FALLBACK_MOVIES.len(), 8);
    }

    #[test]
    fn test_pick_bucket_ids_one_per_bucket() {
        let buckets = vec![
            GenreBucket::new("A", &["a1", "a2"]),
            GenreBucket::new("B", &["b1"]),
            GenreBucket::new("C", &["c1", "c2", "c3"]),
        ];
        let mut rng = StdRng::seed_from_u64(7);

        let picks = pick_bucket_ids(&buckets, 3, &mut rng);
        assert_eq!(picks.len(), 3);
        assert!(picks[0].starts_with('a'));
        assert_eq!(picks[1], "b1");
        assert!(picks[2].starts_with('c'));
    }

    #[test]
    fn test_pick_bucket_ids_respects_count() {
        let buckets = vec![
            GenreBucket::new("A", &["a1"]),
            GenreBucket::new("B", &["b1"]),
            GenreBucket::new("C", &["c1"]),
        ];
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(pick_bucket_ids(&buckets, 2, &mut rng), vec!["a1", "b1"]);
        assert!(pick_bucket_ids(&buckets, 0, &mut rng).is_empty());
    }

    #[test]
    fn test_pick_bucket_ids_skips_exhausted_bucket() {
        // Second bucket only offers an id the first bucket already took
        let buckets = vec![
            GenreBucket::new("A", &["shared"]),
            GenreBucket::new("B", &["shared"]),
            GenreBucket::new("C", &[]),
            GenreBucket::new("D", &["d1"]),
        ];
        let mut rng = StdRng::seed_from_u64(3);

        let picks = pick_bucket_ids(&buckets, 4, &mut rng);
        assert_eq!(picks, vec!["shared", "d1"]);
    }

    #[tokio::test]
    async fn test_featured_default_pools_unique_and_full() {
        let sampler = FeaturedSampler::new(Arc::new(echo_catalog()));

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let movies = sampler.sample(DEFAULT_FEATURED_COUNT, &mut rng).await;
            assert_eq!(movies.len(), DEFAULT_FEATURED_COUNT);
            assert_unique(&movies);
        }
    }

    #[tokio::test]
    async fn test_featured_never_exceeds_count() {
        let sampler = FeaturedSampler::new(Arc::new(echo_catalog()));
        let mut rng = StdRng::seed_from_u64(11);

        for count in [0, 1, 3, 8, 12, 16, 40] {
            let movies = sampler.sample(count, &mut rng).await;
            assert!(movies.len() <= count);
            assert_unique(&movies);
        }
    }

    #[tokio::test]
    async fn test_count_beyond_buckets_tops_up_from_fallback() {
        let sampler = FeaturedSampler::new(Arc::new(echo_catalog()));
        let mut rng = StdRng::seed_from_u64(5);

        let movies = sampler.sample(12, &mut rng).await;
        assert_eq!(movies.len(), 12);
        assert_unique(&movies);
        let fallback_count = movies
            .iter()
            .filter(|m| FALLBACK_MOVIES.contains(&m.imdb_id.as_str()))
            .count();
        assert_eq!(fallback_count, 4);
    }

    #[tokio::test]
    async fn test_length_is_min_of_count_and_obtainable() {
        let buckets = vec![
            GenreBucket::new("A", &["x"]),
            GenreBucket::new("B", &["x"]),
        ];
        let fallback = vec!["x".to_string(), "y".to_string()];
        let sampler = FeaturedSampler::with_pools(Arc::new(echo_catalog()), buckets, fallback);
        let mut rng = StdRng::seed_from_u64(9);

        let movies = sampler.sample(5, &mut rng).await;
        assert_eq!(ids(&movies), vec!["x", "y"]);
    }

    #[tokio::test]
    async fn test_failed_picks_replaced_from_fallback() {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_name().return_const("mock");
        catalog.expect_fetch_movie().returning(|id| {
            if id == "b1" || id == "f1" {
                Err(AppError::ExternalApi("down".to_string()))
            } else {
                Ok(movie(id))
            }
        });

        let buckets = vec![GenreBucket::new("A", &["a1"]), GenreBucket::new("B", &["b1"])];
        let fallback = vec!["f1".to_string(), "f2".to_string()];
        let sampler = FeaturedSampler::with_pools(Arc::new(catalog), buckets, fallback);
        let mut rng = StdRng::seed_from_u64(2);

        let movies = sampler.sample(2, &mut rng).await;
        assert_eq!(ids(&movies), vec!["a1", "f2"]);
    }

    #[tokio::test]
    async fn test_duplicate_fetch_results_are_collapsed() {
        // Catalog resolves two different picks to the same canonical id
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_name().return_const("mock");
        catalog
            .expect_fetch_movie()
            .returning(|id| Ok(movie(if id == "a2" { "a1" } else { id })));

        let buckets = vec![GenreBucket::new("A", &["a1"]), GenreBucket::new("B", &["a2"])];
        let sampler = FeaturedSampler::with_pools(Arc::new(catalog), buckets, vec![]);
        let mut rng = StdRng::seed_from_u64(4);

        let movies = sampler.sample(2, &mut rng).await;
        assert_eq!(ids(&movies), vec!["a1"]);
    }

    #[tokio::test]
    async fn test_total_bucket_failure_falls_back_entirely() {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_name().return_const("mock");
        catalog.expect_fetch_movie().returning(|id| {
            if id.starts_with('f') {
                Ok(movie(id))
            } else {
                Err(AppError::ExternalApi("down".to_string()))
            }
        });

        let buckets = vec![GenreBucket::new("A", &["a1"]), GenreBucket::new("B", &["b1"])];
        let fallback = vec!["f1".to_string(), "f2".to_string(), "f3".to_string()];
        let sampler = FeaturedSampler::with_pools(Arc::new(catalog), buckets, fallback);
        let mut rng = StdRng::seed_from_u64(6);

        let movies = sampler.sample(2, &mut rng).await;
        assert_eq!(movies.len(), 2);
        assert!(movies.iter().all(|m| m.imdb_id.starts_with('f')));
        assert_unique(&movies);
    }

    #[tokio::test]
    async fn test_catalog_down_returns_empty() {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_name().return_const("mock");
        catalog
            .expect_fetch_movie()
            .returning(|_| Err(AppError::ExternalApi("down".to_string())));

        let sampler = FeaturedSampler::new(Arc::new(catalog));
        let movies = sampler.featured(DEFAULT_FEATURED_COUNT).await;
        assert!(movies.is_empty());
    }
}
