pub mod buddy;
pub mod catalog;
pub mod featured;
pub mod genres;
pub mod social;
pub mod watchlist;

pub use buddy::{BuddyReply, HttpRecommendationBackend, MovieBuddy, RecommendationBackend};
pub use catalog::{MovieCatalog, OmdbClient};
pub use featured::FeaturedSampler;
pub use social::SocialService;
pub use watchlist::WatchlistService;
