pub mod postgres;
pub mod redis;
pub mod store;

pub use postgres::{create_pool, run_migrations, PgDocumentStore};
pub use self::redis::{create_redis_client, Cache, CacheKey, CacheWriterHandle};
pub use store::{Document, DocumentStore, MemoryStore};
