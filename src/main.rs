use std::sync::Arc;

use cinephile::{
    config::Config,
    db::{
        create_pool, create_redis_client, run_migrations, Cache, DocumentStore, MemoryStore,
        PgDocumentStore,
    },
    routes::{create_router, AppState},
    services::{HttpRecommendationBackend, MovieCatalog, OmdbClient, RecommendationBackend},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinephile=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Catalog cache
    let (cache, cache_writer) = match &config.redis_url {
        Some(url) => {
            let client = create_redis_client(url)?;
            let (cache, writer) = Cache::new(client).await;
            tracing::info!("Catalog responses cached in Redis");
            (Some(cache), Some(writer))
        }
        None => {
            tracing::info!("REDIS_URL not set, catalog responses are not cached");
            (None, None)
        }
    };

    // Document store
    let store: Arc<dyn DocumentStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            run_migrations(&pool).await?;
            tracing::info!("Documents stored in PostgreSQL");
            Arc::new(PgDocumentStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, documents are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let catalog: Arc<dyn MovieCatalog> = Arc::new(OmdbClient::new(
        config.omdb_api_key.clone(),
        config.omdb_api_url.clone(),
        cache,
    ));
    let backend: Arc<dyn RecommendationBackend> =
        Arc::new(HttpRecommendationBackend::new(config.recommender_url.clone()));

    let state = AppState::new(catalog, backend, store, config.featured_count);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(writer) = cache_writer {
        writer.shutdown().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
