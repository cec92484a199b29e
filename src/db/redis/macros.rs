/// Read-through caching for catalog lookups.
///
/// Returns the cached value when present. Otherwise awaits `$block`, queues
/// its successful result for storage with the given TTL (seconds), and
/// returns it. Errors from `$block` propagate and are never cached. A failing
/// cache read is logged and treated as a miss, so an unreachable Redis only
/// costs the cache, not the lookup.
///
/// # Example
/// ```rust,ignore
/// let movie: Movie = cached!(cache, CacheKey::MovieDetails(id.into()), 3600, async move {
///     fetch_movie_from_api(id).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await {
            Ok(Some(cached)) => Ok(cached),
            lookup => {
                if let Err(e) = lookup {
                    tracing::warn!(error = %e, key = %key, "Cache read failed, treating as miss");
                }
                let value = $block.await?;
                $cache.set_in_background(&key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
