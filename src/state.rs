use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::{DbPool, OrmConn},
    kv::{Cache, KvStore, MemoryStore, RateLimiter, RedisStore},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub cache: Cache,
    pub limiter: RateLimiter,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pool: DbPool, orm: OrmConn, config: AppConfig) -> anyhow::Result<Self> {
        let store = build_store(&config)?;
        let cache = Cache::new(store.clone(), config.cache_ttl_secs);
        let limiter = RateLimiter::new(
            store,
            config.rate_limit_max,
            config.rate_limit_window_secs,
        );
        Ok(Self {
            pool,
            orm,
            cache,
            limiter,
            config: Arc::new(config),
        })
    }
}

fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn KvStore>> {
    match config.redis_url.as_deref() {
        Some(url) => {
            tracing::info!("using redis for cache and rate limiting");
            Ok(Arc::new(RedisStore::new(url)?))
        }
        None => {
            tracing::warn!("REDIS_URL not set, falling back to in-process store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
