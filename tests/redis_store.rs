use std::{sync::Arc, time::Duration};

use hotel_order_api::kv::{Cache, KvStore, RateDecision, RateLimiter, RedisStore};
use uuid::Uuid;

// 192.0.2.0/24 is reserved for documentation and never routed.
const UNREACHABLE: &str = "redis://192.0.2.1:6379";

#[tokio::test]
async fn unreachable_server_degrades_within_timeouts() -> anyhow::Result<()> {
    let store: Arc<dyn KvStore> = Arc::new(RedisStore::new(UNREACHABLE)?);
    let cache = Cache::new(store.clone(), 60);
    let limiter = RateLimiter::new(store, 1, 60);

    let started = std::time::Instant::now();
    let cached = tokio::time::timeout(
        Duration::from_secs(5),
        cache.get_json::<serde_json::Value>("menu:any"),
    )
    .await?;
    assert_eq!(cached, None);

    let decision = tokio::time::timeout(Duration::from_secs(5), limiter.check("10.0.0.1")).await?;
    assert!(matches!(decision, RateDecision::Allowed { .. }));
    assert!(started.elapsed() < Duration::from_secs(10));
    Ok(())
}

fn live_redis() -> Option<RedisStore> {
    let url = std::env::var("TEST_REDIS_URL").ok()?;
    RedisStore::new(&url).ok()
}

#[tokio::test]
async fn window_counts_up_and_keeps_its_expiry() -> anyhow::Result<()> {
    let Some(store) = live_redis() else {
        eprintln!("TEST_REDIS_URL not set, skipping");
        return Ok(());
    };
    let key = format!("test:rl:{}", Uuid::new_v4());

    let (first, ttl_first) = store.incr_window(&key, 30).await?;
    assert_eq!(first, 1);
    assert!((1..=30).contains(&ttl_first));

    let (second, ttl_second) = store.incr_window(&key, 30).await?;
    assert_eq!(second, 2);
    assert!(ttl_second <= ttl_first);

    store.del(&key).await?;
    let (reset, _) = store.incr_window(&key, 30).await?;
    assert_eq!(reset, 1);
    store.del(&key).await?;
    Ok(())
}

#[tokio::test]
async fn values_round_trip_through_redis() -> anyhow::Result<()> {
    let Some(store) = live_redis() else {
        eprintln!("TEST_REDIS_URL not set, skipping");
        return Ok(());
    };
    let key = format!("test:kv:{}", Uuid::new_v4());

    store.set_ex(&key, "cached", 30).await?;
    assert_eq!(store.get(&key).await?.as_deref(), Some("cached"));
    store.del(&key).await?;
    assert_eq!(store.get(&key).await?, None);
    assert_eq!(store.backend(), "redis");
    Ok(())
}
