use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use redis::{
    Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use tokio::sync::OnceCell;

use super::{KvError, KvStore};

const CONNECT_TIMEOUT: Duration = Duration::from_millis(250);
const RESPONSE_TIMEOUT: Duration = Duration::from_millis(250);

/// Redis-backed store holding one managed connection shared by every call.
/// The connection is opened on first use; a failed attempt is retried on the next call.
#[derive(Clone)]
pub struct RedisStore {
    client: Client,
    manager: Arc<OnceCell<ConnectionManager>>,
}

impl RedisStore {
    pub fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = Client::open(connection_string)?;
        Ok(Self {
            client,
            manager: Arc::new(OnceCell::new()),
        })
    }

    pub fn manager_config() -> ConnectionManagerConfig {
        ConnectionManagerConfig::new()
            .set_number_of_retries(1)
            .set_connection_timeout(Some(CONNECT_TIMEOUT))
            .set_response_timeout(Some(RESPONSE_TIMEOUT))
    }

    async fn conn(&self) -> Result<ConnectionManager, KvError> {
        let manager = self
            .manager
            .get_or_try_init(|| {
                self.client
                    .get_connection_manager_with_config(Self::manager_config())
            })
            .await?;
        Ok(manager.clone())
    }
}

#[async_trait]
impl KvStore for RedisStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let mut conn = self.conn().await?;
        let value: Option<String> = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), KvError> {
        let mut conn = self.conn().await?;
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_secs)
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), KvError> {
        let mut conn = self.conn().await?;
        redis::cmd("DEL")
            .arg(key)
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn incr_window(&self, key: &str, window_secs: u64) -> Result<(u64, u64), KvError> {
        let mut conn = self.conn().await?;

        // SET NX opens the window with its expiry; INCR keeps the TTL, so the window stays fixed.
        let (_, count, ttl): (Option<String>, u64, i64) = redis::pipe()
            .atomic()
            .cmd("SET")
            .arg(key)
            .arg(0)
            .arg("EX")
            .arg(window_secs)
            .arg("NX")
            .cmd("INCR")
            .arg(key)
            .cmd("TTL")
            .arg(key)
            .query_async(&mut conn)
            .await?;

        let ttl = if ttl > 0 { ttl as u64 } else { window_secs };
        Ok((count, ttl))
    }
}
