use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{KvError, KvStore};

struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-process store used when no Redis URL is configured.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), KvError> {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + Duration::from_secs(ttl_secs),
            },
        );
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), KvError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn incr_window(&self, key: &str, window_secs: u64) -> Result<(u64, u64), KvError> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        let entry = entries
            .entry(key.to_string())
            .and_modify(|entry| {
                if entry.expires_at <= now {
                    entry.value = "0".into();
                    entry.expires_at = now + Duration::from_secs(window_secs);
                }
            })
            .or_insert_with(|| Entry {
                value: "0".into(),
                expires_at: now + Duration::from_secs(window_secs),
            });

        let count = entry.value.parse::<u64>().unwrap_or(0) + 1;
        entry.value = count.to_string();

        let remaining = entry.expires_at.saturating_duration_since(now);
        let ttl = remaining.as_secs_f64().ceil() as u64;
        Ok((count, ttl.clamp(1, window_secs.max(1))))
    }
}
