use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};

use super::KvStore;

/// Best-effort JSON cache. Every failure is logged and reported as a miss.
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn KvStore>,
    ttl_secs: u64,
}

impl Cache {
    pub fn new(store: Arc<dyn KvStore>, ttl_secs: u64) -> Self {
        Self { store, ttl_secs }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key).await {
            Ok(raw) => raw?,
            Err(err) => {
                tracing::warn!(error = %err, key, "cache read failed");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(error = %err, key, "cache entry is not valid json");
                None
            }
        }
    }

    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, key, "cache serialize failed");
                return;
            }
        };
        if let Err(err) = self.store.set_ex(key, &raw, self.ttl_secs).await {
            tracing::warn!(error = %err, key, "cache write failed");
        }
    }

    pub async fn invalidate(&self, key: &str) {
        if let Err(err) = self.store.del(key).await {
            tracing::warn!(error = %err, key, "cache invalidate failed");
        }
    }
}

pub fn restaurant_menu_key(restaurant_id: uuid::Uuid) -> String {
    format!("menu:restaurant:{restaurant_id}")
}

pub fn hotel_menu_key(hotel_id: uuid::Uuid) -> String {
    format!("menu:hotel:{hotel_id}")
}
