use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use hotel_order_api::kv::{
    Cache, KvStore, MemoryStore,
    cache::{hotel_menu_key, restaurant_menu_key},
    KvError,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Menu {
    name: String,
    items: Vec<String>,
}

fn menu() -> Menu {
    Menu {
        name: "Warung".into(),
        items: vec!["Nasi Goreng".into(), "Es Teh".into()],
    }
}

struct DownStore;

#[async_trait]
impl KvStore for DownStore {
    fn backend(&self) -> &'static str {
        "down"
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, KvError> {
        Err(KvError::Unavailable("connection refused".into()))
    }

    async fn set_ex(&self, _key: &str, _value: &str, _ttl_secs: u64) -> Result<(), KvError> {
        Err(KvError::Unavailable("connection refused".into()))
    }

    async fn del(&self, _key: &str) -> Result<(), KvError> {
        Err(KvError::Unavailable("connection refused".into()))
    }

    async fn incr_window(&self, _key: &str, _window_secs: u64) -> Result<(u64, u64), KvError> {
        Err(KvError::Unavailable("connection refused".into()))
    }
}

#[tokio::test]
async fn stores_and_invalidates_entries() {
    let cache = Cache::new(Arc::new(MemoryStore::new()), 60);
    let key = restaurant_menu_key(Uuid::new_v4());

    assert_eq!(cache.get_json::<Menu>(&key).await, None);
    cache.set_json(&key, &menu()).await;
    assert_eq!(cache.get_json::<Menu>(&key).await, Some(menu()));

    cache.invalidate(&key).await;
    assert_eq!(cache.get_json::<Menu>(&key).await, None);
}

#[tokio::test]
async fn entries_expire_after_ttl() {
    let cache = Cache::new(Arc::new(MemoryStore::new()), 1);
    let key = hotel_menu_key(Uuid::new_v4());

    cache.set_json(&key, &menu()).await;
    tokio::time::sleep(Duration::from_millis(1_100)).await;
    assert_eq!(cache.get_json::<Menu>(&key).await, None);
}

#[tokio::test]
async fn malformed_entry_is_a_miss() {
    let store = Arc::new(MemoryStore::new());
    store
        .set_ex("menu:broken", "{not json", 60)
        .await
        .expect("memory store");
    let cache = Cache::new(store, 60);
    assert_eq!(cache.get_json::<Menu>("menu:broken").await, None);
}

#[tokio::test]
async fn unavailable_store_behaves_like_empty_cache() {
    let cache = Cache::new(Arc::new(DownStore), 60);
    cache.set_json("menu:any", &menu()).await;
    cache.invalidate("menu:any").await;
    assert_eq!(cache.get_json::<Menu>("menu:any").await, None);
}

#[test]
fn menu_keys_are_namespaced() {
    let id = Uuid::nil();
    assert_eq!(
        restaurant_menu_key(id),
        "menu:restaurant:00000000-0000-0000-0000-000000000000"
    );
    assert_eq!(
        hotel_menu_key(id),
        "menu:hotel:00000000-0000-0000-0000-000000000000"
    );
}
