use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;

use super::{CacheError, ResponseCache};
use crate::cache::keys::CacheKey;
use crate::cache::models::CachedResponse;
use crate::marvel::UpstreamResponse;
use crate::utils::unix_now;

/// 进程内响应缓存，读取时淘汰该键的过期条目，写入时清扫全部过期条目
#[derive(Default)]
pub struct MemoryResponseCache {
    entries: DashMap<CacheKey, CachedResponse>,
}

impl MemoryResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ResponseCache for MemoryResponseCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<CachedResponse>, CacheError> {
        let now = unix_now();
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                return Ok(Some(entry.value().clone()));
            }
        }
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        Ok(None)
    }

    async fn put(
        &self,
        key: &CacheKey,
        response: &UpstreamResponse,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let now = unix_now();
        self.entries.retain(|_, entry| !entry.is_expired(now));

        let entry = CachedResponse::new(response, ttl.as_secs(), now);
        self.entries.insert(key.clone(), entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::keys::response_cache_key;
    use axum::http::HeaderMap;
    use serde_json::json;

    fn key(name: &str) -> CacheKey {
        response_cache_key(name, &[], &[], None, &HeaderMap::new())
    }

    fn response() -> UpstreamResponse {
        UpstreamResponse {
            status: 200,
            body: json!({"data": {"count": 1}}),
        }
    }

    #[tokio::test]
    async fn stored_entry_is_returned_within_ttl() {
        let cache = MemoryResponseCache::new();
        cache
            .put(&key("a"), &response(), Duration::from_secs(900))
            .await
            .unwrap();

        let hit = cache.get(&key("a")).await.unwrap().unwrap();
        assert_eq!(hit.into_response(), response());
        assert!(cache.get(&key("b")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_entry_is_a_miss_and_evicted() {
        let cache = MemoryResponseCache::new();
        cache.put(&key("a"), &response(), Duration::ZERO).await.unwrap();
        assert_eq!(cache.len(), 1);

        assert!(cache.get(&key("a")).await.unwrap().is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn writes_sweep_expired_entries_under_other_keys() {
        let cache = MemoryResponseCache::new();
        cache.put(&key("a"), &response(), Duration::ZERO).await.unwrap();
        cache.put(&key("b"), &response(), Duration::ZERO).await.unwrap();
        assert_eq!(cache.len(), 1);

        cache
            .put(&key("c"), &response(), Duration::from_secs(900))
            .await
            .unwrap();
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&key("c")).await.unwrap().is_some());
    }
}
