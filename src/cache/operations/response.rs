use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};

use super::{CacheError, ResponseCache};
use crate::cache::keys::CacheKey;
use crate::cache::models::CachedResponse;
use crate::marvel::UpstreamResponse;
use crate::utils::unix_now;

/// 基于 Redis 的响应缓存
#[derive(Clone)]
pub struct RedisResponseCache {
    redis: Arc<RedisClient>,
}

impl RedisResponseCache {
    pub fn new(redis: Arc<RedisClient>) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl ResponseCache for RedisResponseCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<CachedResponse>, CacheError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let result: Option<String> = conn.get(key.redis_key()).await?;
        match result {
            Some(json) => {
                let entry: CachedResponse = serde_json::from_str(&json)?;
                Ok(Some(entry).filter(|e| !e.is_expired(unix_now())))
            }
            None => Ok(None),
        }
    }

    async fn put(
        &self,
        key: &CacheKey,
        response: &UpstreamResponse,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        if ttl.is_zero() {
            return Ok(());
        }

        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let entry = CachedResponse::new(response, ttl.as_secs(), unix_now());
        let json = serde_json::to_string(&entry)?;

        // 过期时间与缓存 TTL 一致
        let _: () = conn.set_ex(key.redis_key(), json, ttl.as_secs()).await?;

        Ok(())
    }
}
