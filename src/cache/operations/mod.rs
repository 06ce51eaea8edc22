/// 缓存操作
/// 提供缓存操作的功能实现
mod memory;
mod response;

use std::time::Duration;

use async_trait::async_trait;

use crate::cache::keys::CacheKey;
use crate::cache::models::CachedResponse;
use crate::marvel::UpstreamResponse;

pub use memory::MemoryResponseCache;
pub use response::RedisResponseCache;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 响应缓存，过期条目视为未命中
#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Result<Option<CachedResponse>, CacheError>;

    async fn put(
        &self,
        key: &CacheKey,
        response: &UpstreamResponse,
        ttl: Duration,
    ) -> Result<(), CacheError>;
}
