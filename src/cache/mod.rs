// 缓存模块
// 包含缓存数据结构和操作逻辑

pub mod keys;
pub mod models;
pub mod operations;

use std::future::Future;
use std::time::Duration;

pub use keys::{CacheKey, response_cache_key};
pub use models::CachedResponse;
pub use operations::{CacheError, MemoryResponseCache, RedisResponseCache, ResponseCache};

use crate::marvel::UpstreamResponse;

/// 缓存阶段：命中直接返回；未命中执行 `compute`，成功 (2xx) 的结果写入缓存
///
/// 缓存只是优化，读写失败只记录日志，不影响请求本身。
pub async fn cached<F, Fut, E>(
    cache: &dyn ResponseCache,
    key: &CacheKey,
    ttl: Duration,
    compute: F,
) -> Result<UpstreamResponse, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<UpstreamResponse, E>>,
{
    match cache.get(key).await {
        Ok(Some(entry)) => {
            tracing::debug!(key = %key, cached_at = entry.cached_at, "cache hit");
            return Ok(entry.into_response());
        }
        Ok(None) => tracing::debug!(key = %key, "cache miss"),
        Err(e) => tracing::warn!(key = %key, error = %e, "failed to read response cache"),
    }

    let response = compute().await?;

    if response.is_success() {
        if let Err(e) = cache.put(key, &response, ttl).await {
            tracing::warn!(key = %key, error = %e, "failed to write response cache");
        }
    }

    Ok(response)
}
