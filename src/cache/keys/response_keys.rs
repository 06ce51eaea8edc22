use std::collections::BTreeMap;
use std::fmt;

use axum::http::HeaderMap;
use serde_json::json;

use crate::database::models::UserEntity;

/// 响应缓存键前缀
const RESPONSE_PREFIX: &str = "response:";

/// 参与缓存键计算的请求头
const KEY_HEADERS: &[&str] = &["accept", "accept-language"];

/// 响应缓存键：请求标识的 md5 摘要
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Redis 中使用的完整键
    pub fn redis_key(&self) -> String {
        format!("{}{}", RESPONSE_PREFIX, self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 由接口标识、路径参数、查询参数、用户和请求头生成缓存键
///
/// 查询参数按名称排序，同名参数保留原有顺序，因此参数顺序不同的同一请求得到相同的键。
/// `Authorization` 不参与计算，用户身份已经覆盖了它。
pub fn response_cache_key(
    handler_id: &str,
    path_args: &[(&str, String)],
    query: &[(String, String)],
    user: Option<&UserEntity>,
    headers: &HeaderMap,
) -> CacheKey {
    let kwargs: BTreeMap<&str, &str> = path_args
        .iter()
        .map(|(name, value)| (*name, value.as_str()))
        .collect();

    let mut query_params: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (name, value) in query {
        query_params
            .entry(name.as_str())
            .or_default()
            .push(value.as_str());
    }

    let header_values: BTreeMap<&str, &str> = KEY_HEADERS
        .iter()
        .filter_map(|name| {
            headers
                .get(*name)
                .and_then(|v| v.to_str().ok())
                .map(|v| (*name, v))
        })
        .collect();

    let identity = json!({
        "unique_method_id": handler_id,
        "kwargs": kwargs,
        "query_params": query_params,
        "user": user.map(|u| u.id),
        "headers": header_values,
    });

    CacheKey(format!("{:x}", md5::compute(identity.to_string())))
}
