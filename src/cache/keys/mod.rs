/// 缓存键模块
/// 提供各种缓存键生成函数

// 响应缓存键模块
pub mod response_keys;

pub use response_keys::{CacheKey, response_cache_key};
