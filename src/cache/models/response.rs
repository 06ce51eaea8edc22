use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::marvel::UpstreamResponse;

/// 响应缓存数据模型
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedResponse {
    pub status: u16,
    pub body: Value,
    pub cached_at: i64,  // Unix timestamp
    pub expires_at: i64, // Unix timestamp
}

impl CachedResponse {
    pub fn new(response: &UpstreamResponse, ttl_secs: u64, now: i64) -> Self {
        Self {
            status: response.status,
            body: response.body.clone(),
            cached_at: now,
            expires_at: now.saturating_add(i64::try_from(ttl_secs).unwrap_or(i64::MAX)),
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }

    pub fn into_response(self) -> UpstreamResponse {
        UpstreamResponse {
            status: self.status,
            body: self.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entry_expires_once_ttl_has_elapsed() {
        let response = UpstreamResponse {
            status: 200,
            body: json!({"ok": true}),
        };
        let entry = CachedResponse::new(&response, 900, 1_000);

        assert!(!entry.is_expired(1_000));
        assert!(!entry.is_expired(1_899));
        assert!(entry.is_expired(1_900));
        assert_eq!(entry.into_response(), response);
    }
}
