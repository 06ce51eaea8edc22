use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// 访问令牌数据库实体，每个用户最多一条
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TokenEntity {
    pub key: String,
    pub user_id: i64,
    pub created: DateTime<Utc>,
}

impl TokenEntity {
    /// 为用户签发新令牌
    pub fn issue(user_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            key: generate_key(),
            user_id,
            created: now,
        }
    }
}

/// 生成 32 位十六进制的随机令牌
pub fn generate_key() -> String {
    Uuid::new_v4().simple().to_string()
}
