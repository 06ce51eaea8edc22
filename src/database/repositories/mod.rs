//! 存储库：令牌与用户的读写接口及其实现

mod memory;
mod token;
mod user;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::StoreError;
use super::models::{TokenEntity, UserEntity};

pub use memory::{MemoryTokenStore, MemoryUserDirectory};
pub use token::PgTokenStore;
pub use user::PgUserDirectory;

/// 用户目录（外部协作方，只读）
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserEntity>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<UserEntity>, StoreError>;
}

/// 令牌存储
///
/// 每个用户同一时刻只能有一个令牌，实现必须在并发登录时也保证这一点。
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn find_by_key(&self, key: &str) -> Result<Option<TokenEntity>, StoreError>;

    /// 返回用户现有令牌，不存在时创建
    async fn get_or_create(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<TokenEntity, StoreError>;

    /// 删除过期令牌并签发新令牌，返回该用户当前有效的令牌
    async fn reissue(
        &self,
        expired: &TokenEntity,
        now: DateTime<Utc>,
    ) -> Result<TokenEntity, StoreError>;
}
