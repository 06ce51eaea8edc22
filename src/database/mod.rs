// 数据库模块
// 包含数据库实体定义和存储库操作

pub mod models; // 数据库实体定义
pub mod repositories; // 存储库实现

pub use models::{TokenEntity, UserEntity};
pub use repositories::{
    MemoryTokenStore, MemoryUserDirectory, PgTokenStore, PgUserDirectory, TokenStore,
    UserDirectory,
};

/// 存储层错误
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("password hash error: {0}")]
    Password(#[from] bcrypt::BcryptError),
}
