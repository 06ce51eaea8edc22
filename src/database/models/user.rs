use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 用户数据库实体
///
/// 用户由外部系统维护，这里只读取身份、启用状态和超级用户标记。
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserEntity {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub is_superuser: bool,
}
