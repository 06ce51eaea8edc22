use async_trait::async_trait;
use sqlx::PgPool;

use super::UserDirectory;
use crate::database::StoreError;
use crate::database::models::UserEntity;

/// 基于 Postgres 的用户目录
#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserEntity>, StoreError> {
        let user = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, username, password_hash, is_active, is_superuser
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserEntity>, StoreError> {
        let user = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, username, password_hash, is_active, is_superuser
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
