use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::TokenStore;
use crate::database::StoreError;
use crate::database::models::TokenEntity;

/// 基于 Postgres 的令牌存储
///
/// `auth_tokens.user_id` 上的唯一约束保证每个用户只有一个令牌；
/// 写入统一使用 `ON CONFLICT (user_id) DO NOTHING` 后再回读。
#[derive(Clone)]
pub struct PgTokenStore {
    pool: PgPool,
}

impl PgTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_by_user(&self, user_id: i64) -> Result<TokenEntity, StoreError> {
        let token = sqlx::query_as::<_, TokenEntity>(
            "SELECT key, user_id, created FROM auth_tokens WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(token)
    }
}

#[async_trait]
impl TokenStore for PgTokenStore {
    async fn find_by_key(&self, key: &str) -> Result<Option<TokenEntity>, StoreError> {
        let token = sqlx::query_as::<_, TokenEntity>(
            "SELECT key, user_id, created FROM auth_tokens WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(token)
    }

    async fn get_or_create(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<TokenEntity, StoreError> {
        let candidate = TokenEntity::issue(user_id, now);

        sqlx::query(
            r#"
            INSERT INTO auth_tokens (key, user_id, created)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(&candidate.key)
        .bind(candidate.user_id)
        .bind(candidate.created)
        .execute(&self.pool)
        .await?;

        self.find_by_user(user_id).await
    }

    async fn reissue(
        &self,
        expired: &TokenEntity,
        now: DateTime<Utc>,
    ) -> Result<TokenEntity, StoreError> {
        let fresh = TokenEntity::issue(expired.user_id, now);

        let mut tx = self.pool.begin().await?;

        // 只删除调用方看到的那个令牌，并发登录时另一方可能已经换过
        let deleted = sqlx::query("DELETE FROM auth_tokens WHERE key = $1")
            .bind(&expired.key)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query(
            r#"
            INSERT INTO auth_tokens (key, user_id, created)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(&fresh.key)
        .bind(fresh.user_id)
        .bind(fresh.created)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            user_id = expired.user_id,
            deleted,
            "Reissued expired token"
        );

        self.find_by_user(expired.user_id).await
    }
}
