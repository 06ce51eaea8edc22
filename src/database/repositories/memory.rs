use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use super::{TokenStore, UserDirectory};
use crate::database::StoreError;
use crate::database::models::{TokenEntity, UserEntity};

/// 进程内令牌存储，按用户 ID 分片加锁
#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: DashMap<i64, TokenEntity>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn find_by_key(&self, key: &str) -> Result<Option<TokenEntity>, StoreError> {
        Ok(self
            .tokens
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value().clone()))
    }

    async fn get_or_create(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<TokenEntity, StoreError> {
        let entry = self
            .tokens
            .entry(user_id)
            .or_insert_with(|| TokenEntity::issue(user_id, now));
        Ok(entry.value().clone())
    }

    async fn reissue(
        &self,
        expired: &TokenEntity,
        now: DateTime<Utc>,
    ) -> Result<TokenEntity, StoreError> {
        let mut entry = self
            .tokens
            .entry(expired.user_id)
            .or_insert_with(|| TokenEntity::issue(expired.user_id, now));

        if entry.key == expired.key {
            *entry = TokenEntity::issue(expired.user_id, now);
        }

        Ok(entry.value().clone())
    }
}

/// 进程内用户目录
#[derive(Default)]
pub struct MemoryUserDirectory {
    users: DashMap<i64, UserEntity>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: UserEntity) {
        self.users.insert(user.id, user);
    }

    pub fn remove(&self, id: i64) {
        self.users.remove(&id);
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserEntity>, StoreError> {
        Ok(self
            .users
            .iter()
            .find(|entry| entry.username == username)
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserEntity>, StoreError> {
        Ok(self.users.get(&id).map(|entry| entry.value().clone()))
    }
}
