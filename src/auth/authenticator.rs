use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use super::{AuthError, AuthFailure, LoginFailure, TokenPolicy};
use crate::database::models::{TokenEntity, UserEntity};
use crate::database::{StoreError, TokenStore, UserDirectory};
use crate::utils::verify_password;

/// 认证通过后放入请求扩展的上下文
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: UserEntity,
    pub token: TokenEntity,
}

#[derive(Clone)]
pub struct Authenticator {
    tokens: Arc<dyn TokenStore>,
    users: Arc<dyn UserDirectory>,
    lifespan: TimeDelta,
}

impl Authenticator {
    pub fn new(
        tokens: Arc<dyn TokenStore>,
        users: Arc<dyn UserDirectory>,
        lifespan: Duration,
    ) -> Self {
        Self {
            tokens,
            users,
            lifespan: TimeDelta::from_std(lifespan).unwrap_or(TimeDelta::MAX),
        }
    }

    pub fn policy_for(&self, user: &UserEntity) -> TokenPolicy {
        TokenPolicy::for_user(user, self.lifespan)
    }

    pub async fn authenticate(&self, key: &str) -> Result<AuthContext, AuthError> {
        self.authenticate_at(key, Utc::now()).await
    }

    /// 校验令牌：存在、用户有效、未过期
    pub async fn authenticate_at(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthContext, AuthError> {
        let token = self
            .tokens
            .find_by_key(key)
            .await?
            .ok_or(AuthFailure::InvalidToken)?;

        let user = self
            .users
            .find_by_id(token.user_id)
            .await?
            .filter(|user| user.is_active)
            .ok_or(AuthFailure::UserInactive)?;

        if self.policy_for(&user).is_expired(&token, now) {
            return Err(AuthFailure::TokenExpired.into());
        }

        Ok(AuthContext { user, token })
    }

    pub async fn obtain_token(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenEntity, AuthError> {
        self.obtain_token_at(username, password, Utc::now()).await
    }

    /// 用户名密码换取令牌；已有令牌过期时删除并重新签发
    pub async fn obtain_token_at(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenEntity, AuthError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(LoginFailure::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash).map_err(StoreError::from)? {
            return Err(LoginFailure::InvalidCredentials.into());
        }

        if !user.is_active {
            return Err(LoginFailure::AccountDisabled.into());
        }

        let token = self.tokens.get_or_create(user.id, now).await?;

        if self.policy_for(&user).is_expired(&token, now) {
            tracing::info!(user_id = user.id, "Token expired, issuing a new one");
            return Ok(self.tokens.reissue(&token, now).await?);
        }

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{MemoryTokenStore, MemoryUserDirectory};
    use std::collections::HashSet;

    const LIFESPAN: Duration = Duration::from_secs(24 * 3600);

    fn user(id: i64, username: &str, is_active: bool, is_superuser: bool) -> UserEntity {
        UserEntity {
            id,
            username: username.into(),
            password_hash: bcrypt::hash("secret-pass", 4).unwrap(),
            is_active,
            is_superuser,
        }
    }

    type Setup = (Authenticator, Arc<MemoryTokenStore>, Arc<MemoryUserDirectory>);

    fn setup(users: Vec<UserEntity>) -> Setup {
        let tokens = Arc::new(MemoryTokenStore::new());
        let directory = Arc::new(MemoryUserDirectory::new());
        for u in users {
            directory.insert(u);
        }
        let auth = Authenticator::new(tokens.clone(), directory.clone(), LIFESPAN);
        (auth, tokens, directory)
    }

    #[tokio::test]
    async fn unknown_token_is_invalid() {
        let (auth, _, _) = setup(vec![user(1, "reader", true, false)]);

        let err = auth.authenticate("nope").await.unwrap_err();
        assert!(matches!(err, AuthError::Rejected(AuthFailure::InvalidToken)));
    }

    #[tokio::test]
    async fn login_twice_returns_the_same_token() {
        let (auth, tokens, _) = setup(vec![user(1, "reader", true, false)]);

        let t1 = auth.obtain_token("reader", "secret-pass").await.unwrap();
        let t2 = auth.obtain_token("reader", "secret-pass").await.unwrap();

        assert_eq!(t1.key, t2.key);
        assert_eq!(tokens.len(), 1);
    }

    #[tokio::test]
    async fn expired_token_is_rejected_and_replaced_on_next_login() {
        let (auth, tokens, _) = setup(vec![user(1, "reader", true, false)]);
        let now = Utc::now();

        let t1 = auth.obtain_token_at("reader", "secret-pass", now).await.unwrap();
        assert!(auth.authenticate_at(&t1.key, now).await.is_ok());

        let later = now + TimeDelta::hours(24) + TimeDelta::seconds(1);
        let err = auth.authenticate_at(&t1.key, later).await.unwrap_err();
        assert!(matches!(err, AuthError::Rejected(AuthFailure::TokenExpired)));

        let t2 = auth.obtain_token_at("reader", "secret-pass", later).await.unwrap();
        assert_ne!(t1.key, t2.key);
        assert_eq!(tokens.len(), 1);

        let err = auth.authenticate_at(&t1.key, later).await.unwrap_err();
        assert!(matches!(err, AuthError::Rejected(AuthFailure::InvalidToken)));
        assert!(auth.authenticate_at(&t2.key, later).await.is_ok());
    }

    #[tokio::test]
    async fn superuser_token_survives_past_lifespan() {
        let (auth, _, _) = setup(vec![user(1, "admin", true, true)]);
        let now = Utc::now();

        let t1 = auth.obtain_token_at("admin", "secret-pass", now).await.unwrap();
        let much_later = now + TimeDelta::days(90);

        assert!(auth.authenticate_at(&t1.key, much_later).await.is_ok());
        let t2 = auth.obtain_token_at("admin", "secret-pass", much_later).await.unwrap();
        assert_eq!(t1.key, t2.key);
    }

    #[tokio::test]
    async fn inactive_or_deleted_user_is_rejected() {
        let (auth, _, directory) = setup(vec![user(1, "reader", true, false)]);

        let token = auth.obtain_token("reader", "secret-pass").await.unwrap();
        directory.insert(user(1, "reader", false, false));
        let err = auth.authenticate(&token.key).await.unwrap_err();
        assert!(matches!(err, AuthError::Rejected(AuthFailure::UserInactive)));

        directory.remove(1);
        let err = auth.authenticate(&token.key).await.unwrap_err();
        assert!(matches!(err, AuthError::Rejected(AuthFailure::UserInactive)));
    }

    #[tokio::test]
    async fn bad_credentials_and_disabled_accounts_cannot_log_in() {
        let (auth, tokens, _) = setup(vec![
            user(1, "reader", true, false),
            user(2, "ghost", false, false),
        ]);

        let err = auth.obtain_token("reader", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::Login(LoginFailure::InvalidCredentials)));

        let err = auth.obtain_token("nobody", "secret-pass").await.unwrap_err();
        assert!(matches!(err, AuthError::Login(LoginFailure::InvalidCredentials)));

        let err = auth.obtain_token("ghost", "secret-pass").await.unwrap_err();
        assert!(matches!(err, AuthError::Login(LoginFailure::AccountDisabled)));

        assert!(tokens.is_empty());
    }

    /// 并发登录同一用户，返回各自拿到的令牌
    async fn login_in_parallel(auth: &Authenticator, at: DateTime<Utc>) -> HashSet<String> {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let auth = auth.clone();
                tokio::spawn(async move {
                    auth.obtain_token_at("reader", "secret-pass", at).await.unwrap()
                })
            })
            .collect();

        let mut keys = HashSet::new();
        for handle in handles {
            keys.insert(handle.await.unwrap().key);
        }
        keys
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_logins_share_one_token() {
        let (auth, tokens, _) = setup(vec![user(1, "reader", true, false)]);

        let keys = login_in_parallel(&auth, Utc::now()).await;

        assert_eq!(keys.len(), 1);
        assert_eq!(tokens.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_logins_after_expiry_reissue_once() {
        let (auth, tokens, _) = setup(vec![user(1, "reader", true, false)]);
        let now = Utc::now();
        let old = auth.obtain_token_at("reader", "secret-pass", now).await.unwrap();

        let later = now + TimeDelta::hours(25);
        let keys = login_in_parallel(&auth, later).await;

        assert_eq!(keys.len(), 1);
        assert!(!keys.contains(&old.key));
        assert_eq!(tokens.len(), 1);

        let key = keys.into_iter().next().unwrap();
        assert!(auth.authenticate_at(&key, later).await.is_ok());
        let err = auth.authenticate_at(&old.key, later).await.unwrap_err();
        assert!(matches!(err, AuthError::Rejected(AuthFailure::InvalidToken)));
    }
}
