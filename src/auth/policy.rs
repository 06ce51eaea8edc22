use chrono::{DateTime, TimeDelta, Utc};

use crate::database::models::{TokenEntity, UserEntity};

/// 令牌过期策略，由用户权限决定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPolicy {
    Expiring(TimeDelta),
    NeverExpires,
}

impl TokenPolicy {
    /// 超级用户的令牌永不过期
    pub fn for_user(user: &UserEntity, lifespan: TimeDelta) -> Self {
        if user.is_superuser {
            TokenPolicy::NeverExpires
        } else {
            TokenPolicy::Expiring(lifespan)
        }
    }

    pub fn is_expired(&self, token: &TokenEntity, now: DateTime<Utc>) -> bool {
        match self {
            TokenPolicy::Expiring(lifespan) => now - token.created > *lifespan,
            TokenPolicy::NeverExpires => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(is_superuser: bool) -> UserEntity {
        UserEntity {
            id: 1,
            username: "reader".into(),
            password_hash: String::new(),
            is_active: true,
            is_superuser,
        }
    }

    #[test]
    fn expiring_token_is_valid_up_to_its_lifespan() {
        let created = Utc::now();
        let token = TokenEntity {
            key: "k".into(),
            user_id: 1,
            created,
        };
        let policy = TokenPolicy::for_user(&user(false), TimeDelta::hours(24));

        assert!(!policy.is_expired(&token, created));
        assert!(!policy.is_expired(&token, created + TimeDelta::hours(24)));
        assert!(policy.is_expired(&token, created + TimeDelta::hours(24) + TimeDelta::seconds(1)));
    }

    #[test]
    fn superuser_tokens_never_expire() {
        let created = Utc::now();
        let token = TokenEntity {
            key: "k".into(),
            user_id: 1,
            created,
        };
        let policy = TokenPolicy::for_user(&user(true), TimeDelta::hours(24));

        assert_eq!(policy, TokenPolicy::NeverExpires);
        assert!(!policy.is_expired(&token, created + TimeDelta::days(3650)));
    }
}
