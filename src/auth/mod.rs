//! 令牌认证：签发、校验与过期策略

mod authenticator;
mod policy;

pub use authenticator::{AuthContext, Authenticator};
pub use policy::TokenPolicy;

use crate::database::StoreError;

/// 携带令牌访问时的认证失败原因，对外统一返回 401
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    #[error("Authentication credentials were not provided.")]
    MissingCredentials,

    #[error("Invalid token.")]
    InvalidToken,

    #[error("User inactive or deleted.")]
    UserInactive,

    #[error("Token has expired.")]
    TokenExpired,
}

/// 用户名密码登录失败原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoginFailure {
    #[error("Unable to log in with provided credentials.")]
    InvalidCredentials,

    #[error("User account is disabled.")]
    AccountDisabled,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Rejected(#[from] AuthFailure),

    #[error(transparent)]
    Login(#[from] LoginFailure),

    #[error(transparent)]
    Store(#[from] StoreError),
}
