use serde::{Deserialize, Serialize};

use crate::error::FieldErrors;

const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// 校验通过的登录凭据
#[derive(Debug, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    /// 用户名去除首尾空白，密码保持原样
    pub fn validate(self) -> Result<Credentials, FieldErrors> {
        let mut errors = FieldErrors::new();

        let username = match self.username.map(|u| u.trim().to_string()) {
            None => {
                errors.insert("username".into(), vec![REQUIRED.into()]);
                None
            }
            Some(u) if u.is_empty() => {
                errors.insert("username".into(), vec![BLANK.into()]);
                None
            }
            Some(u) => Some(u),
        };

        let password = match self.password {
            None => {
                errors.insert("password".into(), vec![REQUIRED.into()]);
                None
            }
            Some(p) if p.is_empty() => {
                errors.insert("password".into(), vec![BLANK.into()]);
                None
            }
            Some(p) => Some(p),
        };

        match (username, password) {
            (Some(username), Some(password)) => Ok(Credentials { username, password }),
            _ => Err(errors),
        }
    }
}
