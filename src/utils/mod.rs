use bcrypt::verify;

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password.as_bytes(), hash)
}

/// 当前 Unix 时间戳（秒）
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}
