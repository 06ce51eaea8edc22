use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_MARVEL_API_URL: &str = "http://gateway.marvel.com/v1/public";

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub marvel_api_url: String,
    pub marvel_public_key: String,
    pub marvel_secret_key: String,
    pub token_lifespan_secs: u64,
    pub cache_ttl_secs: u64,
    pub upstream_timeout_secs: u64,
}

/// 解析可选数值配置，格式错误时告警并回退到默认值
fn parse_or_default<T: FromStr>(name: &str, raw: Option<&str>, default: T) -> T {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!("Ignoring malformed {}={:?}, using the default", name, raw);
            default
        }
    }
}

/// TOKEN_LIFESPAN 形如 "24h"，缺省 24 小时
fn token_lifespan_secs(raw: Option<&str>) -> u64 {
    let raw = raw.map(|v| v.trim().trim_end_matches('h'));
    parse_or_default("TOKEN_LIFESPAN", raw, 24u64).saturating_mul(3600)
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        let var = |name: &str| env::var(name).ok();

        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            redis_url: env::var("REDIS_URL")?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "::".into()),
            server_port: parse_or_default("SERVER_PORT", var("SERVER_PORT").as_deref(), 3000),
            marvel_api_url: env::var("MARVEL_API_URL")
                .unwrap_or_else(|_| DEFAULT_MARVEL_API_URL.into()),
            marvel_public_key: env::var("MARVEL_PUBLIC_KEY")?,
            marvel_secret_key: env::var("MARVEL_SECRET_KEY")?,
            token_lifespan_secs: token_lifespan_secs(var("TOKEN_LIFESPAN").as_deref()),
            cache_ttl_secs: parse_or_default("CACHE_TTL", var("CACHE_TTL").as_deref(), 900),
            upstream_timeout_secs: parse_or_default(
                "UPSTREAM_TIMEOUT",
                var("UPSTREAM_TIMEOUT").as_deref(),
                10,
            ),
        })
    }

    pub fn token_lifespan(&self) -> Duration {
        Duration::from_secs(self.token_lifespan_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}
