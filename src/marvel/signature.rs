use chrono::{DateTime, Utc};
use serde::Serialize;

use super::QueryParams;

/// 每次请求附带的鉴权参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub ts: String,
    pub apikey: String,
    pub hash: String,
}

impl Signature {
    pub fn merge_into(self, params: &mut QueryParams) {
        params.insert("ts".into(), self.ts);
        params.insert("apikey".into(), self.apikey);
        params.insert("hash".into(), self.hash);
    }
}

#[derive(Clone)]
pub struct Signer {
    public_key: String,
    secret_key: String,
}

impl Signer {
    pub fn new(public_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// hash = md5(ts + 私钥 + 公钥)，顺序由上游规定
    pub fn sign(&self, ts: &str) -> Signature {
        let digest = md5::compute(format!("{}{}{}", ts, self.secret_key, self.public_key));
        Signature {
            ts: ts.to_string(),
            apikey: self.public_key.clone(),
            hash: format!("{:x}", digest),
        }
    }

    /// 每次调用都取当前时间，签名不能复用
    pub fn sign_now(&self) -> Signature {
        self.sign(&timestamp(Utc::now()))
    }
}

/// 秒级 Unix 时间戳，带六位微秒小数
pub fn timestamp(now: DateTime<Utc>) -> String {
    format!("{}.{:06}", now.timestamp(), now.timestamp_subsec_micros())
}
