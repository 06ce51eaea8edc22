//! Marvel 公共 API 的访问层：签名、HTTP 客户端和组合查询

mod client;
pub mod queries;
mod signature;

use std::collections::BTreeMap;

use async_trait::async_trait;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use client::MarvelClient;
pub use queries::Similarity;
pub use signature::{Signature, Signer, timestamp};

/// 上游请求参数，按名称排序
pub type QueryParams = BTreeMap<String, String>;

/// 上游返回的状态码和 JSON 响应体，原样透传给调用方
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Value,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::BAD_GATEWAY);
        (status, Json(self.body)).into_response()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("catalog request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("catalog returned a non-JSON body: {0}")]
    MalformedBody(reqwest::Error),
}

/// 上游目录服务
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// 对 `resource` 发起一次 GET，参数中会附加新生成的签名
    async fn call(
        &self,
        resource: &str,
        params: &QueryParams,
    ) -> Result<UpstreamResponse, UpstreamError>;
}
