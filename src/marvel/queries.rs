//! 各接口对上游的查询组合
//!
//! 直接查询只调用一次上游；相似漫画查询先解析漫画关联的作者、角色或系列，
//! 再用解析出的 ID 查询漫画列表。两步严格串行，第二步依赖第一步的结果。

use serde_json::Value;

use super::{CatalogApi, QueryParams, UpstreamError, UpstreamResponse};

pub const COMICS: &str = "comics";
pub const EVENTS: &str = "events";

const DEFAULT_LIMIT: &str = "10";
const DEFAULT_OFFSET: &str = "0";

/// 关联 ID 的连接符
const ID_DELIMITER: &str = ".";

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("Seems like there is no such comic in Marvel database.")]
    NoSuchComic,
}

/// 漫画列表查询的默认参数
pub fn comics_defaults() -> QueryParams {
    [
        ("format", "comic"),
        ("formatType", "comic"),
        ("orderBy", "focDate"),
        ("limit", DEFAULT_LIMIT),
        ("offset", DEFAULT_OFFSET),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn events_defaults(hero_id: &str) -> QueryParams {
    [
        ("characters", hero_id.to_string()),
        ("limit", DEFAULT_LIMIT.to_string()),
        ("offset", DEFAULT_OFFSET.to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

/// 按标题搜索漫画，`overrides` 为校验后的调用方参数
pub async fn search_comics(
    catalog: &dyn CatalogApi,
    overrides: QueryParams,
) -> Result<UpstreamResponse, QueryError> {
    let mut params = comics_defaults();
    params.extend(overrides);
    Ok(catalog.call(COMICS, &params).await?)
}

/// 查询英雄参与的事件
pub async fn hero_events(
    catalog: &dyn CatalogApi,
    hero_id: &str,
    pagination: QueryParams,
) -> Result<UpstreamResponse, QueryError> {
    let mut params = events_defaults(hero_id);
    params.extend(pagination);
    Ok(catalog.call(EVENTS, &params).await?)
}

/// 相似漫画的关联方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Similarity {
    Authors,
    Characters,
    Series,
}

impl Similarity {
    pub fn handler_id(self) -> &'static str {
        match self {
            Similarity::Authors => "similar-by-authors",
            Similarity::Characters => "similar-by-characters",
            Similarity::Series => "similar-by-series",
        }
    }

    /// 第一步解析的资源，同时也是第二步的过滤参数名
    fn resource(self) -> &'static str {
        match self {
            Similarity::Authors => "creators",
            Similarity::Characters => "characters",
            Similarity::Series => "series",
        }
    }

    fn resolve_limit(self) -> &'static str {
        match self {
            Similarity::Series => "1",
            Similarity::Authors | Similarity::Characters => "100",
        }
    }

    /// 系列只取第一个，其余用连接符拼接
    fn filter_value(self, ids: &[String]) -> String {
        match self {
            Similarity::Series => ids[0].clone(),
            Similarity::Authors | Similarity::Characters => ids.join(ID_DELIMITER),
        }
    }
}

/// 先解析关联实体，再查询同作者 / 同角色 / 同系列的漫画
pub async fn similar_comics(
    catalog: &dyn CatalogApi,
    comic_id: &str,
    similarity: Similarity,
    pagination: QueryParams,
) -> Result<UpstreamResponse, QueryError> {
    let resolve_params: QueryParams = [
        ("comics".to_string(), comic_id.to_string()),
        ("limit".to_string(), similarity.resolve_limit().to_string()),
    ]
    .into_iter()
    .collect();

    let resolved = catalog.call(similarity.resource(), &resolve_params).await?;
    if resolved.status != 200 {
        return Ok(resolved);
    }

    let ids = result_ids(&resolved.body);
    if ids.is_empty() {
        tracing::debug!(comic_id, ?similarity, "Comic resolved to nothing");
        return Err(QueryError::NoSuchComic);
    }

    let mut params = comics_defaults();
    params.insert(
        similarity.resource().to_string(),
        similarity.filter_value(&ids),
    );
    params.extend(pagination);

    Ok(catalog.call(COMICS, &params).await?)
}

/// 取出 `data.results[].id`
fn result_ids(body: &Value) -> Vec<String> {
    body.pointer("/data/results")
        .and_then(Value::as_array)
        .map(|results| {
            results
                .iter()
                .filter_map(|item| match item.get("id") {
                    Some(Value::Number(n)) => Some(n.to_string()),
                    Some(Value::String(s)) => Some(s.clone()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}
