use axum::{
    Extension,
    extract::{Path, Query, State, rejection::PathRejection},
    http::HeaderMap,
};

use crate::{
    AppState,
    auth::AuthContext,
    cache::{cached, response_cache_key},
    error::AppError,
    marvel::{
        Similarity, UpstreamResponse,
        queries::{hero_events as query_hero_events, search_comics, similar_comics},
    },
};

use super::model::{Pagination, TitleQuery};

const COMICS_LIST: &str = "comics-list";
const HERO_EVENTS: &str = "hero-events";

type RawQuery = Vec<(String, String)>;

/// 路径中的 ID 只接受十进制数字，否则按未匹配路由处理；原样转发，不做数值转换
fn numeric_id(path: Result<Path<String>, PathRejection>) -> Result<String, AppError> {
    match path {
        Ok(Path(id)) if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) => Ok(id),
        _ => Err(AppError::NotFound),
    }
}

#[axum::debug_handler]
pub async fn comics_by_title(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
    Query(query): Query<RawQuery>,
) -> Result<UpstreamResponse, AppError> {
    let key = response_cache_key(COMICS_LIST, &[], &query, Some(&auth.user), &headers);

    cached(state.cache.as_ref(), &key, state.config.cache_ttl(), || async {
        let params = TitleQuery::validate(&query).map_err(AppError::Validation)?;
        let response = search_comics(state.catalog.as_ref(), params.into_params()).await?;
        Ok::<_, AppError>(response)
    })
    .await
}

#[axum::debug_handler]
pub async fn hero_events(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
    path: Result<Path<String>, PathRejection>,
    Query(query): Query<RawQuery>,
) -> Result<UpstreamResponse, AppError> {
    let hero_id = numeric_id(path)?;
    let key = response_cache_key(
        HERO_EVENTS,
        &[("hero_id", hero_id.clone())],
        &query,
        Some(&auth.user),
        &headers,
    );

    cached(state.cache.as_ref(), &key, state.config.cache_ttl(), || async {
        let pagination = Pagination::validate(&query).map_err(AppError::Validation)?;
        let response =
            query_hero_events(state.catalog.as_ref(), &hero_id, pagination.into_params()).await?;
        Ok::<_, AppError>(response)
    })
    .await
}

async fn similar(
    state: AppState,
    auth: AuthContext,
    headers: HeaderMap,
    path: Result<Path<String>, PathRejection>,
    query: RawQuery,
    similarity: Similarity,
) -> Result<UpstreamResponse, AppError> {
    let comic_id = numeric_id(path)?;
    let key = response_cache_key(
        similarity.handler_id(),
        &[("comic_id", comic_id.clone())],
        &query,
        Some(&auth.user),
        &headers,
    );

    cached(state.cache.as_ref(), &key, state.config.cache_ttl(), || async {
        let pagination = Pagination::validate(&query).map_err(AppError::Validation)?;
        let response = similar_comics(
            state.catalog.as_ref(),
            &comic_id,
            similarity,
            pagination.into_params(),
        )
        .await?;
        Ok::<_, AppError>(response)
    })
    .await
}

#[axum::debug_handler]
pub async fn similar_by_authors(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
    path: Result<Path<String>, PathRejection>,
    Query(query): Query<RawQuery>,
) -> Result<UpstreamResponse, AppError> {
    similar(state, auth, headers, path, query, Similarity::Authors).await
}

#[axum::debug_handler]
pub async fn similar_by_characters(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
    path: Result<Path<String>, PathRejection>,
    Query(query): Query<RawQuery>,
) -> Result<UpstreamResponse, AppError> {
    similar(state, auth, headers, path, query, Similarity::Characters).await
}

#[axum::debug_handler]
pub async fn similar_by_series(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
    path: Result<Path<String>, PathRejection>,
    Query(query): Query<RawQuery>,
) -> Result<UpstreamResponse, AppError> {
    similar(state, auth, headers, path, query, Similarity::Series).await
}
