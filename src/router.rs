use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    AppState,
    middleware::{auth_middleware, log_errors},
    routes,
};

// 账号相关的公开路由
fn account_routes() -> Router<AppState> {
    Router::new().route("/accounts/login/", post(routes::accounts::login))
}

// 需要令牌的目录查询路由
fn catalog_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/comics/", get(routes::comics::comics_by_title))
        .route("/api/events/{hero_id}/", get(routes::comics::hero_events))
        .route(
            "/api/similar/{comic_id}/byauthors/",
            get(routes::comics::similar_by_authors),
        )
        .route(
            "/api/similar/{comic_id}/bycharacters/",
            get(routes::comics::similar_by_characters),
        )
        .route(
            "/api/similar/{comic_id}/byseries/",
            get(routes::comics::similar_by_series),
        )
        .route_layer(axum::middleware::from_fn_with_state(state, auth_middleware))
}

// 创建主路由
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::ping))
        .merge(account_routes())
        .merge(catalog_routes(state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(log_errors)),
        )
        .with_state(state)
}
