use std::collections::BTreeMap;

use axum::Json;
use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::auth::{AuthError, AuthFailure};
use crate::database::StoreError;
use crate::marvel::UpstreamError;
use crate::marvel::queries::QueryError;

/// 字段名 -> 错误信息列表
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub const NON_FIELD_ERRORS: &str = "non_field_errors";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Unauthorized(AuthFailure),

    #[error("invalid request: {0:?}")]
    Validation(FieldErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("Seems like there is no such comic in Marvel database.")]
    NoSuchComic,

    #[error("Not found.")]
    NotFound,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Rejected(failure) => AppError::Unauthorized(failure),
            AuthError::Login(failure) => AppError::Validation(FieldErrors::from([(
                NON_FIELD_ERRORS.to_string(),
                vec![failure.to_string()],
            )])),
            AuthError::Store(e) => AppError::Store(e),
        }
    }
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Upstream(e) => AppError::Upstream(e),
            QueryError::NoSuchComic => AppError::NoSuchComic,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

fn detail(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            detail: message.into(),
        }),
    )
        .into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthorized(failure) => {
                let mut response = detail(StatusCode::UNAUTHORIZED, failure.to_string());
                response.headers_mut().insert(
                    header::WWW_AUTHENTICATE,
                    header::HeaderValue::from_static("Bearer"),
                );
                response
            }
            AppError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            AppError::BadRequest(message) => detail(StatusCode::BAD_REQUEST, message),
            AppError::NoSuchComic => {
                detail(StatusCode::BAD_REQUEST, AppError::NoSuchComic.to_string())
            }
            AppError::NotFound => detail(StatusCode::NOT_FOUND, "Not found."),
            AppError::Upstream(e) => {
                tracing::error!(error = %e, "catalog API unavailable");
                detail(StatusCode::BAD_GATEWAY, "Upstream catalog service is unavailable.")
            }
            AppError::Store(e) => {
                tracing::error!(error = %e, "store error");
                detail(StatusCode::INTERNAL_SERVER_ERROR, "A server error occurred.")
            }
        }
    }
}
