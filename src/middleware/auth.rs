use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use crate::{AppState, auth::AuthFailure, error::AppError};

/// 校验 `Authorization: Bearer <token>`，通过后把 `AuthContext` 放入请求扩展
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .map(|header| header.token().to_string())
        .ok_or(AppError::Unauthorized(AuthFailure::MissingCredentials))?;

    let context = state.auth.authenticate(&key).await.inspect_err(|e| {
        tracing::debug!(error = %e, "Token rejected");
    })?;

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}
