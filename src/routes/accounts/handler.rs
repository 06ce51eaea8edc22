use axum::extract::{Json, State, rejection::JsonRejection};

use crate::{AppState, error::AppError};

use super::model::{LoginRequest, LoginResponse};

/// 用户名密码换取令牌；已有未过期令牌时原样返回
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(req) = payload
        .map_err(|e| AppError::BadRequest(format!("JSON parse error - {}", e.body_text())))?;
    let credentials = req.validate().map_err(AppError::Validation)?;

    let token = state
        .auth
        .obtain_token(&credentials.username, &credentials.password)
        .await?;

    tracing::info!(user_id = token.user_id, "User logged in");
    Ok(Json(LoginResponse { token: token.key }))
}
