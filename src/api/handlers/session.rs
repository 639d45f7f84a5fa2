/*
 * Responsibility
 * - POST /login
 * - user store で credential を確認 → TokenService.issue で session token を発行
 */
use axum::{Json, extract::State};
use tracing::{error, info};

use crate::{
    api::dto::{
        account::normalize_email,
        session::{LoginRequest, LoginResponse},
    },
    error::AppError,
    services::auth::verify_password,
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";
const EMAIL_NOT_VERIFIED: &str = "email not verified";

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    req.validate().map_err(AppError::invalid_request)?;

    let user = state
        .users
        .get_by_email(&normalize_email(&req.email))
        .await?
        .ok_or(AppError::Unauthorized(INVALID_CREDENTIALS))?;

    if !user.email_verified {
        return Err(AppError::Unauthorized(EMAIL_NOT_VERIFIED));
    }

    if user.password_hash.is_empty() {
        error!(uid = %user.uid, "stored password hash is missing");
        return Err(AppError::Internal);
    }

    let matches = verify_password(
        state.hasher.clone(),
        req.password.trim().to_string(),
        user.password_hash.clone(),
    )
    .await?;
    if !matches {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS));
    }

    if user.role.trim().is_empty() {
        error!(uid = %user.uid, "stored role is missing");
        return Err(AppError::Internal);
    }

    let jwt_token = state.tokens.issue(&user.uid, &user.role)?;

    info!(uid = %user.uid, role = %user.role, "user logged in");
    Ok(Json(LoginResponse {
        user_id: user.uid,
        role: user.role,
        jwt_token,
    }))
}
