/*
 * Responsibility
 * - GET /user/profile, POST /user/enter_data
 * - request gate の後ろ: subject は AuthCtx からのみ取得する (body の uid は信用しない)
 */
use axum::{Json, extract::State};
use tracing::info;

use crate::{
    api::{
        dto::{
            account::MessageResponse,
            profile::{EnterDataRequest, ProfileResponse},
        },
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    state::AppState,
};

const DATA_UPDATED: &str = "User data updated successfully";

pub async fn get_profile(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = state
        .users
        .get(&ctx.subject)
        .await?
        .ok_or(AppError::NotFound("user"))?;

    Ok(Json(ProfileResponse::from(user)))
}

pub async fn enter_data(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<EnterDataRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let profile = req.into_profile().map_err(AppError::invalid_request)?;

    // 電話番号の重複 (他 user 所有) は store が PhoneTaken → 409 を返す
    state.users.update_profile(&ctx.subject, profile).await?;

    info!(uid = %ctx.subject, role = %ctx.role, "user data updated");
    Ok(Json(MessageResponse::new(DATA_UPDATED)))
}
