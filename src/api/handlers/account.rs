/*
 * Responsibility
 * - POST /register, /verify-email, /resend-verification, /forget-password
 * - DTO validation → user store / hasher / mailer 呼び出し
 * - 認証不要 (request gate の外側)
 */
use axum::{Json, extract::State, http::StatusCode};
use subtle::ConstantTimeEq;
use tracing::{error, info, warn};

use crate::{
    api::dto::account::{
        EmailRequest, MessageResponse, RegisterRequest, VerifyEmailRequest, normalize_email,
    },
    error::AppError,
    services::{
        auth::hash_password,
        users::{NewUser, generate_verification_code},
    },
    state::AppState,
};

pub const REGISTERED: &str =
    "User registered successfully. Please check your email to verify your account";
const EMAIL_VERIFIED: &str = "Email verified successfully";
const VERIFICATION_SENT: &str = "Verification email sent";
const RESET_REQUESTED: &str =
    "If an account exists for this email, a password reset email has been sent";

fn new_code() -> Result<String, AppError> {
    generate_verification_code().map_err(|e| {
        error!(error = %e, "failed to generate verification code");
        AppError::Internal
    })
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    req.validate().map_err(AppError::invalid_request)?;

    let email = normalize_email(&req.email);
    let password_hash =
        hash_password(state.hasher.clone(), req.password.trim().to_string()).await?;
    let code = new_code()?;

    let user = state
        .users
        .create(NewUser {
            email,
            role: req.role.trim().to_string(),
            password_hash,
            verification_code: code.clone(),
        })
        .await?;

    // verification mail が送れなければ user ごと削除する
    if let Err(e) = state.mailer.send_verification(&user.email, &code).await {
        if let Err(del) = state.users.delete(&user.uid).await {
            error!(uid = %user.uid, error = %del, "failed to roll back unverified user");
        }
        return Err(e.into());
    }

    info!(uid = %user.uid, role = %user.role, "user registered");
    Ok((StatusCode::OK, Json(MessageResponse::new(REGISTERED))))
}

pub async fn verify_email(
    State(state): State<AppState>,
    Json(req): Json<VerifyEmailRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    req.validate().map_err(AppError::invalid_request)?;

    let user = state
        .users
        .get_by_email(&normalize_email(&req.email))
        .await?
        .ok_or(AppError::NotFound("user"))?;

    // 検証済みでも code は照合する (code は verify 後も保持される)
    let matches = user
        .verification_code
        .as_deref()
        .is_some_and(|stored| bool::from(stored.as_bytes().ct_eq(req.code.trim().as_bytes())));
    if !matches {
        warn!(uid = %user.uid, "email verification code mismatch");
        return Err(AppError::invalid_request("invalid verification code"));
    }

    if user.email_verified {
        return Ok(Json(MessageResponse::new(EMAIL_VERIFIED)));
    }

    state.users.mark_email_verified(&user.uid).await?;
    info!(uid = %user.uid, "email verified");
    Ok(Json(MessageResponse::new(EMAIL_VERIFIED)))
}

pub async fn resend_verification(
    State(state): State<AppState>,
    Json(req): Json<EmailRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    req.validate().map_err(AppError::invalid_request)?;

    let user = state
        .users
        .get_by_email(&normalize_email(&req.email))
        .await?
        .ok_or(AppError::NotFound("user"))?;

    if user.email_verified {
        return Err(AppError::conflict("email already verified"));
    }

    let code = new_code()?;
    state.users.set_verification_code(&user.uid, &code).await?;
    state.mailer.send_verification(&user.email, &code).await?;

    Ok(Json(MessageResponse::new(VERIFICATION_SENT)))
}

/// Same response whether or not the account exists.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<EmailRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    req.validate().map_err(AppError::invalid_request)?;

    if let Some(user) = state
        .users
        .get_by_email(&normalize_email(&req.email))
        .await?
        && let Err(e) = state.mailer.send_password_reset(&user.email).await
    {
        error!(uid = %user.uid, error = %e, "failed to send password reset email");
    }

    Ok(Json(MessageResponse::new(RESET_REQUESTED)))
}
