/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - token / store / hasher / dispatcher の error を統一的に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::services::auth::password::HashError;
use crate::services::auth::TokenError;
use crate::services::mailer::DispatchError;
use crate::services::users::StoreError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidRequest(String),

    // The reason is the only thing the client learns about a rejected credential.
    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => AppError::NotFound("user"),
            StoreError::AlreadyExists => AppError::conflict("email already exists"),
            StoreError::PhoneTaken => AppError::conflict("Phone number already exists"),
            StoreError::Backend(msg) => {
                error!(error = %msg, "user store failure");
                AppError::Internal
            }
        }
    }
}

impl From<HashError> for AppError {
    fn from(e: HashError) -> Self {
        error!(error = %e, "password hashing failure");
        AppError::Internal
    }
}

impl From<DispatchError> for AppError {
    fn from(e: DispatchError) -> Self {
        error!(error = %e, "email dispatch failure");
        AppError::Internal
    }
}

// Only issuance errors reach this conversion; the request gate maps
// verification failures to `Unauthorized` itself.
impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        error!(error = %e, "failed to issue session token");
        AppError::Internal
    }
}
