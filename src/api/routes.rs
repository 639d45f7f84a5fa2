/*
 * Responsibility
 * - URL 構造を定義
 * - 認証不要: /register, /login, /verify-email, /resend-verification, /forget-password
 * - request gate 必須: /user 配下 (route 単位ではなく nest した router ごと layer を掛ける)
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::{
    account::{forgot_password, register, resend_verification, verify_email},
    profile::{enter_data, get_profile},
    session::login,
};
use crate::middleware::auth::access;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let user = Router::new()
        .route("/profile", get(get_profile))
        .route("/enter_data", post(enter_data));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/verify-email", post(verify_email))
        .route("/resend-verification", post(resend_verification))
        .route("/forget-password", post(forgot_password))
        .nest("/user", access::apply(user, state))
}
