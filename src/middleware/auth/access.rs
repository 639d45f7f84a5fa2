//! Request gate: session token (HS256 JWT) 検証 → AuthCtx を extensions に入れる
//!
//! - `Authorization: Bearer <token>` を受け取り、TokenService で検証する
//! - 失敗理由 (malformed / forged / expired) はクライアントに区別して返さない
//! - 成功時は `AuthCtx { subject, role }` を request extensions に格納する

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

pub const MISSING_AUTHORIZATION: &str = "missing authorization";
pub const MALFORMED_AUTHORIZATION: &str = "malformed authorization";
pub const INVALID_TOKEN: &str = "invalid or expired token";

const BEARER_SCHEME: &str = "Bearer";

/// 保護したい router に request gate を適用する。
///
/// 例：
/// ```ignore
/// let user = middleware::auth::access::apply(user_routes(), state.clone());
/// router = router.nest("/user", user);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())?;

    // 署名検証 + exp は TokenService 側で実施
    let claims = match state.tokens.verify(token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(
                error = ?err,
                method = %req.method(),
                path = %req.uri().path(),
                "session token verification failed"
            );
            return Err(AppError::Unauthorized(INVALID_TOKEN));
        }
    };

    let auth_ctx = AuthCtx::new(claims.subject, claims.role);

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The header must split on single spaces into exactly two parts.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AppError::Unauthorized(MISSING_AUTHORIZATION))?;

    let value = value
        .to_str()
        .map_err(|_| AppError::Unauthorized(MALFORMED_AUTHORIZATION))?;

    if value.is_empty() {
        return Err(AppError::Unauthorized(MISSING_AUTHORIZATION));
    }

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) => Ok(token),
        _ => Err(AppError::Unauthorized(MALFORMED_AUTHORIZATION)),
    }
}
