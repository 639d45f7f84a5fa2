/*
 * Responsibility
 * - Config読み込み → 依存生成 (TokenService / UserStore / hasher / mailer) → Router 組み立て
 * - Middleware の適用 (HTTP 共通 / CORS)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware;
use crate::services::{
    auth::{Argon2Hasher, TokenService},
    mailer::LogEmailDispatcher,
    users::InMemoryUserStore,
};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,zintrix_backend=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // stderr は起動方法によって見えないことがあるので tracing にも流す
        tracing::error!(?info, "panic");

        // development: プロセスごと落として即気付けるようにする
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_state(config: &Config) -> Result<AppState> {
    // session token の発行と検証は同じ HS256 key を使う
    let tokens = Arc::new(TokenService::new(config.jwt_secret.as_bytes()));
    let hasher = Arc::new(Argon2Hasher::new()?);

    Ok(AppState::new(
        tokens,
        Arc::new(InMemoryUserStore::new()),
        hasher,
        Arc::new(LogEmailDispatcher::new()),
    ))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .merge(api::routes(state.clone()))
        .with_state(state);

    // CORS を一番外側に置き、preflight が request gate に届かないようにする
    let router = middleware::http::apply(router, config);
    middleware::cors::apply(router, config)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::config::AppEnv;
    use crate::state::testing::test_state;

    fn config() -> Config {
        Config {
            addr: "127.0.0.1:0".parse().unwrap(),
            app_env: AppEnv::Development,
            cors_allowed_origins: vec![],
            jwt_secret: "k".into(),
            request_timeout: Duration::from_secs(5),
            body_limit_bytes: 1024 * 1024,
        }
    }

    #[tokio::test]
    async fn health_is_public() {
        let (state, _, _) = test_state();
        let res = build_router(state, &config())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("x-request-id"));
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn preflight_does_not_hit_request_gate() {
        let (state, _, _) = test_state();
        let res = build_router(state, &config())
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/user/profile")
                    .header(header::ORIGIN, "https://app.example")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (state, _, _) = test_state();
        let res = build_router(state, &config())
            .oneshot(Request::builder().uri("/api/v1/login").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
