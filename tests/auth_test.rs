use std::env;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use tower::ServiceExt;
use uuid::Uuid;

use hackhyre_backend::middleware::{auth, auth::Claims, rate_limit};

const TEST_SECRET: &str = "test_secret_key";

fn setup_config() {
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("DATABASE_URL", "postgres://localhost/hackhyre_test");
    env::set_var("JWT_SECRET", TEST_SECRET);
    env::set_var("OPENAI_API_KEY", "sk-test");
    env::set_var("PUBLIC_RPS", "100");
    env::set_var("RECRUITER_RPS", "100");
    // several tests share the process; only the first init wins
    let _ = hackhyre_backend::config::init_config();
}

fn token_for(role: &str) -> String {
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        role: Some(role.to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("encode token")
}

async fn ok_handler() -> &'static str {
    "ok"
}

fn protected_app() -> Router {
    Router::new()
        .route("/protected", get(ok_handler))
        .layer(axum::middleware::from_fn(auth::require_recruiter))
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    setup_config();
    let app = protected_app();

    let req = Request::builder()
        .uri("/protected")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_role_is_forbidden() {
    setup_config();
    let app = protected_app();

    let req = Request::builder()
        .uri("/protected")
        .header("authorization", format!("Bearer {}", token_for("seeker")))
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn recruiter_token_passes() {
    setup_config();
    let app = protected_app();

    let req = Request::builder()
        .uri("/protected")
        .header("authorization", format!("Bearer {}", token_for("recruiter")))
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    setup_config();
    let app = protected_app();

    let req = Request::builder()
        .uri("/protected")
        .header("authorization", "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn rate_limit_rejects_past_the_window() {
    setup_config();
    let app = Router::new()
        .route("/limited", get(ok_handler))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::new_rps_state(2),
            rate_limit::rps_middleware,
        ));

    for _ in 0..2 {
        let req = Request::builder()
            .uri("/limited")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = Request::builder()
        .uri("/limited")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
}
