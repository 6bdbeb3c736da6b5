//! Shared plumbing for the integration suite: a migrated pool, user
//! registration/login shortcuts and email-scoped cleanup.
//!
//! The suite needs a PostgreSQL instance reachable through `DATABASE_URL`
//! (loaded from `.env` when present). Each test works with its own email
//! addresses so runs never collide; cleanup cascades through recipes,
//! comments and messages.

// Each test binary uses its own subset of these helpers.
#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test;
use serde_json::{json, Value};
use sqlx::PgPool;

pub async fn test_pool() -> PgPool {
    dotenv::dotenv().ok();
    if std::env::var("JWT_SECRET").is_err() {
        std::env::set_var("JWT_SECRET", "integration-test-secret");
    }

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test DB");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Removes the accounts with the given emails; child rows cascade.
pub async fn cleanup_users(pool: &PgPool, emails: &[&str]) {
    for email in emails {
        let _ = sqlx::query("DELETE FROM users WHERE email = $1")
            .bind(email)
            .execute(pool)
            .await;
    }
}

/// Registers an account through the API and returns the auth response
/// (`token`, `user_id`, `role`).
pub async fn register_user<S, B>(
    app: &S,
    email: &str,
    password: &str,
    username: Option<&str>,
) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let mut payload = json!({ "email": email, "password": password });
    if let Some(username) = username {
        payload["username"] = json!(username);
    }

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    assert!(
        status.is_success(),
        "registration of {} failed: {} {:?}",
        email,
        status,
        body
    );
    body
}

/// Logs in through the API and returns the auth response.
pub async fn login_user<S, B>(app: &S, email: &str, password: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    assert!(
        status.is_success(),
        "login of {} failed: {} {:?}",
        email,
        status,
        body
    );
    body
}

/// Bearer header value for a token out of an auth response.
pub fn bearer(auth: &Value) -> (&'static str, String) {
    (
        "Authorization",
        format!("Bearer {}", auth["token"].as_str().expect("token in auth response")),
    )
}
