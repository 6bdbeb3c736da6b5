mod common;

use actix_web::http::StatusCode;
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use common::{bearer, cleanup_users, login_user, register_user, test_pool};
use cookbook::auth::AuthMiddleware;
use cookbook::routes;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

macro_rules! build_app {
    ($pool:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($pool.clone()))
                .wrap(Logger::default())
                .service(routes::health::health)
                .service(
                    web::scope("/api")
                        .wrap(AuthMiddleware)
                        .configure(routes::config),
                ),
        )
        .await
    };
}

#[actix_rt::test]
async fn test_register_and_login_flow() {
    let pool = test_pool().await;
    let email = "auth_flow@example.com";
    cleanup_users(&pool, &[email]).await;

    let app = build_app!(pool);

    // Register.
    let auth = register_user(&app, email, "StrongP@ssw0rd123", Some("flow_user")).await;
    assert!(!auth["token"].as_str().unwrap().is_empty());
    assert!(auth["user_id"].as_i64().unwrap() > 0);
    assert_eq!(auth["role"], "user");

    // The same email cannot register twice.
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "email": email, "password": "StrongP@ssw0rd123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Login returns a fresh token for the same account.
    let login = login_user(&app, email, "StrongP@ssw0rd123").await;
    assert_eq!(login["user_id"], auth["user_id"]);
    assert_eq!(login["role"], "user");

    // The token opens protected routes.
    let req = test::TestRequest::get()
        .uri("/api/recipes/mine")
        .insert_header(bearer(&login))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    cleanup_users(&pool, &[email]).await;
}

#[actix_rt::test]
async fn test_weak_passwords_rejected_and_no_account_created() {
    let pool = test_pool().await;
    let email = "weak_pw@example.com";
    cleanup_users(&pool, &[email]).await;

    let app = build_app!(pool);

    let weak_passwords = [
        "Sh0rt!pw",        // shorter than 12
        "alllowercase1!x", // no uppercase
        "ALLUPPERCASE1!X", // no lowercase
        "NoDigitsHere!!!", // no digit
        "NoSpecials12345", // no special character
    ];

    for weak in weak_passwords {
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "email": email, "password": weak }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "password {:?} should have been rejected",
            weak
        );
    }

    // None of the rejected attempts created a record: registering now with a
    // compliant password succeeds.
    let auth = register_user(&app, email, "StrongP@ssw0rd123", None).await;
    assert!(auth["user_id"].as_i64().unwrap() > 0);

    cleanup_users(&pool, &[email]).await;
}

#[actix_rt::test]
async fn test_invalid_email_rejected() {
    let pool = test_pool().await;
    let app = build_app!(pool);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "email": "not-an-email", "password": "StrongP@ssw0rd123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "not-an-email", "password": "whatever" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_rt::test]
async fn test_wrong_password_and_unknown_email_are_indistinguishable() {
    let pool = test_pool().await;
    let email = "generic_fail@example.com";
    cleanup_users(&pool, &[email, "no_such_account@example.com"]).await;

    let app = build_app!(pool);
    register_user(&app, email, "StrongP@ssw0rd123", None).await;

    // Known email, wrong password.
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": "WrongP@ssw0rd123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let wrong_pw_status = resp.status();
    let wrong_pw_body: Value = test::read_body_json(resp).await;

    // Unknown email.
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "no_such_account@example.com", "password": "WrongP@ssw0rd123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let unknown_status = resp.status();
    let unknown_body: Value = test::read_body_json(resp).await;

    assert_eq!(wrong_pw_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    // Same response class AND same body: nothing leaks about which part failed.
    assert_eq!(wrong_pw_body, unknown_body);

    cleanup_users(&pool, &[email]).await;
}

#[actix_rt::test]
async fn test_inactive_account_cannot_login() {
    let pool = test_pool().await;
    let email = "inactive@example.com";
    cleanup_users(&pool, &[email]).await;

    let app = build_app!(pool);
    register_user(&app, email, "StrongP@ssw0rd123", None).await;

    sqlx::query("UPDATE users SET active = FALSE WHERE email = $1")
        .bind(email)
        .execute(&pool)
        .await
        .unwrap();

    // Correct password, disabled account: same generic rejection.
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": "StrongP@ssw0rd123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    cleanup_users(&pool, &[email]).await;
}

#[actix_rt::test]
async fn test_protected_routes_require_a_valid_token() {
    let pool = test_pool().await;
    let app = build_app!(pool);

    // No token at all.
    let req = test::TestRequest::get().uri("/api/recipes/mine").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Garbage bearer token.
    let req = test::TestRequest::get()
        .uri("/api/messages")
        .insert_header(("Authorization", "Bearer not.a.token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_admin_routes_forbidden_for_regular_users() {
    let pool = test_pool().await;
    let email = "not_an_admin@example.com";
    cleanup_users(&pool, &[email]).await;

    let app = build_app!(pool);
    let auth = register_user(&app, email, "StrongP@ssw0rd123", None).await;

    // Authenticated but not an admin: 403, not 401.
    let req = test::TestRequest::get()
        .uri("/api/admin")
        .insert_header(bearer(&auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    cleanup_users(&pool, &[email]).await;
}

#[actix_rt::test]
async fn test_logout_discards_the_session_cookie() {
    let pool = test_pool().await;
    let app = build_app!(pool);

    let req = test::TestRequest::post().uri("/api/auth/logout").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let set_cookie = resp
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .expect("logout must emit a removal cookie");
    assert!(set_cookie.starts_with("token="));
}

#[actix_rt::test]
async fn test_unknown_route_is_404() {
    let pool = test_pool().await;
    let app = build_app!(pool);

    // Outside the authenticated scope: the router's no-match answer.
    let req = test::TestRequest::get().uri("/no/such/route").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Inside it, an authenticated caller hitting a missing resource gets the
    // same class.
    let email = "router_404@example.com";
    cleanup_users(&pool, &[email]).await;
    let auth = register_user(&app, email, "StrongP@ssw0rd123", None).await;
    let req = test::TestRequest::get()
        .uri("/api/no/such/route")
        .insert_header(bearer(&auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    cleanup_users(&pool, &[email]).await;
}
