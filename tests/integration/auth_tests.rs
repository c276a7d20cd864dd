//! Registration, login and token gating.

use serde_json::json;

use crate::common::{create_organization, create_user, TestApp, TEST_PASSWORD};

#[tokio::test]
async fn register_creates_a_user() {
    let app = TestApp::new().await;

    let response = app
        .post_json_public(
            "/api/v1/auth/register",
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "a strong password"
            }),
        )
        .await;

    response.assert_created();
    let body: serde_json::Value = response.json();
    assert_eq!(body["username"], "alice");
    // The hash must never leak
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn register_rejects_duplicate_username() {
    let app = TestApp::new().await;

    let payload = json!({
        "username": "alice",
        "email": "alice@example.com",
        "password": "a strong password"
    });
    app.post_json_public("/api/v1/auth/register", payload.clone())
        .await
        .assert_created();

    let mut second = payload;
    second["email"] = json!("other@example.com");
    app.post_json_public("/api/v1/auth/register", second)
        .await
        .assert_conflict();
}

#[tokio::test]
async fn register_rejects_short_password() {
    let app = TestApp::new().await;

    app.post_json_public(
        "/api/v1/auth/register",
        json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "short"
        }),
    )
    .await
    .assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn login_returns_a_usable_token() {
    let app = TestApp::new().await;
    let user = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &user).await;

    let response = app
        .post_json_public(
            "/api/v1/auth/login",
            json!({
                "username": user.username,
                "password": TEST_PASSWORD
            }),
        )
        .await;

    response.assert_ok();
    let body: serde_json::Value = response.json();
    let token = body["token"].as_str().expect("token missing");

    // The token authenticates reads of the caller's organization
    app.get(&format!("/api/v1/organizations/{}", org.id), token)
        .await
        .assert_ok();
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let app = TestApp::new().await;
    let user = create_user(&app.state.db).await;

    app.post_json_public(
        "/api/v1/auth/login",
        json!({
            "username": user.username,
            "password": "not the password"
        }),
    )
    .await
    .assert_unauthorized();
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = TestApp::new().await;

    app.get_public("/api/v1/organizations/00000000-0000-0000-0000-000000000000")
        .await
        .assert_unauthorized();
}

#[tokio::test]
async fn health_check_is_public() {
    let app = TestApp::new().await;

    app.get_public("/api/v1/health").await.assert_ok();
}
