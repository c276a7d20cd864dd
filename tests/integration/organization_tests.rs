//! Organization lifecycle and member management.

use serde_json::json;

use crate::common::{add_member, create_board, create_organization, create_user, TestApp};
use voxboard::models::Role;

#[tokio::test]
async fn create_organization_makes_caller_the_owner() {
    let app = TestApp::new().await;
    let user = create_user(&app.state.db).await;
    let token = app.token_for(&user).await;

    let response = app
        .post_json(
            "/api/v1/organizations",
            &token,
            json!({ "name": "Acme", "slug": "acme" }),
        )
        .await;

    response.assert_created();
    let org: serde_json::Value = response.json();
    let org_id = org["id"].as_str().unwrap().to_string();

    // The creating token sees the fresh organization immediately
    app.get(&format!("/api/v1/organizations/{}", org_id), &token)
        .await
        .assert_ok();

    let members: Vec<serde_json::Value> = app
        .get(&format!("/api/v1/organizations/{}/members", org_id), &token)
        .await
        .assert_ok()
        .json();

    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["user_id"], json!(user.id));
    assert_eq!(members[0]["role"], json!("owner"));
}

#[tokio::test]
async fn create_organization_rejects_duplicate_slug() {
    let app = TestApp::new().await;
    let user = create_user(&app.state.db).await;
    let token = app.token_for(&user).await;

    app.post_json(
        "/api/v1/organizations",
        &token,
        json!({ "name": "Acme", "slug": "acme" }),
    )
    .await
    .assert_created();

    app.post_json(
        "/api/v1/organizations",
        &token,
        json!({ "name": "Other Acme", "slug": "acme" }),
    )
    .await
    .assert_conflict();
}

#[tokio::test]
async fn create_organization_rejects_invalid_slug() {
    let app = TestApp::new().await;
    let user = create_user(&app.state.db).await;
    let token = app.token_for(&user).await;

    app.post_json(
        "/api/v1/organizations",
        &token,
        json!({ "name": "Acme", "slug": "Not A Slug!" }),
    )
    .await
    .assert_bad_request();
}

#[tokio::test]
async fn non_members_cannot_see_an_organization() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;

    let outsider = create_user(&app.state.db).await;
    let token = app.token_for(&outsider).await;

    app.get(&format!("/api/v1/organizations/{}", org.id), &token)
        .await
        .assert_not_found();
}

#[tokio::test]
async fn members_cannot_update_the_organization() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;

    let member = create_user(&app.state.db).await;
    add_member(&app.state.db, &org, &member, Role::Member).await;
    let token = app.token_for(&member).await;

    app.put_json(
        &format!("/api/v1/organizations/{}", org.id),
        &token,
        json!({ "name": "Renamed" }),
    )
    .await
    .assert_forbidden();
}

#[tokio::test]
async fn owner_can_add_and_promote_members() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let token = app.token_for(&owner).await;

    let newcomer = create_user(&app.state.db).await;
    let member: serde_json::Value = app
        .post_json(
            &format!("/api/v1/organizations/{}/members", org.id),
            &token,
            json!({ "user_id": newcomer.id }),
        )
        .await
        .assert_created()
        .json();
    assert_eq!(member["role"], json!("member"));

    let updated: serde_json::Value = app
        .put_json(
            &format!("/api/v1/organizations/{}/members/{}", org.id, newcomer.id),
            &token,
            json!({ "role": "admin" }),
        )
        .await
        .assert_ok()
        .json();
    assert_eq!(updated["role"], json!("admin"));
}

#[tokio::test]
async fn adding_an_existing_member_conflicts() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let token = app.token_for(&owner).await;

    app.post_json(
        &format!("/api/v1/organizations/{}/members", org.id),
        &token,
        json!({ "user_id": owner.id }),
    )
    .await
    .assert_conflict();
}

#[tokio::test]
async fn last_owner_cannot_be_demoted_or_removed() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let token = app.token_for(&owner).await;

    app.put_json(
        &format!("/api/v1/organizations/{}/members/{}", org.id, owner.id),
        &token,
        json!({ "role": "member" }),
    )
    .await
    .assert_conflict();

    app.delete(
        &format!("/api/v1/organizations/{}/members/{}", org.id, owner.id),
        &token,
    )
    .await
    .assert_conflict();
}

#[tokio::test]
async fn removed_admin_loses_powers_on_the_next_request() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let board = create_board(&app.state.db, &org, &owner).await;

    let admin = create_user(&app.state.db).await;
    add_member(&app.state.db, &org, &admin, Role::Admin).await;
    let admin_token = app.token_for(&admin).await;

    // Works while the membership stands
    app.put_json(
        &format!("/api/v1/boards/{}/locked", board.id),
        &admin_token,
        json!({ "is_locked": true }),
    )
    .await
    .assert_ok();

    let owner_token = app.token_for(&owner).await;
    app.delete(
        &format!("/api/v1/organizations/{}/members/{}", org.id, admin.id),
        &owner_token,
    )
    .await
    .assert_status(axum::http::StatusCode::NO_CONTENT);

    // The same token no longer carries any authority
    app.put_json(
        &format!("/api/v1/boards/{}/locked", board.id),
        &admin_token,
        json!({ "is_locked": false }),
    )
    .await
    .assert_forbidden();

    app.get(&format!("/api/v1/organizations/{}", org.id), &admin_token)
        .await
        .assert_not_found();
}

#[tokio::test]
async fn owner_can_be_removed_once_another_owner_exists() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let second = create_user(&app.state.db).await;
    add_member(&app.state.db, &org, &second, Role::Owner).await;

    let token = app.token_for(&owner).await;
    app.delete(
        &format!("/api/v1/organizations/{}/members/{}", org.id, owner.id),
        &token,
    )
    .await
    .assert_status(axum::http::StatusCode::NO_CONTENT);
}
