//! Status and tag management.

use serde_json::json;

use crate::common::{
    add_member, create_organization, create_status, create_system_tag, create_tag, create_user,
    TestApp,
};
use voxboard::models::Role;

#[tokio::test]
async fn admins_manage_statuses() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let token = app.token_for(&owner).await;

    let status: serde_json::Value = app
        .post_json(
            &format!("/api/v1/organizations/{}/statuses", org.id),
            &token,
            json!({ "name": "under review", "color": "#f9c74f" }),
        )
        .await
        .assert_created()
        .json();

    let id = status["id"].as_str().unwrap();
    let updated: serde_json::Value = app
        .put_json(
            &format!("/api/v1/statuses/{}", id),
            &token,
            json!({ "name": "in review" }),
        )
        .await
        .assert_ok()
        .json();
    assert_eq!(updated["name"], "in review");

    app.delete(&format!("/api/v1/statuses/{}", id), &token)
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn plain_members_cannot_manage_statuses() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let status = create_status(&app.state.db, &org).await;

    let member = create_user(&app.state.db).await;
    add_member(&app.state.db, &org, &member, Role::Member).await;
    let token = app.token_for(&member).await;

    app.put_json(
        &format!("/api/v1/statuses/{}", status.id),
        &token,
        json!({ "name": "renamed" }),
    )
    .await
    .assert_forbidden();

    app.delete(&format!("/api/v1/statuses/{}", status.id), &token)
        .await
        .assert_forbidden();
}

#[tokio::test]
async fn admins_manage_tags() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let token = app.token_for(&owner).await;

    let tag: serde_json::Value = app
        .post_json(
            &format!("/api/v1/organizations/{}/tags", org.id),
            &token,
            json!({ "name": "bug", "color": "#f94144" }),
        )
        .await
        .assert_created()
        .json();

    let id = tag["id"].as_str().unwrap();
    let updated: serde_json::Value = app
        .put_json(
            &format!("/api/v1/tags/{}", id),
            &token,
            json!({ "color": "#ff0000" }),
        )
        .await
        .assert_ok()
        .json();
    assert_eq!(updated["color"], "#ff0000");

    app.delete(&format!("/api/v1/tags/{}", id), &token)
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn tag_creation_rejects_bad_colors() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let token = app.token_for(&owner).await;

    app.post_json(
        &format!("/api/v1/organizations/{}/tags", org.id),
        &token,
        json!({ "name": "bug", "color": "not-a-color" }),
    )
    .await
    .assert_bad_request();
}

#[tokio::test]
async fn system_default_tags_cannot_be_deleted() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    create_organization(&app.state.db, &owner).await;
    let tag_id = create_system_tag(&app.state.db).await;

    let token = app.token_for(&owner).await;
    app.delete(&format!("/api/v1/tags/{}", tag_id), &token)
        .await
        .assert_conflict();
}

#[tokio::test]
async fn statuses_of_another_organization_are_off_limits() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let status = create_status(&app.state.db, &org).await;

    let other = create_user(&app.state.db).await;
    create_organization(&app.state.db, &other).await;
    let token = app.token_for(&other).await;

    app.put_json(
        &format!("/api/v1/statuses/{}", status.id),
        &token,
        json!({ "name": "renamed" }),
    )
    .await
    .assert_forbidden();
}
