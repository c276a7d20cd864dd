//! Post lifecycle: authorship rights, pinning, status and tag assignment.

use serde_json::json;

use crate::common::{
    add_member, create_board, create_organization, create_post, create_status, create_tag,
    create_user, TestApp,
};
use voxboard::db::{OrganizationRepository, PostRepository};
use voxboard::models::Role;

#[tokio::test]
async fn new_posts_pick_up_the_organization_default_status() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let board = create_board(&app.state.db, &org, &owner).await;
    let status = create_status(&app.state.db, &org).await;
    OrganizationRepository::new(&app.state.db)
        .set_default_status(org.id, status.id)
        .await
        .unwrap();

    let token = app.token_for(&owner).await;
    let post: serde_json::Value = app
        .post_json(
            &format!("/api/v1/boards/{}/posts", board.id),
            &token,
            json!({ "title": "Needs triage" }),
        )
        .await
        .assert_created()
        .json();

    assert_eq!(post["status_id"], json!(status.id));
}

#[tokio::test]
async fn authors_can_edit_their_own_posts() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let board = create_board(&app.state.db, &org, &owner).await;

    let author = create_user(&app.state.db).await;
    add_member(&app.state.db, &org, &author, Role::Member).await;
    let post = create_post(&app.state.db, &board, &author).await;

    let token = app.token_for(&author).await;
    let updated: serde_json::Value = app
        .put_json(
            &format!("/api/v1/posts/{}", post.id),
            &token,
            json!({ "title": "Edited" }),
        )
        .await
        .assert_ok()
        .json();
    assert_eq!(updated["title"], "Edited");
}

#[tokio::test]
async fn members_cannot_edit_posts_they_did_not_write() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let board = create_board(&app.state.db, &org, &owner).await;

    let author = create_user(&app.state.db).await;
    add_member(&app.state.db, &org, &author, Role::Member).await;
    let post = create_post(&app.state.db, &board, &author).await;

    let other = create_user(&app.state.db).await;
    add_member(&app.state.db, &org, &other, Role::Member).await;
    let token = app.token_for(&other).await;

    app.put_json(
        &format!("/api/v1/posts/{}", post.id),
        &token,
        json!({ "title": "Hijacked" }),
    )
    .await
    .assert_forbidden();
}

#[tokio::test]
async fn admins_can_edit_any_post() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let board = create_board(&app.state.db, &org, &owner).await;

    let author = create_user(&app.state.db).await;
    add_member(&app.state.db, &org, &author, Role::Member).await;
    let post = create_post(&app.state.db, &board, &author).await;

    let token = app.token_for(&owner).await;
    app.put_json(
        &format!("/api/v1/posts/{}", post.id),
        &token,
        json!({ "title": "Moderated" }),
    )
    .await
    .assert_ok();
}

#[tokio::test]
async fn only_elevated_roles_can_pin_posts() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let board = create_board(&app.state.db, &org, &owner).await;

    let author = create_user(&app.state.db).await;
    add_member(&app.state.db, &org, &author, Role::Member).await;
    let post = create_post(&app.state.db, &board, &author).await;

    // Even the author cannot pin their own post
    let token = app.token_for(&author).await;
    app.put_json(
        &format!("/api/v1/posts/{}/pinned", post.id),
        &token,
        json!({ "is_pinned": true }),
    )
    .await
    .assert_forbidden();

    let token = app.token_for(&owner).await;
    let pinned: serde_json::Value = app
        .put_json(
            &format!("/api/v1/posts/{}/pinned", post.id),
            &token,
            json!({ "is_pinned": true }),
        )
        .await
        .assert_ok()
        .json();
    assert_eq!(pinned["is_pinned"], json!(true));
}

#[tokio::test]
async fn pinned_posts_are_listed_first() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let board = create_board(&app.state.db, &org, &owner).await;

    let first = create_post(&app.state.db, &board, &owner).await;
    let second = create_post(&app.state.db, &board, &owner).await;
    PostRepository::new(&app.state.db)
        .set_pinned(second.id, true)
        .await
        .unwrap();

    let token = app.token_for(&owner).await;
    let posts: Vec<serde_json::Value> = app
        .get(&format!("/api/v1/boards/{}/posts", board.id), &token)
        .await
        .assert_ok()
        .json();

    assert_eq!(posts[0]["id"], json!(second.id));
    assert_eq!(posts[1]["id"], json!(first.id));
}

#[tokio::test]
async fn assigning_a_status_from_another_organization_conflicts() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let board = create_board(&app.state.db, &org, &owner).await;
    let post = create_post(&app.state.db, &board, &owner).await;

    let other_owner = create_user(&app.state.db).await;
    let other_org = create_organization(&app.state.db, &other_owner).await;
    let foreign_status = create_status(&app.state.db, &other_org).await;

    let token = app.token_for(&owner).await;
    app.put_json(
        &format!("/api/v1/posts/{}/status", post.id),
        &token,
        json!({ "status_id": foreign_status.id }),
    )
    .await
    .assert_conflict();
}

#[tokio::test]
async fn clearing_a_status_works() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let board = create_board(&app.state.db, &org, &owner).await;
    let post = create_post(&app.state.db, &board, &owner).await;
    let status = create_status(&app.state.db, &org).await;

    let token = app.token_for(&owner).await;
    app.put_json(
        &format!("/api/v1/posts/{}/status", post.id),
        &token,
        json!({ "status_id": status.id }),
    )
    .await
    .assert_ok();

    let cleared: serde_json::Value = app
        .put_json(
            &format!("/api/v1/posts/{}/status", post.id),
            &token,
            json!({ "status_id": null }),
        )
        .await
        .assert_ok()
        .json();
    assert_eq!(cleared["status_id"], json!(null));
}

#[tokio::test]
async fn tag_replacement_is_atomic_across_organizations() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let board = create_board(&app.state.db, &org, &owner).await;
    let post = create_post(&app.state.db, &board, &owner).await;
    let own_tag = create_tag(&app.state.db, &org).await;

    let other_owner = create_user(&app.state.db).await;
    let other_org = create_organization(&app.state.db, &other_owner).await;
    let foreign_tag = create_tag(&app.state.db, &other_org).await;

    let token = app.token_for(&owner).await;
    app.put_json(
        &format!("/api/v1/posts/{}/tags", post.id),
        &token,
        json!({ "tag_ids": [own_tag.id, foreign_tag.id] }),
    )
    .await
    .assert_conflict();

    // Nothing was attached
    let tags = PostRepository::new(&app.state.db)
        .tag_ids_of(post.id)
        .await
        .unwrap();
    assert!(tags.is_empty());
}

#[tokio::test]
async fn tags_can_be_replaced_and_cleared() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let board = create_board(&app.state.db, &org, &owner).await;
    let post = create_post(&app.state.db, &board, &owner).await;
    let tag_a = create_tag(&app.state.db, &org).await;
    let tag_b = create_tag(&app.state.db, &org).await;

    let token = app.token_for(&owner).await;
    let tagged: serde_json::Value = app
        .put_json(
            &format!("/api/v1/posts/{}/tags", post.id),
            &token,
            json!({ "tag_ids": [tag_a.id, tag_b.id] }),
        )
        .await
        .assert_ok()
        .json();
    assert_eq!(tagged["tag_ids"].as_array().unwrap().len(), 2);

    let cleared: serde_json::Value = app
        .put_json(
            &format!("/api/v1/posts/{}/tags", post.id),
            &token,
            json!({ "tag_ids": [] }),
        )
        .await
        .assert_ok()
        .json();
    assert!(cleared["tag_ids"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn deleted_posts_stop_resolving() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let board = create_board(&app.state.db, &org, &owner).await;
    let post = create_post(&app.state.db, &board, &owner).await;
    let token = app.token_for(&owner).await;

    app.delete(&format!("/api/v1/posts/{}", post.id), &token)
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);

    app.get(&format!("/api/v1/posts/{}", post.id), &token)
        .await
        .assert_not_found();
}
