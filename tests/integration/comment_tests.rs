//! Comment creation and moderation.

use serde_json::json;

use crate::common::{
    add_member, create_board, create_comment, create_organization, create_post, create_user,
    lock_post, TestApp,
};
use voxboard::models::Role;

#[tokio::test]
async fn members_can_comment_on_posts() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let board = create_board(&app.state.db, &org, &owner).await;
    let post = create_post(&app.state.db, &board, &owner).await;

    let member = create_user(&app.state.db).await;
    add_member(&app.state.db, &org, &member, Role::Member).await;
    let token = app.token_for(&member).await;

    let comment: serde_json::Value = app
        .post_json(
            &format!("/api/v1/posts/{}/comments", post.id),
            &token,
            json!({ "content": "Great idea" }),
        )
        .await
        .assert_created()
        .json();
    assert_eq!(comment["content"], "Great idea");
    assert_eq!(comment["author_id"], json!(member.id));
}

#[tokio::test]
async fn locked_posts_reject_new_comments() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let board = create_board(&app.state.db, &org, &owner).await;
    let post = create_post(&app.state.db, &board, &owner).await;
    lock_post(&app.state.db, &post).await;

    let token = app.token_for(&owner).await;
    app.post_json(
        &format!("/api/v1/posts/{}/comments", post.id),
        &token,
        json!({ "content": "Too late" }),
    )
    .await
    .assert_conflict();
}

#[tokio::test]
async fn authors_can_edit_their_own_comments() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let board = create_board(&app.state.db, &org, &owner).await;
    let post = create_post(&app.state.db, &board, &owner).await;

    let member = create_user(&app.state.db).await;
    add_member(&app.state.db, &org, &member, Role::Member).await;
    let comment = create_comment(&app.state.db, &post, &member).await;

    let token = app.token_for(&member).await;
    let updated: serde_json::Value = app
        .put_json(
            &format!("/api/v1/comments/{}", comment.id),
            &token,
            json!({ "content": "Edited" }),
        )
        .await
        .assert_ok()
        .json();
    assert_eq!(updated["content"], "Edited");
}

#[tokio::test]
async fn members_cannot_edit_comments_they_did_not_write() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let board = create_board(&app.state.db, &org, &owner).await;
    let post = create_post(&app.state.db, &board, &owner).await;

    let author = create_user(&app.state.db).await;
    add_member(&app.state.db, &org, &author, Role::Member).await;
    let comment = create_comment(&app.state.db, &post, &author).await;

    let other = create_user(&app.state.db).await;
    add_member(&app.state.db, &org, &other, Role::Member).await;
    let token = app.token_for(&other).await;

    app.put_json(
        &format!("/api/v1/comments/{}", comment.id),
        &token,
        json!({ "content": "Hijacked" }),
    )
    .await
    .assert_forbidden();
}

#[tokio::test]
async fn admins_can_delete_any_comment() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let board = create_board(&app.state.db, &org, &owner).await;
    let post = create_post(&app.state.db, &board, &owner).await;

    let author = create_user(&app.state.db).await;
    add_member(&app.state.db, &org, &author, Role::Member).await;
    let comment = create_comment(&app.state.db, &post, &author).await;

    let token = app.token_for(&owner).await;
    app.delete(&format!("/api/v1/comments/{}", comment.id), &token)
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);

    // The comment is no longer listed
    let comments: Vec<serde_json::Value> = app
        .get(&format!("/api/v1/posts/{}/comments", post.id), &token)
        .await
        .assert_ok()
        .json();
    assert!(comments.is_empty());
}

#[tokio::test]
async fn comments_under_a_deleted_post_stop_resolving() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let board = create_board(&app.state.db, &org, &owner).await;
    let post = create_post(&app.state.db, &board, &owner).await;
    let comment = create_comment(&app.state.db, &post, &owner).await;

    let token = app.token_for(&owner).await;
    app.delete(&format!("/api/v1/posts/{}", post.id), &token)
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);

    app.put_json(
        &format!("/api/v1/comments/{}", comment.id),
        &token,
        json!({ "content": "Orphaned" }),
    )
    .await
    .assert_not_found();
}
