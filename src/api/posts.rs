//! Post endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    middleware::AuthUser,
    models::{
        Comment, CreateCommentRequest, Post, SetLockedRequest, SetPinnedRequest,
        SetPostStatusRequest, SetPostTagsRequest, UpdatePostRequest, VoteToggle,
    },
    services::{CommentService, PostService, VoteService},
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(get_post).put(update_post).delete(delete_post))
        .route("/{id}/locked", put(set_locked))
        .route("/{id}/pinned", put(set_pinned))
        .route("/{id}/status", put(set_status))
        .route("/{id}/tags", put(set_tags))
        .route("/{id}/vote", post(toggle_vote))
        .route("/{id}/comments", get(list_comments).post(create_comment))
}

async fn get_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Post>, AppError> {
    let post = PostService::new(state.db.clone())
        .get(&auth_user.identity(), id)
        .await?;
    Ok(Json(post))
}

async fn update_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<Json<Post>, AppError> {
    payload.validate()?;

    let post = PostService::new(state.db.clone())
        .update(&auth_user.identity(), id, &payload)
        .await?;
    Ok(Json(post))
}

async fn delete_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    PostService::new(state.db.clone())
        .delete(&auth_user.identity(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_locked(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetLockedRequest>,
) -> Result<Json<Post>, AppError> {
    let post = PostService::new(state.db.clone())
        .set_locked(&auth_user.identity(), id, payload.is_locked)
        .await?;
    Ok(Json(post))
}

async fn set_pinned(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetPinnedRequest>,
) -> Result<Json<Post>, AppError> {
    let post = PostService::new(state.db.clone())
        .set_pinned(&auth_user.identity(), id, payload.is_pinned)
        .await?;
    Ok(Json(post))
}

async fn set_status(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetPostStatusRequest>,
) -> Result<Json<Post>, AppError> {
    let post = PostService::new(state.db.clone())
        .set_status(&auth_user.identity(), id, payload.status_id)
        .await?;
    Ok(Json(post))
}

async fn set_tags(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetPostTagsRequest>,
) -> Result<Json<Post>, AppError> {
    let post = PostService::new(state.db.clone())
        .set_tags(&auth_user.identity(), id, &payload.tag_ids)
        .await?;
    Ok(Json(post))
}

async fn toggle_vote(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<VoteToggle>, AppError> {
    let toggle = VoteService::new(state.db.clone())
        .toggle(&auth_user.identity(), id)
        .await?;
    Ok(Json(toggle))
}

async fn list_comments(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Comment>>, AppError> {
    let comments = CommentService::new(state.db.clone())
        .list_for_post(&auth_user.identity(), id)
        .await?;
    Ok(Json(comments))
}

async fn create_comment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    payload.validate()?;

    let comment = CommentService::new(state.db.clone())
        .create(&auth_user.identity(), id, &payload.content)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
