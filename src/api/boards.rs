//! Board endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    middleware::AuthUser,
    models::{Board, CreatePostRequest, Post, SetLockedRequest, UpdateBoardRequest},
    services::{BoardService, PostService},
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(get_board).put(update_board).delete(delete_board))
        .route("/{id}/locked", put(set_locked))
        .route("/{id}/posts", get(list_posts).post(create_post))
}

async fn get_board(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Board>, AppError> {
    let board = BoardService::new(state.db.clone())
        .get(&auth_user.identity(), id)
        .await?;
    Ok(Json(board))
}

async fn update_board(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBoardRequest>,
) -> Result<Json<Board>, AppError> {
    payload.validate()?;

    let board = BoardService::new(state.db.clone())
        .update(&auth_user.identity(), id, &payload)
        .await?;
    Ok(Json(board))
}

async fn delete_board(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    BoardService::new(state.db.clone())
        .delete(&auth_user.identity(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_locked(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetLockedRequest>,
) -> Result<Json<Board>, AppError> {
    let board = BoardService::new(state.db.clone())
        .set_locked(&auth_user.identity(), id, payload.is_locked)
        .await?;
    Ok(Json(board))
}

async fn list_posts(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Post>>, AppError> {
    let posts = PostService::new(state.db.clone())
        .list_for_board(&auth_user.identity(), id)
        .await?;
    Ok(Json(posts))
}

async fn create_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    payload.validate()?;

    let post = PostService::new(state.db.clone())
        .create(&auth_user.identity(), id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(post)))
}
