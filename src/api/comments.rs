//! Comment endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::put,
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    middleware::AuthUser,
    models::{Comment, UpdateCommentRequest},
    services::CommentService,
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/{id}", put(update_comment).delete(delete_comment))
}

async fn update_comment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCommentRequest>,
) -> Result<Json<Comment>, AppError> {
    payload.validate()?;

    let comment = CommentService::new(state.db.clone())
        .update(&auth_user.identity(), id, &payload.content)
        .await?;
    Ok(Json(comment))
}

async fn delete_comment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    CommentService::new(state.db.clone())
        .delete(&auth_user.identity(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
