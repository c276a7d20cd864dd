//! Tag endpoints

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
    models::{Tag, UpdateTagRequest},
    services::TagService,
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/{id}", put(update_tag).delete(delete_tag))
}

async fn update_tag(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTagRequest>,
) -> Result<Json<Tag>, AppError> {
    payload.validate()?;

    let tag = TagService::new(state.db.clone())
        .update(&auth_user.identity(), id, &payload)
        .await?;
    Ok(Json(tag))
}

async fn delete_tag(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    TagService::new(state.db.clone())
        .delete(&auth_user.identity(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
