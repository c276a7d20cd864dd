//! Status endpoints

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
    models::{Status, UpdateStatusRequest},
    services::StatusService,
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/{id}", put(update_status).delete(delete_status))
}

async fn update_status(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Status>, AppError> {
    payload.validate()?;

    let status = StatusService::new(state.db.clone())
        .update(&auth_user.identity(), id, &payload)
        .await?;
    Ok(Json(status))
}

async fn delete_status(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    StatusService::new(state.db.clone())
        .delete(&auth_user.identity(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
