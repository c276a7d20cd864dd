//! Organization endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    middleware::AuthUser,
    models::{
        AddMemberRequest, CreateOrganizationRequest, Member, Organization,
        UpdateMemberRequest, UpdateOrganizationRequest,
    },
    services::{BoardService, OrganizationService, StatusService, TagService},
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_organization))
        .route("/{id}", get(get_organization).put(update_organization))
        .route("/{id}/members", get(list_members).post(add_member))
        .route(
            "/{id}/members/{user_id}",
            axum::routing::put(update_member).delete(remove_member),
        )
        .route("/{id}/boards", get(list_boards).post(create_board))
        .route("/{id}/statuses", get(list_statuses).post(create_status))
        .route("/{id}/tags", get(list_tags).post(create_tag))
}

async fn create_organization(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateOrganizationRequest>,
) -> Result<(StatusCode, Json<Organization>), AppError> {
    payload.validate()?;

    let org = OrganizationService::new(state.db.clone())
        .create(&auth_user.identity(), &auth_user.username, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(org)))
}

async fn get_organization(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Organization>, AppError> {
    let org = OrganizationService::new(state.db.clone())
        .get(&auth_user.identity(), id)
        .await?;
    Ok(Json(org))
}

async fn update_organization(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrganizationRequest>,
) -> Result<Json<Organization>, AppError> {
    payload.validate()?;

    let org = OrganizationService::new(state.db.clone())
        .update(&auth_user.identity(), id, &payload)
        .await?;
    Ok(Json(org))
}

async fn list_members(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Member>>, AppError> {
    let members = OrganizationService::new(state.db.clone())
        .list_members(&auth_user.identity(), id)
        .await?;
    Ok(Json(members))
}

async fn add_member(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<Member>), AppError> {
    let user = crate::db::UserRepository::new(&state.db)
        .get_by_id(payload.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up user: {}", e);
            AppError::internal("Failed to add member")
        })?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let member = OrganizationService::new(state.db.clone())
        .add_member(
            &auth_user.identity(),
            id,
            payload.user_id,
            payload.role,
            &user.username,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(member)))
}

async fn update_member(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateMemberRequest>,
) -> Result<Json<Member>, AppError> {
    let member = OrganizationService::new(state.db.clone())
        .update_member_role(&auth_user.identity(), id, user_id, payload.role)
        .await?;
    Ok(Json(member))
}

async fn remove_member(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    OrganizationService::new(state.db.clone())
        .remove_member(&auth_user.identity(), id, user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_boards(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<crate::models::Board>>, AppError> {
    let boards = BoardService::new(state.db.clone())
        .list_for_organization(&auth_user.identity(), id)
        .await?;
    Ok(Json(boards))
}

async fn create_board(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<crate::models::CreateBoardRequest>,
) -> Result<(StatusCode, Json<crate::models::Board>), AppError> {
    payload.validate()?;

    let board = BoardService::new(state.db.clone())
        .create(&auth_user.identity(), id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(board)))
}

async fn list_statuses(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<crate::models::Status>>, AppError> {
    let statuses = StatusService::new(state.db.clone())
        .list_for_organization(&auth_user.identity(), id)
        .await?;
    Ok(Json(statuses))
}

async fn create_status(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<crate::models::CreateStatusRequest>,
) -> Result<(StatusCode, Json<crate::models::Status>), AppError> {
    payload.validate()?;

    let status = StatusService::new(state.db.clone())
        .create(&auth_user.identity(), id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(status)))
}

async fn list_tags(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<crate::models::Tag>>, AppError> {
    let tags = TagService::new(state.db.clone())
        .list_for_organization(&auth_user.identity(), id)
        .await?;
    Ok(Json(tags))
}

async fn create_tag(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<crate::models::CreateTagRequest>,
) -> Result<(StatusCode, Json<crate::models::Tag>), AppError> {
    payload.validate()?;

    let tag = TagService::new(state.db.clone())
        .create(&auth_user.identity(), id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(tag)))
}
