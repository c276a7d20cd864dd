//! Authentication endpoints

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use validator::Validate;

use crate::{
    middleware::auth::create_access_token,
    models::{LoginRequest, LoginResponse, RegisterRequest, User},
    services::AuthService,
    utils::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    payload.validate()?;

    let service = AuthService::new(state.db.clone());
    let user = service
        .register(&payload.username, &payload.email, &payload.password)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint failed") {
                AppError::conflict("Username or email already taken")
            } else {
                tracing::error!("Failed to register user: {}", e);
                AppError::internal("Failed to register user")
            }
        })?;

    Ok((StatusCode::CREATED, Json(user)))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let service = AuthService::new(state.db.clone());
    let user = service
        .authenticate(&payload.username, &payload.password)
        .await
        .map_err(|e| {
            tracing::error!("Authentication failure: {}", e);
            AppError::internal("Authentication failed")
        })?
        .ok_or_else(|| AppError::unauthorized("Invalid username or password"))?;

    let token = create_access_token(
        &user.id,
        &user.username,
        &state.config.auth.jwt_secret,
        state.config.auth.token_expiry_hours,
    )
    .map_err(|e| {
        tracing::error!("Failed to issue token: {}", e);
        AppError::internal("Authentication failed")
    })?;

    Ok(Json(LoginResponse { token, user }))
}
