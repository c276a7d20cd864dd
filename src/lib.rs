//! Voxboard Library
//!
//! Core functionality for the multi-tenant feedback board backend:
//! organizations, boards, posts, comments, votes and the role-based
//! authorization model that gates every mutation.

pub mod api;
pub mod config;
pub mod db;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use axum::Router;

pub use config::AppConfig;
pub use db::DbPool;
pub use middleware::{auth_middleware, AuthUser, Claims};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Database connection pool
    pub db: DbPool,
}

/// Build the full application router: public routes plus protected routes
/// behind the auth middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api::public_routes())
        .nest(
            "/api/v1",
            api::protected_routes().layer(axum::middleware::from_fn_with_state(
                state.clone(),
                middleware::auth::auth_middleware,
            )),
        )
        .with_state(state)
}
