//! API routes and handlers
//!
//! Thin HTTP endpoints over the service layer: handlers parse the request,
//! call one service operation and translate its result. No authorization or
//! lifecycle decision lives here.

use axum::{routing::get, Router};

use crate::AppState;

mod auth;
mod boards;
mod comments;
mod health;
mod organizations;
mod posts;
mod statuses;
mod tags;

/// Public API routes (no authentication required)
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/auth", auth::routes())
}

/// Protected API routes (authentication required)
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .nest("/organizations", organizations::routes())
        .nest("/boards", boards::routes())
        .nest("/posts", posts::routes())
        .nest("/comments", comments::routes())
        .nest("/statuses", statuses::routes())
        .nest("/tags", tags::routes())
}
