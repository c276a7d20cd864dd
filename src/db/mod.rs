//! Database layer
//!
//! SQLite-backed persistence for the feedback board: organizations, members,
//! boards, posts, comments, statuses, tags and votes. Each entity has a
//! narrow repository; soft-deleted rows are filtered in every read query.

pub mod board_repository;
pub mod comment_repository;
pub mod member_repository;
pub mod organization_repository;
pub mod ownership_repository;
pub mod post_repository;
pub mod status_repository;
pub mod tag_repository;
pub mod user_repository;
pub mod vote_repository;

pub use board_repository::BoardRepository;
pub use comment_repository::CommentRepository;
pub use member_repository::MemberRepository;
pub use organization_repository::OrganizationRepository;
pub use ownership_repository::{OwnershipRepository, ResourceOwnership};
pub use post_repository::PostRepository;
pub use status_repository::StatusRepository;
pub use tag_repository::TagRepository;
pub use user_repository::UserRepository;
pub use vote_repository::VoteRepository;

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite};
use std::time::Duration;

use crate::config::DatabaseConfig;

/// Database connection pool type
pub type DbPool = Pool<Sqlite>;

/// Initialize the database connection pool and run migrations
pub async fn init_pool(config: &DatabaseConfig) -> Result<DbPool> {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect(&config.url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Parse a stored timestamp, tolerating both RFC3339 and the bare SQLite
/// datetime format.
pub(crate) fn parse_db_timestamp(ts: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S") {
        return DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc);
    }
    Utc::now()
}

/// Parse a stored uuid, falling back to nil on corrupt data.
pub(crate) fn parse_db_uuid(s: &str) -> uuid::Uuid {
    uuid::Uuid::parse_str(s).unwrap_or_else(|_| uuid::Uuid::nil())
}
