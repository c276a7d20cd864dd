//! Post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A user-submitted item within a board.
///
/// The lock flag is independent of the board's lock: a locked post rejects
/// new comments and votes, while a locked board only rejects new posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub board_id: Uuid,
    pub author_id: Uuid,
    pub status_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub is_private: bool,
    pub is_pinned: bool,
    pub is_locked: bool,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
    #[serde(default)]
    pub vote_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_private: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_private: Option<bool>,
}

/// Request to pin or unpin a post
#[derive(Debug, Clone, Deserialize)]
pub struct SetPinnedRequest {
    pub is_pinned: bool,
}

/// Request to replace a post's tag set
#[derive(Debug, Clone, Deserialize)]
pub struct SetPostTagsRequest {
    pub tag_ids: Vec<Uuid>,
}

/// Request to assign a post's status
#[derive(Debug, Clone, Deserialize)]
pub struct SetPostStatusRequest {
    pub status_id: Option<Uuid>,
}
