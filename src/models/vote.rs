//! Vote model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A vote on a post. The row's existence is the vote; there is no boolean
/// column, and (post_id, user_id) is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Result of a vote toggle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteToggle {
    pub voted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_id: Option<Uuid>,
}
