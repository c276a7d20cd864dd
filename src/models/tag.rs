//! Tag model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A label attachable to posts.
///
/// A null `organization_id` marks a system default usable by every
/// organization. System-default tags can never be deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub organization_id: Option<Uuid>,
    pub name: String,
    pub color: String,
    pub is_system_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTagRequest {
    #[validate(length(min = 1, max = 60))]
    pub name: String,
    #[validate(length(min = 1, max = 20))]
    pub color: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTagRequest {
    #[validate(length(min = 1, max = 60))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub color: Option<String>,
}
