//! Resource ownership resolver
//!
//! Projects any resource id to the two fields the authorization check needs:
//! the author and the owning organization. Every query on the path filters
//! soft-deleted rows, so a deleted resource (or a resource under a deleted
//! parent) resolves to `None`. `None` means "deny", never an error to
//! propagate.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::parse_db_uuid;

/// Minimal ownership projection of a resource.
///
/// Statuses and tags have no author; organization-less (system default)
/// statuses and tags do not resolve at all, since they are not mutable
/// through any organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceOwnership {
    pub author_id: Option<Uuid>,
    pub organization_id: Uuid,
}

#[derive(Debug, sqlx::FromRow)]
struct OwnershipRow {
    author_id: Option<String>,
    organization_id: String,
}

pub struct OwnershipRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OwnershipRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn of_board(&self, id: Uuid) -> Result<Option<ResourceOwnership>> {
        self.fetch(
            r#"
            SELECT author_id, organization_id
            FROM boards
            WHERE id = ? AND deleted_at IS NULL
            "#,
            id,
        )
        .await
        .context("Failed to resolve board ownership")
    }

    pub async fn of_post(&self, id: Uuid) -> Result<Option<ResourceOwnership>> {
        self.fetch(
            r#"
            SELECT p.author_id, b.organization_id
            FROM posts p
            INNER JOIN boards b ON b.id = p.board_id AND b.deleted_at IS NULL
            WHERE p.id = ? AND p.deleted_at IS NULL
            "#,
            id,
        )
        .await
        .context("Failed to resolve post ownership")
    }

    pub async fn of_comment(&self, id: Uuid) -> Result<Option<ResourceOwnership>> {
        self.fetch(
            r#"
            SELECT c.author_id, b.organization_id
            FROM comments c
            INNER JOIN posts p ON p.id = c.post_id AND p.deleted_at IS NULL
            INNER JOIN boards b ON b.id = p.board_id AND b.deleted_at IS NULL
            WHERE c.id = ? AND c.deleted_at IS NULL
            "#,
            id,
        )
        .await
        .context("Failed to resolve comment ownership")
    }

    pub async fn of_status(&self, id: Uuid) -> Result<Option<ResourceOwnership>> {
        self.fetch(
            r#"
            SELECT NULL AS author_id, organization_id
            FROM statuses
            WHERE id = ? AND organization_id IS NOT NULL AND deleted_at IS NULL
            "#,
            id,
        )
        .await
        .context("Failed to resolve status ownership")
    }

    pub async fn of_tag(&self, id: Uuid) -> Result<Option<ResourceOwnership>> {
        self.fetch(
            r#"
            SELECT NULL AS author_id, organization_id
            FROM tags
            WHERE id = ? AND organization_id IS NOT NULL AND deleted_at IS NULL
            "#,
            id,
        )
        .await
        .context("Failed to resolve tag ownership")
    }

    async fn fetch(&self, query: &str, id: Uuid) -> Result<Option<ResourceOwnership>> {
        let row = sqlx::query_as::<_, OwnershipRow>(query)
            .bind(id.to_string())
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(|r| ResourceOwnership {
            author_id: r.author_id.as_deref().map(parse_db_uuid),
            organization_id: parse_db_uuid(&r.organization_id),
        }))
    }
}
