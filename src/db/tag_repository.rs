//! Tag repository

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_db_timestamp, parse_db_uuid};
use crate::models::{CreateTagRequest, Tag, UpdateTagRequest};

#[derive(Debug, sqlx::FromRow)]
struct TagRow {
    id: String,
    organization_id: Option<String>,
    name: String,
    color: String,
    is_system_default: i64,
    created_at: String,
    updated_at: String,
}

pub struct TagRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TagRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, organization_id: Option<Uuid>, req: &CreateTagRequest) -> Result<Tag> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO tags
                (id, organization_id, name, color, is_system_default, created_at, updated_at)
            VALUES (?, ?, ?, ?, 0, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(organization_id.map(|o| o.to_string()))
        .bind(&req.name)
        .bind(&req.color)
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await
        .context("Failed to create tag")?;

        self.get_by_id(id)
            .await?
            .context("Failed to retrieve created tag")
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Tag>> {
        let row = sqlx::query_as::<_, TagRow>(
            r#"
            SELECT id, organization_id, name, color, is_system_default, created_at, updated_at
            FROM tags
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to get tag")?;

        Ok(row.map(row_to_tag))
    }

    /// Tags usable by an organization: its own plus system defaults.
    pub async fn list_for_organization(&self, organization_id: Uuid) -> Result<Vec<Tag>> {
        let rows = sqlx::query_as::<_, TagRow>(
            r#"
            SELECT id, organization_id, name, color, is_system_default, created_at, updated_at
            FROM tags
            WHERE (organization_id = ? OR organization_id IS NULL) AND deleted_at IS NULL
            ORDER BY name
            "#,
        )
        .bind(organization_id.to_string())
        .fetch_all(self.pool)
        .await
        .context("Failed to list tags")?;

        Ok(rows.into_iter().map(row_to_tag).collect())
    }

    pub async fn find_by_name(&self, organization_id: Uuid, name: &str) -> Result<Option<Tag>> {
        let row = sqlx::query_as::<_, TagRow>(
            r#"
            SELECT id, organization_id, name, color, is_system_default, created_at, updated_at
            FROM tags
            WHERE organization_id = ? AND name = ? AND deleted_at IS NULL
            "#,
        )
        .bind(organization_id.to_string())
        .bind(name)
        .fetch_optional(self.pool)
        .await
        .context("Failed to find tag by name")?;

        Ok(row.map(row_to_tag))
    }

    pub async fn update(&self, id: Uuid, req: &UpdateTagRequest) -> Result<Option<Tag>> {
        let existing = self.get_by_id(id).await?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let name = req.name.clone().unwrap_or(existing.name);
        let color = req.color.clone().unwrap_or(existing.color);
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            UPDATE tags
            SET name = ?, color = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(&name)
        .bind(&color)
        .bind(&now)
        .bind(id.to_string())
        .execute(self.pool)
        .await
        .context("Failed to update tag")?;

        self.get_by_id(id).await
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE tags
            SET deleted_at = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(Utc::now().to_rfc3339())
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(self.pool)
        .await
        .context("Failed to delete tag")?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_tag(row: TagRow) -> Tag {
    Tag {
        id: parse_db_uuid(&row.id),
        organization_id: row.organization_id.as_deref().map(parse_db_uuid),
        name: row.name,
        color: row.color,
        is_system_default: row.is_system_default != 0,
        created_at: parse_db_timestamp(&row.created_at),
        updated_at: parse_db_timestamp(&row.updated_at),
    }
}
