//! Status repository
//!
//! System-default statuses have a null organization_id and are visible to
//! every organization.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_db_timestamp, parse_db_uuid};
use crate::models::{CreateStatusRequest, Status, UpdateStatusRequest};

#[derive(Debug, sqlx::FromRow)]
struct StatusRow {
    id: String,
    organization_id: Option<String>,
    name: String,
    color: String,
    sort_order: i64,
    created_at: String,
    updated_at: String,
}

pub struct StatusRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> StatusRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        organization_id: Option<Uuid>,
        req: &CreateStatusRequest,
    ) -> Result<Status> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO statuses (id, organization_id, name, color, sort_order, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(organization_id.map(|o| o.to_string()))
        .bind(&req.name)
        .bind(&req.color)
        .bind(req.sort_order)
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await
        .context("Failed to create status")?;

        self.get_by_id(id)
            .await?
            .context("Failed to retrieve created status")
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Status>> {
        let row = sqlx::query_as::<_, StatusRow>(
            r#"
            SELECT id, organization_id, name, color, sort_order, created_at, updated_at
            FROM statuses
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to get status")?;

        Ok(row.map(row_to_status))
    }

    /// Statuses usable by an organization: its own plus system defaults.
    pub async fn list_for_organization(&self, organization_id: Uuid) -> Result<Vec<Status>> {
        let rows = sqlx::query_as::<_, StatusRow>(
            r#"
            SELECT id, organization_id, name, color, sort_order, created_at, updated_at
            FROM statuses
            WHERE (organization_id = ? OR organization_id IS NULL) AND deleted_at IS NULL
            ORDER BY sort_order, name
            "#,
        )
        .bind(organization_id.to_string())
        .fetch_all(self.pool)
        .await
        .context("Failed to list statuses")?;

        Ok(rows.into_iter().map(row_to_status).collect())
    }

    pub async fn find_by_name(&self, organization_id: Uuid, name: &str) -> Result<Option<Status>> {
        let row = sqlx::query_as::<_, StatusRow>(
            r#"
            SELECT id, organization_id, name, color, sort_order, created_at, updated_at
            FROM statuses
            WHERE organization_id = ? AND name = ? AND deleted_at IS NULL
            "#,
        )
        .bind(organization_id.to_string())
        .bind(name)
        .fetch_optional(self.pool)
        .await
        .context("Failed to find status by name")?;

        Ok(row.map(row_to_status))
    }

    pub async fn update(&self, id: Uuid, req: &UpdateStatusRequest) -> Result<Option<Status>> {
        let existing = self.get_by_id(id).await?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let name = req.name.clone().unwrap_or(existing.name);
        let color = req.color.clone().unwrap_or(existing.color);
        let sort_order = req.sort_order.unwrap_or(existing.sort_order);
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            UPDATE statuses
            SET name = ?, color = ?, sort_order = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(&name)
        .bind(&color)
        .bind(sort_order)
        .bind(&now)
        .bind(id.to_string())
        .execute(self.pool)
        .await
        .context("Failed to update status")?;

        self.get_by_id(id).await
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE statuses
            SET deleted_at = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(Utc::now().to_rfc3339())
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(self.pool)
        .await
        .context("Failed to delete status")?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_status(row: StatusRow) -> Status {
    Status {
        id: parse_db_uuid(&row.id),
        organization_id: row.organization_id.as_deref().map(parse_db_uuid),
        name: row.name,
        color: row.color,
        sort_order: row.sort_order,
        created_at: parse_db_timestamp(&row.created_at),
        updated_at: parse_db_timestamp(&row.updated_at),
    }
}
