//! Board repository
//!
//! All reads filter soft-deleted rows; a deleted board is invisible.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_db_timestamp, parse_db_uuid};
use crate::models::{Board, CreateBoardRequest, UpdateBoardRequest};

#[derive(Debug, sqlx::FromRow)]
struct BoardRow {
    id: String,
    organization_id: String,
    author_id: String,
    title: String,
    description: String,
    is_private: i64,
    is_locked: i64,
    created_at: String,
    updated_at: String,
}

pub struct BoardRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BoardRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        organization_id: Uuid,
        author_id: Uuid,
        req: &CreateBoardRequest,
    ) -> Result<Board> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO boards
                (id, organization_id, author_id, title, description, is_private, is_locked,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(organization_id.to_string())
        .bind(author_id.to_string())
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.is_private as i64)
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await
        .context("Failed to create board")?;

        self.get_by_id(id)
            .await?
            .context("Failed to retrieve created board")
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Board>> {
        let row = sqlx::query_as::<_, BoardRow>(
            r#"
            SELECT id, organization_id, author_id, title, description, is_private, is_locked,
                   created_at, updated_at
            FROM boards
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to get board")?;

        Ok(row.map(row_to_board))
    }

    pub async fn list_for_organization(&self, organization_id: Uuid) -> Result<Vec<Board>> {
        let rows = sqlx::query_as::<_, BoardRow>(
            r#"
            SELECT id, organization_id, author_id, title, description, is_private, is_locked,
                   created_at, updated_at
            FROM boards
            WHERE organization_id = ? AND deleted_at IS NULL
            ORDER BY created_at
            "#,
        )
        .bind(organization_id.to_string())
        .fetch_all(self.pool)
        .await
        .context("Failed to list boards")?;

        Ok(rows.into_iter().map(row_to_board).collect())
    }

    pub async fn find_by_title(&self, organization_id: Uuid, title: &str) -> Result<Option<Board>> {
        let row = sqlx::query_as::<_, BoardRow>(
            r#"
            SELECT id, organization_id, author_id, title, description, is_private, is_locked,
                   created_at, updated_at
            FROM boards
            WHERE organization_id = ? AND title = ? AND deleted_at IS NULL
            "#,
        )
        .bind(organization_id.to_string())
        .bind(title)
        .fetch_optional(self.pool)
        .await
        .context("Failed to find board by title")?;

        Ok(row.map(row_to_board))
    }

    pub async fn update(&self, id: Uuid, req: &UpdateBoardRequest) -> Result<Option<Board>> {
        let existing = self.get_by_id(id).await?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let title = req.title.clone().unwrap_or(existing.title);
        let description = req.description.clone().unwrap_or(existing.description);
        let is_private = req.is_private.unwrap_or(existing.is_private);
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            UPDATE boards
            SET title = ?, description = ?, is_private = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(&title)
        .bind(&description)
        .bind(is_private as i64)
        .bind(&now)
        .bind(id.to_string())
        .execute(self.pool)
        .await
        .context("Failed to update board")?;

        self.get_by_id(id).await
    }

    pub async fn set_locked(&self, id: Uuid, is_locked: bool) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE boards
            SET is_locked = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(is_locked as i64)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(self.pool)
        .await
        .context("Failed to set board lock")?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE boards
            SET deleted_at = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(Utc::now().to_rfc3339())
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(self.pool)
        .await
        .context("Failed to delete board")?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_board(row: BoardRow) -> Board {
    Board {
        id: parse_db_uuid(&row.id),
        organization_id: parse_db_uuid(&row.organization_id),
        author_id: parse_db_uuid(&row.author_id),
        title: row.title,
        description: row.description,
        is_private: row.is_private != 0,
        is_locked: row.is_locked != 0,
        created_at: parse_db_timestamp(&row.created_at),
        updated_at: parse_db_timestamp(&row.updated_at),
    }
}
