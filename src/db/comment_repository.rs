//! Comment repository

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_db_timestamp, parse_db_uuid};
use crate::models::Comment;

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: String,
    post_id: String,
    author_id: String,
    content: String,
    created_at: String,
    updated_at: String,
}

pub struct CommentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CommentRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, post_id: Uuid, author_id: Uuid, content: &str) -> Result<Comment> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, author_id, content, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(post_id.to_string())
        .bind(author_id.to_string())
        .bind(content)
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await
        .context("Failed to create comment")?;

        self.get_by_id(id)
            .await?
            .context("Failed to retrieve created comment")
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Comment>> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, author_id, content, created_at, updated_at
            FROM comments
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to get comment")?;

        Ok(row.map(row_to_comment))
    }

    pub async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, author_id, content, created_at, updated_at
            FROM comments
            WHERE post_id = ? AND deleted_at IS NULL
            ORDER BY created_at
            "#,
        )
        .bind(post_id.to_string())
        .fetch_all(self.pool)
        .await
        .context("Failed to list comments")?;

        Ok(rows.into_iter().map(row_to_comment).collect())
    }

    pub async fn update_content(&self, id: Uuid, content: &str) -> Result<Option<Comment>> {
        sqlx::query(
            r#"
            UPDATE comments
            SET content = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(content)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(self.pool)
        .await
        .context("Failed to update comment")?;

        self.get_by_id(id).await
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE comments
            SET deleted_at = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(Utc::now().to_rfc3339())
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(self.pool)
        .await
        .context("Failed to delete comment")?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_comment(row: CommentRow) -> Comment {
    Comment {
        id: parse_db_uuid(&row.id),
        post_id: parse_db_uuid(&row.post_id),
        author_id: parse_db_uuid(&row.author_id),
        content: row.content,
        created_at: parse_db_timestamp(&row.created_at),
        updated_at: parse_db_timestamp(&row.updated_at),
    }
}
