//! Post repository
//!
//! Posts carry their tag associations and vote count on read. All reads
//! filter soft-deleted rows.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_db_timestamp, parse_db_uuid};
use crate::models::{CreatePostRequest, Post, UpdatePostRequest};

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: String,
    board_id: String,
    author_id: String,
    status_id: Option<String>,
    title: String,
    description: String,
    is_private: i64,
    is_pinned: i64,
    is_locked: i64,
    vote_count: i64,
    created_at: String,
    updated_at: String,
}

const POST_SELECT: &str = r#"
    SELECT p.id, p.board_id, p.author_id, p.status_id, p.title, p.description,
           p.is_private, p.is_pinned, p.is_locked,
           (SELECT COUNT(*) FROM votes v WHERE v.post_id = p.id) AS vote_count,
           p.created_at, p.updated_at
    FROM posts p
"#;

pub struct PostRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PostRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        board_id: Uuid,
        author_id: Uuid,
        status_id: Option<Uuid>,
        req: &CreatePostRequest,
    ) -> Result<Post> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO posts
                (id, board_id, author_id, status_id, title, description, is_private,
                 is_pinned, is_locked, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, 0, 0, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(board_id.to_string())
        .bind(author_id.to_string())
        .bind(status_id.map(|s| s.to_string()))
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.is_private as i64)
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await
        .context("Failed to create post")?;

        self.get_by_id(id)
            .await?
            .context("Failed to retrieve created post")
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Post>> {
        let query = format!("{POST_SELECT} WHERE p.id = ? AND p.deleted_at IS NULL");
        let row = sqlx::query_as::<_, PostRow>(&query)
            .bind(id.to_string())
            .fetch_optional(self.pool)
            .await
            .context("Failed to get post")?;

        match row {
            Some(row) => {
                let mut post = row_to_post(row);
                post.tag_ids = self.tag_ids_of(post.id).await?;
                Ok(Some(post))
            }
            None => Ok(None),
        }
    }

    pub async fn list_for_board(&self, board_id: Uuid) -> Result<Vec<Post>> {
        let query = format!(
            "{POST_SELECT} WHERE p.board_id = ? AND p.deleted_at IS NULL \
             ORDER BY p.is_pinned DESC, p.created_at"
        );
        let rows = sqlx::query_as::<_, PostRow>(&query)
            .bind(board_id.to_string())
            .fetch_all(self.pool)
            .await
            .context("Failed to list posts")?;

        let mut posts = Vec::with_capacity(rows.len());
        for row in rows {
            let mut post = row_to_post(row);
            post.tag_ids = self.tag_ids_of(post.id).await?;
            posts.push(post);
        }
        Ok(posts)
    }

    pub async fn update(&self, id: Uuid, req: &UpdatePostRequest) -> Result<Option<Post>> {
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
            UPDATE posts
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
        .context("Failed to update post")?;

        self.get_by_id(id).await
    }

    pub async fn set_locked(&self, id: Uuid, is_locked: bool) -> Result<bool> {
        self.set_flag(id, "is_locked", is_locked).await
    }

    pub async fn set_pinned(&self, id: Uuid, is_pinned: bool) -> Result<bool> {
        self.set_flag(id, "is_pinned", is_pinned).await
    }

    async fn set_flag(&self, id: Uuid, column: &str, value: bool) -> Result<bool> {
        // column is a compile-time constant from the two callers above
        let query = format!(
            "UPDATE posts SET {column} = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL"
        );
        let result = sqlx::query(&query)
            .bind(value as i64)
            .bind(Utc::now().to_rfc3339())
            .bind(id.to_string())
            .execute(self.pool)
            .await
            .with_context(|| format!("Failed to set post {column}"))?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn set_status(&self, id: Uuid, status_id: Option<Uuid>) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET status_id = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(status_id.map(|s| s.to_string()))
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(self.pool)
        .await
        .context("Failed to set post status")?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET deleted_at = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(Utc::now().to_rfc3339())
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(self.pool)
        .await
        .context("Failed to delete post")?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn tag_ids_of(&self, post_id: Uuid) -> Result<Vec<Uuid>> {
        let ids: Vec<String> =
            sqlx::query_scalar("SELECT tag_id FROM post_tags WHERE post_id = ? ORDER BY tag_id")
                .bind(post_id.to_string())
                .fetch_all(self.pool)
                .await
                .context("Failed to get post tags")?;

        Ok(ids.iter().map(|s| parse_db_uuid(s)).collect())
    }

    /// Replace the post's tag set atomically: the whole replacement happens
    /// inside one transaction, so a rejected tag leaves the set unchanged.
    pub async fn replace_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        sqlx::query("DELETE FROM post_tags WHERE post_id = ?")
            .bind(post_id.to_string())
            .execute(&mut *tx)
            .await
            .context("Failed to clear post tags")?;

        for tag_id in tag_ids {
            sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES (?, ?)")
                .bind(post_id.to_string())
                .bind(tag_id.to_string())
                .execute(&mut *tx)
                .await
                .context("Failed to attach tag")?;
        }

        tx.commit().await.context("Failed to commit tag replacement")?;
        Ok(())
    }
}

fn row_to_post(row: PostRow) -> Post {
    Post {
        id: parse_db_uuid(&row.id),
        board_id: parse_db_uuid(&row.board_id),
        author_id: parse_db_uuid(&row.author_id),
        status_id: row.status_id.as_deref().map(parse_db_uuid),
        title: row.title,
        description: row.description,
        is_private: row.is_private != 0,
        is_pinned: row.is_pinned != 0,
        is_locked: row.is_locked != 0,
        tag_ids: Vec::new(),
        vote_count: row.vote_count,
        created_at: parse_db_timestamp(&row.created_at),
        updated_at: parse_db_timestamp(&row.updated_at),
    }
}
