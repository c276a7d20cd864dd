//! Vote repository
//!
//! A vote is the existence of a (post_id, user_id) row; the table's unique
//! constraint is the race backstop for concurrent toggles.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_db_timestamp, parse_db_uuid};
use crate::models::Vote;

#[derive(Debug, sqlx::FromRow)]
struct VoteRow {
    id: String,
    post_id: String,
    user_id: String,
    created_at: String,
}

/// Outcome of an insert attempt
pub enum VoteInsert {
    Inserted(Vote),
    /// The unique pair already existed (lost a concurrent toggle race).
    AlreadyExists,
}

pub struct VoteRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> VoteRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<Vote>> {
        let row = sqlx::query_as::<_, VoteRow>(
            r#"
            SELECT id, post_id, user_id, created_at
            FROM votes
            WHERE post_id = ? AND user_id = ?
            "#,
        )
        .bind(post_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to find vote")?;

        Ok(row.map(row_to_vote))
    }

    /// Insert a vote for the pair. Reports a lost race instead of erroring
    /// when the unique constraint fires.
    pub async fn insert(&self, post_id: Uuid, user_id: Uuid) -> Result<VoteInsert> {
        let vote = Vote {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            created_at: Utc::now(),
        };

        let result = sqlx::query(
            r#"
            INSERT INTO votes (id, post_id, user_id, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (post_id, user_id) DO NOTHING
            "#,
        )
        .bind(vote.id.to_string())
        .bind(post_id.to_string())
        .bind(user_id.to_string())
        .bind(vote.created_at.to_rfc3339())
        .execute(self.pool)
        .await
        .context("Failed to insert vote")?;

        if result.rows_affected() > 0 {
            Ok(VoteInsert::Inserted(vote))
        } else {
            Ok(VoteInsert::AlreadyExists)
        }
    }

    pub async fn delete(&self, post_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM votes WHERE post_id = ? AND user_id = ?")
            .bind(post_id.to_string())
            .bind(user_id.to_string())
            .execute(self.pool)
            .await
            .context("Failed to delete vote")?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_for_post(&self, post_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM votes WHERE post_id = ?")
            .bind(post_id.to_string())
            .fetch_one(self.pool)
            .await
            .context("Failed to count votes")?;

        Ok(count)
    }
}

fn row_to_vote(row: VoteRow) -> Vote {
    Vote {
        id: parse_db_uuid(&row.id),
        post_id: parse_db_uuid(&row.post_id),
        user_id: parse_db_uuid(&row.user_id),
        created_at: parse_db_timestamp(&row.created_at),
    }
}
