//! Organization membership repository

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use std::str::FromStr;
use uuid::Uuid;

use super::{parse_db_timestamp, parse_db_uuid};
use crate::models::{Member, Role};

#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    id: String,
    organization_id: String,
    user_id: String,
    role: String,
    display_name: String,
    created_at: String,
    updated_at: String,
}

pub struct MemberRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MemberRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn add(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
        role: Role,
        display_name: &str,
    ) -> Result<Member> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO organization_members
                (id, organization_id, user_id, role, display_name, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(organization_id.to_string())
        .bind(user_id.to_string())
        .bind(role.as_str())
        .bind(display_name)
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await
        .context("Failed to add member")?;

        self.get(organization_id, user_id)
            .await?
            .context("Failed to retrieve created member")
    }

    pub async fn get(&self, organization_id: Uuid, user_id: Uuid) -> Result<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, organization_id, user_id, role, display_name, created_at, updated_at
            FROM organization_members
            WHERE organization_id = ? AND user_id = ?
            "#,
        )
        .bind(organization_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to get member")?;

        Ok(row.map(row_to_member))
    }

    pub async fn list_for_organization(&self, organization_id: Uuid) -> Result<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, organization_id, user_id, role, display_name, created_at, updated_at
            FROM organization_members
            WHERE organization_id = ?
            ORDER BY display_name
            "#,
        )
        .bind(organization_id.to_string())
        .fetch_all(self.pool)
        .await
        .context("Failed to list members")?;

        Ok(rows.into_iter().map(row_to_member).collect())
    }

    /// All memberships a user holds, across organizations. Resolved once at
    /// authentication time and carried in the token claims.
    pub async fn memberships_of(&self, user_id: Uuid) -> Result<Vec<(Uuid, Role)>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, organization_id, user_id, role, display_name, created_at, updated_at
            FROM organization_members
            WHERE user_id = ?
            "#,
        )
        .bind(user_id.to_string())
        .fetch_all(self.pool)
        .await
        .context("Failed to list memberships")?;

        Ok(rows
            .into_iter()
            .map(row_to_member)
            .map(|m| (m.organization_id, m.role))
            .collect())
    }

    pub async fn update_role(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
        role: Role,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE organization_members
            SET role = ?, updated_at = ?
            WHERE organization_id = ? AND user_id = ?
            "#,
        )
        .bind(role.as_str())
        .bind(Utc::now().to_rfc3339())
        .bind(organization_id.to_string())
        .bind(user_id.to_string())
        .execute(self.pool)
        .await
        .context("Failed to update member role")?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn remove(&self, organization_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM organization_members WHERE organization_id = ? AND user_id = ?",
        )
        .bind(organization_id.to_string())
        .bind(user_id.to_string())
        .execute(self.pool)
        .await
        .context("Failed to remove member")?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_owners(&self, organization_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM organization_members WHERE organization_id = ? AND role = 'owner'",
        )
        .bind(organization_id.to_string())
        .fetch_one(self.pool)
        .await
        .context("Failed to count owners")?;

        Ok(count)
    }
}

fn row_to_member(row: MemberRow) -> Member {
    Member {
        id: parse_db_uuid(&row.id),
        organization_id: parse_db_uuid(&row.organization_id),
        user_id: parse_db_uuid(&row.user_id),
        role: Role::from_str(&row.role).unwrap_or(Role::Member),
        display_name: row.display_name,
        created_at: parse_db_timestamp(&row.created_at),
        updated_at: parse_db_timestamp(&row.updated_at),
    }
}
