//! Comment operations
//!
//! The post's lock is checked at creation time only; comments have no lock
//! of their own.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::{CommentRepository, OwnershipRepository, PostRepository};
use crate::models::Comment;
use crate::services::authz::{can_mutate, Identity, MUTATE_OWN};
use crate::utils::{AppError, AppResult};

pub struct CommentService {
    pool: SqlitePool,
}

impl CommentService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        identity: &Identity,
        post_id: Uuid,
        content: &str,
    ) -> AppResult<Comment> {
        let post = PostRepository::new(&self.pool)
            .get_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))?;

        let ownership = OwnershipRepository::new(&self.pool)
            .of_post(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))?;
        if identity.roles_of(ownership.organization_id).is_empty() {
            return Err(AppError::forbidden("Not a member of this organization"));
        }

        if post.is_locked {
            return Err(AppError::conflict("Post is locked"));
        }

        let comment = CommentRepository::new(&self.pool)
            .create(post_id, identity.id, content)
            .await?;
        Ok(comment)
    }

    /// List a post's comments. Visible to members of the owning organization
    /// only; a non-member gets the same 404 as a missing id.
    pub async fn list_for_post(&self, identity: &Identity, post_id: Uuid) -> AppResult<Vec<Comment>> {
        let ownership = OwnershipRepository::new(&self.pool)
            .of_post(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))?;
        if identity.roles_of(ownership.organization_id).is_empty() {
            return Err(AppError::not_found("Post not found"));
        }

        Ok(CommentRepository::new(&self.pool).list_for_post(post_id).await?)
    }

    pub async fn update(&self, identity: &Identity, id: Uuid, content: &str) -> AppResult<Comment> {
        self.authorize(identity, id).await?;

        CommentRepository::new(&self.pool)
            .update_content(id, content)
            .await?
            .ok_or_else(|| AppError::not_found("Comment not found"))
    }

    pub async fn delete(&self, identity: &Identity, id: Uuid) -> AppResult<()> {
        self.authorize(identity, id).await?;

        if !CommentRepository::new(&self.pool).soft_delete(id).await? {
            return Err(AppError::not_found("Comment not found"));
        }
        Ok(())
    }

    async fn authorize(&self, identity: &Identity, id: Uuid) -> AppResult<()> {
        let ownership = OwnershipRepository::new(&self.pool).of_comment(id).await?;
        match ownership {
            None => Err(AppError::not_found("Comment not found")),
            Some(ref o) if !can_mutate(identity, Some(o), MUTATE_OWN) => {
                Err(AppError::forbidden("Not allowed to mutate this comment"))
            }
            Some(_) => Ok(()),
        }
    }
}
