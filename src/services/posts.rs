//! Post operations
//!
//! Creation is gated on the board's lock at creation time only; a board
//! locked afterwards does not affect existing posts. Edits and deletes use
//! the author-bypass guard; pinning, locking, status and tag management are
//! organization management actions.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::{
    BoardRepository, OrganizationRepository, OwnershipRepository, PostRepository, StatusRepository,
    TagRepository,
};
use crate::models::{CreatePostRequest, Post, UpdatePostRequest};
use crate::services::authz::{can_mutate, Guard, Identity, MANAGE_BOARD, MUTATE_OWN};
use crate::utils::{AppError, AppResult};

pub struct PostService {
    pool: SqlitePool,
}

impl PostService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a post on a board. Requires membership in the owning
    /// organization and an unlocked, alive board.
    pub async fn create(
        &self,
        identity: &Identity,
        board_id: Uuid,
        req: &CreatePostRequest,
    ) -> AppResult<Post> {
        let board = BoardRepository::new(&self.pool)
            .get_by_id(board_id)
            .await?
            .ok_or_else(|| AppError::not_found("Board not found"))?;

        if identity.roles_of(board.organization_id).is_empty() {
            return Err(AppError::forbidden("Not a member of this organization"));
        }
        if board.is_locked {
            return Err(AppError::conflict("Board is locked"));
        }

        // New posts start on the organization's default status when set.
        let default_status = OrganizationRepository::new(&self.pool)
            .get_by_id(board.organization_id)
            .await?
            .and_then(|org| org.default_status_id);

        let post = PostRepository::new(&self.pool)
            .create(board_id, identity.id, default_status, req)
            .await?;
        Ok(post)
    }

    /// Fetch a post. Visible to members of the owning organization only; a
    /// non-member gets the same 404 as a missing id.
    pub async fn get(&self, identity: &Identity, id: Uuid) -> AppResult<Post> {
        let post = PostRepository::new(&self.pool)
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))?;

        let ownership = OwnershipRepository::new(&self.pool)
            .of_post(id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))?;
        if identity.roles_of(ownership.organization_id).is_empty() {
            return Err(AppError::not_found("Post not found"));
        }

        Ok(post)
    }

    pub async fn list_for_board(&self, identity: &Identity, board_id: Uuid) -> AppResult<Vec<Post>> {
        // A deleted board hides its posts.
        let board = BoardRepository::new(&self.pool)
            .get_by_id(board_id)
            .await?
            .ok_or_else(|| AppError::not_found("Board not found"))?;
        if identity.roles_of(board.organization_id).is_empty() {
            return Err(AppError::not_found("Board not found"));
        }

        Ok(PostRepository::new(&self.pool).list_for_board(board_id).await?)
    }

    pub async fn update(
        &self,
        identity: &Identity,
        id: Uuid,
        req: &UpdatePostRequest,
    ) -> AppResult<Post> {
        self.authorize(identity, id, MUTATE_OWN).await?;

        PostRepository::new(&self.pool)
            .update(id, req)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))
    }

    pub async fn delete(&self, identity: &Identity, id: Uuid) -> AppResult<()> {
        self.authorize(identity, id, MUTATE_OWN).await?;

        if !PostRepository::new(&self.pool).soft_delete(id).await? {
            return Err(AppError::not_found("Post not found"));
        }
        Ok(())
    }

    /// Flip the post's own lock, independent of the board's.
    pub async fn set_locked(&self, identity: &Identity, id: Uuid, is_locked: bool) -> AppResult<Post> {
        self.authorize(identity, id, MANAGE_BOARD).await?;

        let repo = PostRepository::new(&self.pool);
        repo.set_locked(id, is_locked).await?;
        repo.get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))
    }

    pub async fn set_pinned(&self, identity: &Identity, id: Uuid, is_pinned: bool) -> AppResult<Post> {
        self.authorize(identity, id, MANAGE_BOARD).await?;

        let repo = PostRepository::new(&self.pool);
        repo.set_pinned(id, is_pinned).await?;
        repo.get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))
    }

    /// Assign or clear the post's status. The status must belong to the
    /// post's organization or be a system default.
    pub async fn set_status(
        &self,
        identity: &Identity,
        id: Uuid,
        status_id: Option<Uuid>,
    ) -> AppResult<Post> {
        let ownership = self.authorize(identity, id, MANAGE_BOARD).await?;

        if let Some(status_id) = status_id {
            let status = StatusRepository::new(&self.pool)
                .get_by_id(status_id)
                .await?
                .ok_or_else(|| AppError::not_found("Status not found"))?;
            if let Some(org) = status.organization_id {
                if org != ownership.organization_id {
                    return Err(AppError::conflict(
                        "Status belongs to a different organization",
                    ));
                }
            }
        }

        let repo = PostRepository::new(&self.pool);
        repo.set_status(id, status_id).await?;
        repo.get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))
    }

    /// Replace the post's tag set. Fails atomically: if any tag is missing
    /// or belongs to a foreign organization, nothing is attached.
    pub async fn set_tags(&self, identity: &Identity, id: Uuid, tag_ids: &[Uuid]) -> AppResult<Post> {
        let ownership = self.authorize(identity, id, MUTATE_OWN).await?;

        let tag_repo = TagRepository::new(&self.pool);
        for tag_id in tag_ids {
            let tag = tag_repo
                .get_by_id(*tag_id)
                .await?
                .ok_or_else(|| AppError::not_found("Tag not found"))?;
            if let Some(org) = tag.organization_id {
                if org != ownership.organization_id {
                    return Err(AppError::conflict(
                        "Tag belongs to a different organization",
                    ));
                }
            }
        }

        let repo = PostRepository::new(&self.pool);
        repo.replace_tags(id, tag_ids).await?;
        repo.get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))
    }

    async fn authorize(
        &self,
        identity: &Identity,
        id: Uuid,
        guard: Guard,
    ) -> AppResult<crate::db::ResourceOwnership> {
        let ownership = OwnershipRepository::new(&self.pool).of_post(id).await?;
        match ownership {
            None => Err(AppError::not_found("Post not found")),
            Some(o) => {
                if !can_mutate(identity, Some(&o), guard) {
                    return Err(AppError::forbidden("Not allowed to mutate this post"));
                }
                Ok(o)
            }
        }
    }
}
