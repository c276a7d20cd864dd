//! Board operations
//!
//! Creation and management of boards, including the lock flag that gates
//! post creation. Authorization goes through the shared evaluator; the
//! policy is 404 for an id that does not resolve, 403 for a resolved
//! resource the identity may not mutate.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::{BoardRepository, OrganizationRepository, OwnershipRepository, ResourceOwnership};
use crate::models::{Board, CreateBoardRequest, UpdateBoardRequest};
use crate::services::authz::{can_mutate, Identity, MANAGE_BOARD};
use crate::utils::{AppError, AppResult};

pub struct BoardService {
    pool: SqlitePool,
}

impl BoardService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a board in an organization. An org-level management action:
    /// requires an elevated role in that organization.
    pub async fn create(
        &self,
        identity: &Identity,
        organization_id: Uuid,
        req: &CreateBoardRequest,
    ) -> AppResult<Board> {
        let org = OrganizationRepository::new(&self.pool)
            .get_by_id(organization_id)
            .await?
            .ok_or_else(|| AppError::not_found("Organization not found"))?;

        let org_ownership = ResourceOwnership {
            author_id: None,
            organization_id: org.id,
        };
        if !can_mutate(identity, Some(&org_ownership), MANAGE_BOARD) {
            return Err(AppError::forbidden("Not allowed to create boards"));
        }

        let board = BoardRepository::new(&self.pool)
            .create(organization_id, identity.id, req)
            .await?;
        Ok(board)
    }

    /// Fetch a board. Boards are visible to organization members only; a
    /// non-member gets the same 404 as a missing id.
    pub async fn get(&self, identity: &Identity, id: Uuid) -> AppResult<Board> {
        let board = BoardRepository::new(&self.pool)
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Board not found"))?;
        if identity.roles_of(board.organization_id).is_empty() {
            return Err(AppError::not_found("Board not found"));
        }
        Ok(board)
    }

    pub async fn list_for_organization(
        &self,
        identity: &Identity,
        organization_id: Uuid,
    ) -> AppResult<Vec<Board>> {
        if identity.roles_of(organization_id).is_empty() {
            return Err(AppError::not_found("Organization not found"));
        }
        Ok(BoardRepository::new(&self.pool)
            .list_for_organization(organization_id)
            .await?)
    }

    pub async fn update(
        &self,
        identity: &Identity,
        id: Uuid,
        req: &UpdateBoardRequest,
    ) -> AppResult<Board> {
        self.authorize(identity, id).await?;

        BoardRepository::new(&self.pool)
            .update(id, req)
            .await?
            .ok_or_else(|| AppError::not_found("Board not found"))
    }

    /// Flip the board's lock. Does not cascade to existing posts.
    pub async fn set_locked(&self, identity: &Identity, id: Uuid, is_locked: bool) -> AppResult<Board> {
        self.authorize(identity, id).await?;

        let repo = BoardRepository::new(&self.pool);
        if !repo.set_locked(id, is_locked).await? {
            return Err(AppError::not_found("Board not found"));
        }
        repo.get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Board not found"))
    }

    pub async fn delete(&self, identity: &Identity, id: Uuid) -> AppResult<()> {
        self.authorize(identity, id).await?;

        if !BoardRepository::new(&self.pool).soft_delete(id).await? {
            return Err(AppError::not_found("Board not found"));
        }
        Ok(())
    }

    async fn authorize(&self, identity: &Identity, id: Uuid) -> AppResult<()> {
        let ownership = OwnershipRepository::new(&self.pool).of_board(id).await?;
        match ownership {
            None => Err(AppError::not_found("Board not found")),
            Some(ref o) if !can_mutate(identity, Some(o), MANAGE_BOARD) => {
                Err(AppError::forbidden("Not allowed to manage this board"))
            }
            Some(_) => Ok(()),
        }
    }
}
