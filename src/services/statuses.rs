//! Status operations
//!
//! Custom statuses are organization management resources. System defaults
//! (null organization) are visible everywhere and never mutable.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::{
    OrganizationRepository, OwnershipRepository, ResourceOwnership, StatusRepository,
};
use crate::models::{CreateStatusRequest, Status, UpdateStatusRequest};
use crate::services::authz::{can_mutate, Identity, MANAGE_STATUS};
use crate::utils::validation::validate_color;
use crate::utils::{AppError, AppResult};

pub struct StatusService {
    pool: SqlitePool,
}

impl StatusService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        identity: &Identity,
        organization_id: Uuid,
        req: &CreateStatusRequest,
    ) -> AppResult<Status> {
        if !validate_color(&req.color) {
            return Err(AppError::bad_request("Invalid status color"));
        }

        let org = OrganizationRepository::new(&self.pool)
            .get_by_id(organization_id)
            .await?
            .ok_or_else(|| AppError::not_found("Organization not found"))?;

        let org_ownership = ResourceOwnership {
            author_id: None,
            organization_id: org.id,
        };
        if !can_mutate(identity, Some(&org_ownership), MANAGE_STATUS) {
            return Err(AppError::forbidden("Not allowed to manage statuses"));
        }

        Ok(StatusRepository::new(&self.pool)
            .create(Some(organization_id), req)
            .await?)
    }

    pub async fn list_for_organization(
        &self,
        identity: &Identity,
        organization_id: Uuid,
    ) -> AppResult<Vec<Status>> {
        if identity.roles_of(organization_id).is_empty() {
            return Err(AppError::not_found("Organization not found"));
        }
        Ok(StatusRepository::new(&self.pool)
            .list_for_organization(organization_id)
            .await?)
    }

    pub async fn update(
        &self,
        identity: &Identity,
        id: Uuid,
        req: &UpdateStatusRequest,
    ) -> AppResult<Status> {
        if let Some(ref color) = req.color {
            if !validate_color(color) {
                return Err(AppError::bad_request("Invalid status color"));
            }
        }

        self.authorize(identity, id).await?;

        StatusRepository::new(&self.pool)
            .update(id, req)
            .await?
            .ok_or_else(|| AppError::not_found("Status not found"))
    }

    pub async fn delete(&self, identity: &Identity, id: Uuid) -> AppResult<()> {
        self.authorize(identity, id).await?;

        if !StatusRepository::new(&self.pool).soft_delete(id).await? {
            return Err(AppError::not_found("Status not found"));
        }
        Ok(())
    }

    async fn authorize(&self, identity: &Identity, id: Uuid) -> AppResult<()> {
        // System-default statuses do not resolve to an organization and are
        // therefore never mutable here.
        let ownership = OwnershipRepository::new(&self.pool).of_status(id).await?;
        match ownership {
            None => Err(AppError::not_found("Status not found")),
            Some(ref o) if !can_mutate(identity, Some(o), MANAGE_STATUS) => {
                Err(AppError::forbidden("Not allowed to manage this status"))
            }
            Some(_) => Ok(()),
        }
    }
}
