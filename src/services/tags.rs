//! Tag operations
//!
//! Organization-scoped labels. Deleting a system-default tag is a domain
//! invariant violation regardless of who asks.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::{OrganizationRepository, OwnershipRepository, ResourceOwnership, TagRepository};
use crate::models::{CreateTagRequest, Tag, UpdateTagRequest};
use crate::services::authz::{can_mutate, Identity, MANAGE_TAG};
use crate::utils::validation::validate_color;
use crate::utils::{AppError, AppResult};

pub struct TagService {
    pool: SqlitePool,
}

impl TagService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        identity: &Identity,
        organization_id: Uuid,
        req: &CreateTagRequest,
    ) -> AppResult<Tag> {
        if !validate_color(&req.color) {
            return Err(AppError::bad_request("Invalid tag color"));
        }

        let org = OrganizationRepository::new(&self.pool)
            .get_by_id(organization_id)
            .await?
            .ok_or_else(|| AppError::not_found("Organization not found"))?;

        let org_ownership = ResourceOwnership {
            author_id: None,
            organization_id: org.id,
        };
        if !can_mutate(identity, Some(&org_ownership), MANAGE_TAG) {
            return Err(AppError::forbidden("Not allowed to manage tags"));
        }

        Ok(TagRepository::new(&self.pool)
            .create(Some(organization_id), req)
            .await?)
    }

    pub async fn list_for_organization(
        &self,
        identity: &Identity,
        organization_id: Uuid,
    ) -> AppResult<Vec<Tag>> {
        if identity.roles_of(organization_id).is_empty() {
            return Err(AppError::not_found("Organization not found"));
        }
        Ok(TagRepository::new(&self.pool)
            .list_for_organization(organization_id)
            .await?)
    }

    pub async fn update(
        &self,
        identity: &Identity,
        id: Uuid,
        req: &UpdateTagRequest,
    ) -> AppResult<Tag> {
        if let Some(ref color) = req.color {
            if !validate_color(color) {
                return Err(AppError::bad_request("Invalid tag color"));
            }
        }

        self.authorize(identity, id).await?;

        TagRepository::new(&self.pool)
            .update(id, req)
            .await?
            .ok_or_else(|| AppError::not_found("Tag not found"))
    }

    pub async fn delete(&self, identity: &Identity, id: Uuid) -> AppResult<()> {
        let tag = TagRepository::new(&self.pool)
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Tag not found"))?;

        // Domain invariant, checked before any role logic: system defaults
        // are undeletable by anyone.
        if tag.is_system_default {
            return Err(AppError::conflict("System default tags cannot be deleted"));
        }

        self.authorize(identity, id).await?;

        if !TagRepository::new(&self.pool).soft_delete(id).await? {
            return Err(AppError::not_found("Tag not found"));
        }
        Ok(())
    }

    async fn authorize(&self, identity: &Identity, id: Uuid) -> AppResult<()> {
        let ownership = OwnershipRepository::new(&self.pool).of_tag(id).await?;
        match ownership {
            None => Err(AppError::not_found("Tag not found")),
            Some(ref o) if !can_mutate(identity, Some(o), MANAGE_TAG) => {
                Err(AppError::forbidden("Not allowed to manage this tag"))
            }
            Some(_) => Ok(()),
        }
    }
}
