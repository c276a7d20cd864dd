//! Organization operations
//!
//! Creation makes the caller the organization's OWNER and dispatches the
//! bootstrap task out of band; the creation response never waits for it.
//! Member management keeps the last-owner invariant.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::{MemberRepository, OrganizationRepository, ResourceOwnership};
use crate::models::{
    CreateOrganizationRequest, Member, Organization, Role, UpdateOrganizationRequest,
};
use crate::services::authz::{can_mutate, Identity, MANAGE_BOARD};
use crate::services::bootstrap;
use crate::utils::validation::validate_slug;
use crate::utils::{AppError, AppResult};

pub struct OrganizationService {
    pool: SqlitePool,
}

impl OrganizationService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an organization. The creator becomes its only OWNER; the
    /// default board, tags and statuses are provisioned asynchronously.
    pub async fn create(
        &self,
        identity: &Identity,
        display_name: &str,
        req: &CreateOrganizationRequest,
    ) -> AppResult<Organization> {
        if !validate_slug(&req.slug) {
            return Err(AppError::bad_request("Invalid organization slug"));
        }

        let org_repo = OrganizationRepository::new(&self.pool);
        if org_repo.get_by_slug(&req.slug).await?.is_some() {
            return Err(AppError::conflict("Organization slug already exists"));
        }

        let org = org_repo.create(req).await?;
        MemberRepository::new(&self.pool)
            .add(org.id, identity.id, Role::Owner, display_name)
            .await?;

        // Fire and forget; failures are logged inside the task.
        bootstrap::dispatch(self.pool.clone(), org.id, identity.id);

        Ok(org)
    }

    pub async fn get(&self, identity: &Identity, id: Uuid) -> AppResult<Organization> {
        if identity.roles_of(id).is_empty() {
            return Err(AppError::not_found("Organization not found"));
        }
        OrganizationRepository::new(&self.pool)
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Organization not found"))
    }

    pub async fn update(
        &self,
        identity: &Identity,
        id: Uuid,
        req: &UpdateOrganizationRequest,
    ) -> AppResult<Organization> {
        self.authorize_manage(identity, id).await?;

        if let Some(ref slug) = req.slug {
            if !validate_slug(slug) {
                return Err(AppError::bad_request("Invalid organization slug"));
            }
        }

        OrganizationRepository::new(&self.pool)
            .update(id, req)
            .await?
            .ok_or_else(|| AppError::not_found("Organization not found"))
    }

    pub async fn list_members(&self, identity: &Identity, id: Uuid) -> AppResult<Vec<Member>> {
        if identity.roles_of(id).is_empty() {
            return Err(AppError::not_found("Organization not found"));
        }
        Ok(MemberRepository::new(&self.pool)
            .list_for_organization(id)
            .await?)
    }

    pub async fn add_member(
        &self,
        identity: &Identity,
        organization_id: Uuid,
        user_id: Uuid,
        role: Role,
        display_name: &str,
    ) -> AppResult<Member> {
        self.authorize_manage(identity, organization_id).await?;

        let repo = MemberRepository::new(&self.pool);
        if repo.get(organization_id, user_id).await?.is_some() {
            return Err(AppError::conflict("User is already a member"));
        }

        Ok(repo.add(organization_id, user_id, role, display_name).await?)
    }

    pub async fn update_member_role(
        &self,
        identity: &Identity,
        organization_id: Uuid,
        user_id: Uuid,
        role: Role,
    ) -> AppResult<Member> {
        self.authorize_manage(identity, organization_id).await?;

        let repo = MemberRepository::new(&self.pool);
        let member = repo
            .get(organization_id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Member not found"))?;

        if member.role == Role::Owner
            && role != Role::Owner
            && repo.count_owners(organization_id).await? <= 1
        {
            return Err(AppError::conflict("Cannot demote the last owner"));
        }

        repo.update_role(organization_id, user_id, role).await?;
        repo.get(organization_id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Member not found"))
    }

    pub async fn remove_member(
        &self,
        identity: &Identity,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<()> {
        self.authorize_manage(identity, organization_id).await?;

        let repo = MemberRepository::new(&self.pool);
        let member = repo
            .get(organization_id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Member not found"))?;

        if member.role == Role::Owner && repo.count_owners(organization_id).await? <= 1 {
            return Err(AppError::conflict("Cannot remove the last owner"));
        }

        repo.remove(organization_id, user_id).await?;
        Ok(())
    }

    async fn authorize_manage(&self, identity: &Identity, organization_id: Uuid) -> AppResult<()> {
        let org = OrganizationRepository::new(&self.pool)
            .get_by_id(organization_id)
            .await?
            .ok_or_else(|| AppError::not_found("Organization not found"))?;

        let ownership = ResourceOwnership {
            author_id: None,
            organization_id: org.id,
        };
        if !can_mutate(identity, Some(&ownership), MANAGE_BOARD) {
            return Err(AppError::forbidden("Not allowed to manage this organization"));
        }
        Ok(())
    }
}
