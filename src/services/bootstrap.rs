//! Organization bootstrap
//!
//! Provisions a new organization's default board, tags and statuses after
//! the creating request has already returned. Runs as a detached task; any
//! failure is logged and never reaches the original caller. Every step is
//! idempotent by organization id (it checks before creating), so the whole
//! run can be retried; one retry after a short delay is attempted, then the
//! organization is left without a default status until remediation.

use sqlx::SqlitePool;
use std::time::Duration;
use tracing::{error, info};
use uuid::Uuid;

use crate::db::{BoardRepository, OrganizationRepository, StatusRepository, TagRepository};
use crate::models::{CreateBoardRequest, CreateStatusRequest, CreateTagRequest};

const DEFAULT_BOARD_TITLE: &str = "Feature suggestions";
const RETRY_DELAY: Duration = Duration::from_secs(5);

const DEFAULT_TAGS: &[(&str, &str)] = &[("low priority", "#90be6d"), ("high priority", "#f94144")];

/// (name, color, sort_order); "open" becomes the organization default.
const DEFAULT_STATUSES: &[(&str, &str)] = &[
    ("open", "#577590"),
    ("review", "#f9c74f"),
    ("planned", "#43aa8b"),
    ("in progress", "#f8961e"),
    ("done", "#90be6d"),
    ("cancelled", "#f94144"),
];

const DEFAULT_STATUS_NAME: &str = "open";

/// Dispatch the bootstrap run for a freshly created organization.
/// Fire-and-forget: the caller never observes the outcome.
pub fn dispatch(pool: SqlitePool, organization_id: Uuid, creator_id: Uuid) {
    tokio::spawn(async move {
        if let Err(e) = run(&pool, organization_id, creator_id).await {
            error!(
                organization_id = %organization_id,
                error = %e,
                "Organization bootstrap failed, retrying once"
            );
            tokio::time::sleep(RETRY_DELAY).await;
            if let Err(e) = run(&pool, organization_id, creator_id).await {
                error!(
                    organization_id = %organization_id,
                    error = %e,
                    "Organization bootstrap failed after retry, giving up"
                );
            }
        }
    });
}

/// One full bootstrap pass. Safe to call repeatedly for the same
/// organization.
pub async fn run(pool: &SqlitePool, organization_id: Uuid, creator_id: Uuid) -> anyhow::Result<()> {
    seed_default_board(pool, organization_id, creator_id).await?;
    seed_default_tags(pool, organization_id).await?;
    let default_status_id = seed_default_statuses(pool, organization_id).await?;

    let org_repo = OrganizationRepository::new(pool);
    let org = org_repo
        .get_by_id(organization_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Organization disappeared during bootstrap"))?;
    if org.default_status_id.is_none() {
        org_repo
            .set_default_status(organization_id, default_status_id)
            .await?;
    }

    info!(organization_id = %organization_id, "Organization bootstrap complete");
    Ok(())
}

async fn seed_default_board(
    pool: &SqlitePool,
    organization_id: Uuid,
    creator_id: Uuid,
) -> anyhow::Result<()> {
    let repo = BoardRepository::new(pool);
    if repo
        .find_by_title(organization_id, DEFAULT_BOARD_TITLE)
        .await?
        .is_some()
    {
        return Ok(());
    }

    repo.create(
        organization_id,
        creator_id,
        &CreateBoardRequest {
            title: DEFAULT_BOARD_TITLE.to_string(),
            description: "Suggest and discuss new features".to_string(),
            is_private: false,
        },
    )
    .await?;
    Ok(())
}

async fn seed_default_tags(pool: &SqlitePool, organization_id: Uuid) -> anyhow::Result<()> {
    let repo = TagRepository::new(pool);
    for (name, color) in DEFAULT_TAGS {
        if repo.find_by_name(organization_id, name).await?.is_none() {
            repo.create(
                Some(organization_id),
                &CreateTagRequest {
                    name: name.to_string(),
                    color: color.to_string(),
                },
            )
            .await?;
        }
    }
    Ok(())
}

async fn seed_default_statuses(pool: &SqlitePool, organization_id: Uuid) -> anyhow::Result<Uuid> {
    let repo = StatusRepository::new(pool);
    let mut default_id = None;

    for (order, (name, color)) in DEFAULT_STATUSES.iter().enumerate() {
        let status = match repo.find_by_name(organization_id, name).await? {
            Some(existing) => existing,
            None => {
                repo.create(
                    Some(organization_id),
                    &CreateStatusRequest {
                        name: name.to_string(),
                        color: color.to_string(),
                        sort_order: order as i64,
                    },
                )
                .await?
            }
        };
        if *name == DEFAULT_STATUS_NAME {
            default_id = Some(status.id);
        }
    }

    default_id.ok_or_else(|| anyhow::anyhow!("Default status missing from seed set"))
}
