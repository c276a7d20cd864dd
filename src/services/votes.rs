//! Vote toggle engine
//!
//! Each call flips the presence of the (user, post) vote; callers cannot
//! request a target state. The storage-level unique constraint is the sole
//! race-correctness mechanism; on a lost insert race the read-then-act
//! sequence is retried exactly once.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::{vote_repository::VoteInsert, OwnershipRepository, PostRepository, VoteRepository};
use crate::models::VoteToggle;
use crate::services::authz::Identity;
use crate::utils::{AppError, AppResult};

pub struct VoteService {
    pool: SqlitePool,
}

impl VoteService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn toggle(&self, identity: &Identity, post_id: Uuid) -> AppResult<VoteToggle> {
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

        let repo = VoteRepository::new(&self.pool);

        if repo.delete(post_id, identity.id).await? {
            return Ok(VoteToggle {
                voted: false,
                vote_id: None,
            });
        }

        match repo.insert(post_id, identity.id).await? {
            VoteInsert::Inserted(vote) => Ok(VoteToggle {
                voted: true,
                vote_id: Some(vote.id),
            }),
            VoteInsert::AlreadyExists => {
                // Lost a concurrent toggle race; retry the sequence once.
                if repo.delete(post_id, identity.id).await? {
                    return Ok(VoteToggle {
                        voted: false,
                        vote_id: None,
                    });
                }
                match repo.insert(post_id, identity.id).await? {
                    VoteInsert::Inserted(vote) => Ok(VoteToggle {
                        voted: true,
                        vote_id: Some(vote.id),
                    }),
                    VoteInsert::AlreadyExists => {
                        Err(AppError::conflict("Vote toggled concurrently"))
                    }
                }
            }
        }
    }
}
