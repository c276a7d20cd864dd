//! Authorization evaluator
//!
//! A single pure decision function covers every mutation guard in the
//! system. Each call site picks a `Guard` from the table below instead of
//! hand-rolling its own role check.

use std::collections::HashSet;
use uuid::Uuid;

use crate::db::ResourceOwnership;
use crate::models::Role;

/// The acting identity: user id plus the per-organization roles resolved at
/// authentication time. Immutable for the rest of the request.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    pub memberships: Vec<(Uuid, Role)>,
}

impl Identity {
    pub fn new(id: Uuid, memberships: Vec<(Uuid, Role)>) -> Self {
        Self { id, memberships }
    }

    /// Roles the identity holds in one organization; empty when not a member.
    pub fn roles_of(&self, organization_id: Uuid) -> HashSet<Role> {
        self.memberships
            .iter()
            .filter(|(org, _)| *org == organization_id)
            .map(|(_, role)| *role)
            .collect()
    }
}

/// Parameterization of one mutation guard.
#[derive(Debug, Clone, Copy)]
pub struct Guard {
    pub required_roles: &'static [Role],
    /// When true, the resource's author may mutate it regardless of role.
    pub allow_self_author: bool,
}

/// Lock/rename/privacy on a board, pinning and status on a post.
pub const MANAGE_BOARD: Guard = Guard {
    required_roles: &[Role::Owner, Role::Admin],
    allow_self_author: false,
};

/// Mutating or deleting a post or comment: elevated role, or its author.
pub const MUTATE_OWN: Guard = Guard {
    required_roles: &[Role::Owner, Role::Admin],
    allow_self_author: true,
};

/// Creating, updating or deleting an organization status.
pub const MANAGE_STATUS: Guard = Guard {
    required_roles: &[Role::Owner, Role::Admin],
    allow_self_author: false,
};

/// Creating, updating or deleting an organization tag.
pub const MANAGE_TAG: Guard = Guard {
    required_roles: &[Role::Owner, Role::Admin],
    allow_self_author: false,
};

/// Decide whether `identity` may perform a mutation on the resource with the
/// given ownership, under `guard`.
///
/// Unresolved ownership always denies. The author bypass dominates role
/// membership: an author passes even with no membership in the organization.
pub fn can_mutate(identity: &Identity, ownership: Option<&ResourceOwnership>, guard: Guard) -> bool {
    let Some(ownership) = ownership else {
        return false;
    };

    if guard.allow_self_author && ownership.author_id == Some(identity.id) {
        return true;
    }

    let roles = identity.roles_of(ownership.organization_id);
    guard.required_roles.iter().any(|r| roles.contains(r))
}
