//! Business logic services

pub mod auth;
pub mod authz;
pub mod boards;
pub mod bootstrap;
pub mod comments;
pub mod organizations;
pub mod posts;
pub mod statuses;
pub mod tags;
pub mod votes;

pub use auth::AuthService;
pub use authz::{can_mutate, Guard, Identity, MANAGE_BOARD, MANAGE_STATUS, MANAGE_TAG, MUTATE_OWN};
pub use boards::BoardService;
pub use comments::CommentService;
pub use organizations::OrganizationService;
pub use posts::PostService;
pub use statuses::StatusService;
pub use tags::TagService;
pub use votes::VoteService;
