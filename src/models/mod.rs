//! Data models

mod board;
mod comment;
mod member;
mod organization;
mod post;
mod status;
mod tag;
mod user;
mod vote;

pub use board::*;
pub use comment::*;
pub use member::*;
pub use organization::*;
pub use post::*;
pub use status::*;
pub use tag::*;
pub use user::*;
pub use vote::*;
