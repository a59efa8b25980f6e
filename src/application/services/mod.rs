//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on the `Store` boundary trait but are themselves
//! concrete structs, not traits.

mod comment;
mod post;
mod user;

pub use comment::{ClientValue, CommentRequest, CommentService};
pub use post::PostService;
pub use user::{UserService, DEFAULT_FALLBACK_USERNAME};
