//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod evaluator;
pub mod tree;

pub use entities::*;
pub use error::DomainError;
pub use evaluator::{evaluate, validate_operand};
pub use tree::{assemble, assemble_forest, CommentTree, ForestAssembly};
