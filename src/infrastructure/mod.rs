//! Infrastructure layer: store implementations and DI container
//!
//! This layer implements the persistence boundary trait and wires up services.

pub mod di;
pub mod error;
pub mod json_store;
pub mod traits;

pub use error::{InfraError, InfraResult};
pub use json_store::JsonFileStore;
pub use traits::{MemoryStore, Snapshot, Store, StoreError, StoreResult};
