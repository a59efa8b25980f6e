//! Service container for dependency injection
//!
//! Wires all services to one explicitly passed store handle.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::{CommentService, PostService, UserService};
use crate::config::Settings;
use crate::infrastructure::error::InfraResult;
use crate::infrastructure::json_store::JsonFileStore;
use crate::infrastructure::traits::Store;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Persistence and identity collaborator
    pub store: Arc<dyn Store>,

    pub users: UserService,
    pub posts: PostService,
    pub comments: CommentService,
}

impl ServiceContainer {
    /// Create a container backed by the JSON store at `settings.store_path`.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        debug!("opening store at {}", settings.store_path.display());
        let store = Arc::new(JsonFileStore::open(&settings.store_path)?);
        Ok(Self::with_store(settings, store))
    }

    /// Create a container with a custom store (for testing).
    pub fn with_store(settings: Settings, store: Arc<dyn Store>) -> Self {
        let users = UserService::new(store.clone(), settings.fallback_username.clone());
        let posts = PostService::new(store.clone(), users.clone());
        let comments = CommentService::new(store.clone(), users.clone());

        Self {
            settings: Arc::new(settings),
            store,
            users,
            posts,
            comments,
        }
    }
}
