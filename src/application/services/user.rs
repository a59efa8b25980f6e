//! User registration and display-name lookup

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{DomainError, User, UserId};
use crate::infrastructure::traits::{Store, StoreError};

/// Name shown for owners the store cannot resolve.
pub const DEFAULT_FALLBACK_USERNAME: &str = "Unknown";

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]{3,}$").unwrap());

/// Front for the identity side of the store.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Store>,
    fallback: String,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>, fallback: impl Into<String>) -> Self {
        Self {
            store,
            fallback: fallback.into(),
        }
    }

    /// Register a new username.
    #[instrument(level = "debug", skip(self))]
    pub fn register(&self, username: &str) -> ApplicationResult<User> {
        if !USERNAME_RE.is_match(username) {
            return Err(DomainError::InvalidUsername(username.to_string()).into());
        }
        if self.store.find_user(username)?.is_some() {
            return Err(ApplicationError::UsernameTaken(username.to_string()));
        }
        let user = self.store.insert_user(username).map_err(|e| match e {
            StoreError::Conflict(name) => ApplicationError::UsernameTaken(name),
            other => other.into(),
        })?;
        debug!("registered user {} as {}", user.username, user.id);
        Ok(user)
    }

    pub fn find(&self, username: &str) -> ApplicationResult<User> {
        self.store
            .find_user(username)?
            .ok_or_else(|| ApplicationError::UnknownUser(username.to_string()))
    }

    /// Display name of `id`, or the fallback name when the store has none.
    pub fn display_name(&self, id: UserId) -> ApplicationResult<String> {
        Ok(self
            .store
            .resolve_display_name(id)?
            .unwrap_or_else(|| self.fallback.clone()))
    }

    /// Resolve every distinct id once.
    pub fn display_names(
        &self,
        ids: impl IntoIterator<Item = UserId>,
    ) -> ApplicationResult<HashMap<UserId, String>> {
        let mut names = HashMap::new();
        for id in ids {
            if !names.contains_key(&id) {
                let name = self.display_name(id)?;
                names.insert(id, name);
            }
        }
        Ok(names)
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}
