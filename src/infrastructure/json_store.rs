//! JSON file backed store
//!
//! The whole snapshot is loaded at open and rewritten after every insert via
//! a temp file in the same directory, renamed over the target.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tempfile::NamedTempFile;
use tracing::{debug, instrument};

use crate::domain::{Comment, CommentId, NewComment, NewPost, Post, PostId, User, UserId};
use crate::infrastructure::traits::{Snapshot, Store, StoreError, StoreResult};

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    state: RwLock<Snapshot>,
}

impl JsonFileStore {
    /// Open the store at `path`; a missing file yields an empty store.
    #[instrument(level = "debug")]
    pub fn open(path: &Path) -> StoreResult<Self> {
        let snapshot = if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| StoreError::io(format!("read store {}", path.display()), e))?;
            if content.trim().is_empty() {
                Snapshot::default()
            } else {
                serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                    path: path.to_path_buf(),
                    source,
                })?
            }
        } else {
            Snapshot::default()
        };
        debug!(
            "opened store: {} users, {} posts, {} comments",
            snapshot.users.len(),
            snapshot.posts.len(),
            snapshot.comments.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            state: RwLock::new(snapshot),
        })
    }

    fn persist(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)
            .map_err(|e| StoreError::io(format!("create store dir {}", dir.display()), e))?;

        let content = serde_json::to_string_pretty(snapshot).map_err(StoreError::Serialize)?;
        let mut tmp = NamedTempFile::new_in(dir)
            .map_err(|e| StoreError::io(format!("create temp file in {}", dir.display()), e))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| StoreError::io("write temp store file", e))?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::io(format!("replace {}", self.path.display()), e.error))?;
        Ok(())
    }

    /// Apply `op` to the snapshot and persist; the in-memory copy is only
    /// replaced once the file write succeeded.
    fn mutate<T>(&self, op: impl FnOnce(&mut Snapshot) -> StoreResult<T>) -> StoreResult<T> {
        let mut guard = self.state.write()?;
        let mut next = guard.clone();
        let value = op(&mut next)?;
        self.persist(&next)?;
        *guard = next;
        Ok(value)
    }
}

impl Store for JsonFileStore {
    fn get_post(&self, id: PostId) -> StoreResult<Option<Post>> {
        Ok(self.state.read()?.get_post(id))
    }

    fn get_comment(&self, id: CommentId, post_id: PostId) -> StoreResult<Option<Comment>> {
        Ok(self.state.read()?.get_comment(id, post_id))
    }

    fn insert_post(&self, record: NewPost) -> StoreResult<Post> {
        self.mutate(|s| Ok(s.insert_post(record)))
    }

    fn insert_comment(&self, record: NewComment) -> StoreResult<Comment> {
        self.mutate(|s| Ok(s.insert_comment(record)))
    }

    fn list_posts(&self) -> StoreResult<Vec<Post>> {
        Ok(self.state.read()?.list_posts())
    }

    fn list_comments(&self) -> StoreResult<Vec<Comment>> {
        Ok(self.state.read()?.list_comments())
    }

    fn list_comments_for_post(&self, post_id: PostId) -> StoreResult<Vec<Comment>> {
        Ok(self.state.read()?.list_comments_for_post(post_id))
    }

    fn insert_user(&self, username: &str) -> StoreResult<User> {
        self.mutate(|s| s.insert_user(username))
    }

    fn find_user(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self.state.read()?.find_user(username))
    }

    fn resolve_display_name(&self, id: UserId) -> StoreResult<Option<String>> {
        Ok(self.state.read()?.display_name(id))
    }
}
