//! Persistence boundary trait
//!
//! Services reach posts, comments and users only through [`Store`], so they
//! can be tested against [`MemoryStore`] or any recording wrapper.

use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Comment, CommentId, NewComment, NewPost, Post, PostId, User, UserId};

/// Failure inside a persistence collaborator.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt store file {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialize store: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("username already exists: {0}")]
    Conflict(String),

    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

impl<T> From<PoisonError<T>> for StoreError {
    fn from(_: PoisonError<T>) -> Self {
        StoreError::Poisoned
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence and identity collaborator.
///
/// Implementations own id generation, timestamps, uniqueness and durability.
pub trait Store: Send + Sync {
    /// Fetch a post by id.
    fn get_post(&self, id: PostId) -> StoreResult<Option<Post>>;

    /// Fetch a comment by id, only if it belongs to `post_id`.
    fn get_comment(&self, id: CommentId, post_id: PostId) -> StoreResult<Option<Comment>>;

    /// Persist a post, assigning id and creation timestamp.
    fn insert_post(&self, record: NewPost) -> StoreResult<Post>;

    /// Persist a comment, assigning id and creation timestamp.
    fn insert_comment(&self, record: NewComment) -> StoreResult<Comment>;

    /// All posts, newest first.
    fn list_posts(&self) -> StoreResult<Vec<Post>>;

    /// All comments, oldest first; ties keep insertion order.
    fn list_comments(&self) -> StoreResult<Vec<Comment>>;

    /// Comments of one post, oldest first; ties keep insertion order.
    fn list_comments_for_post(&self, post_id: PostId) -> StoreResult<Vec<Comment>>;

    /// Register a username. Duplicate names fail with [`StoreError::Conflict`].
    fn insert_user(&self, username: &str) -> StoreResult<User>;

    fn find_user(&self, username: &str) -> StoreResult<Option<User>>;

    /// Display name of a user, if known.
    fn resolve_display_name(&self, id: UserId) -> StoreResult<Option<String>>;
}

/// Serializable content of a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub users: Vec<User>,
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
}

impl Snapshot {
    /// Wall clock, bumped past the latest record so timestamps are strictly
    /// increasing within a store.
    fn next_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now();
        let latest = self
            .posts
            .iter()
            .map(|p| p.created_at)
            .chain(self.comments.iter().map(|c| c.created_at))
            .max();
        match latest {
            Some(latest) if latest >= now => latest + Duration::microseconds(1),
            _ => now,
        }
    }

    pub fn get_post(&self, id: PostId) -> Option<Post> {
        self.posts.iter().find(|p| p.id == id).cloned()
    }

    pub fn get_comment(&self, id: CommentId, post_id: PostId) -> Option<Comment> {
        self.comments
            .iter()
            .find(|c| c.id == id && c.post_id == post_id)
            .cloned()
    }

    pub fn insert_post(&mut self, record: NewPost) -> Post {
        let post = Post {
            id: PostId::new_v4(),
            user_id: record.user_id,
            number: record.number,
            created_at: self.next_timestamp(),
        };
        self.posts.push(post.clone());
        post
    }

    pub fn insert_comment(&mut self, record: NewComment) -> Comment {
        let comment = Comment {
            id: CommentId::new_v4(),
            user_id: record.user_id,
            post_id: record.post_id,
            parent_comment_id: record.parent_comment_id,
            operator: record.operator,
            right_operand: record.right_operand,
            result: record.result,
            created_at: self.next_timestamp(),
        };
        self.comments.push(comment.clone());
        comment
    }

    pub fn list_posts(&self) -> Vec<Post> {
        let mut posts = self.posts.clone();
        // stable sort over reversed insertion order: ties list the later insert first
        posts.reverse();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }

    pub fn list_comments(&self) -> Vec<Comment> {
        let mut comments = self.comments.clone();
        comments.sort_by_key(|c| c.created_at);
        comments
    }

    pub fn list_comments_for_post(&self, post_id: PostId) -> Vec<Comment> {
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| c.created_at);
        comments
    }

    pub fn insert_user(&mut self, username: &str) -> StoreResult<User> {
        if self.find_user(username).is_some() {
            return Err(StoreError::Conflict(username.to_string()));
        }
        let user = User {
            id: UserId::new_v4(),
            username: username.to_string(),
        };
        self.users.push(user.clone());
        Ok(user)
    }

    pub fn find_user(&self, username: &str) -> Option<User> {
        self.users.iter().find(|u| u.username == username).cloned()
    }

    pub fn display_name(&self, id: UserId) -> Option<String> {
        self.users
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.username.clone())
    }
}

// ============================================================
// IN-MEMORY IMPLEMENTATION
// ============================================================

/// Process-local store, primarily for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<Snapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            state: RwLock::new(snapshot),
        }
    }
}

impl Store for MemoryStore {
    fn get_post(&self, id: PostId) -> StoreResult<Option<Post>> {
        Ok(self.state.read()?.get_post(id))
    }

    fn get_comment(&self, id: CommentId, post_id: PostId) -> StoreResult<Option<Comment>> {
        Ok(self.state.read()?.get_comment(id, post_id))
    }

    fn insert_post(&self, record: NewPost) -> StoreResult<Post> {
        Ok(self.state.write()?.insert_post(record))
    }

    fn insert_comment(&self, record: NewComment) -> StoreResult<Comment> {
        Ok(self.state.write()?.insert_comment(record))
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
        self.state.write()?.insert_user(username)
    }

    fn find_user(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self.state.read()?.find_user(username))
    }

    fn resolve_display_name(&self, id: UserId) -> StoreResult<Option<String>> {
        Ok(self.state.read()?.display_name(id))
    }
}
