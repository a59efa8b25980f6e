//! Post creation and the tree read path

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::services::UserService;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    assemble_forest, CommentTree, DomainError, Forest, NewPost, PostId, PostNode, UserId,
};
use crate::infrastructure::traits::Store;

pub struct PostService {
    store: Arc<dyn Store>,
    users: UserService,
}

impl PostService {
    pub fn new(store: Arc<dyn Store>, users: UserService) -> Self {
        Self { store, users }
    }

    /// Create a post seeding a new thread with `number`.
    #[instrument(level = "debug", skip(self))]
    pub fn create_post(&self, owner: UserId, number: Option<f64>) -> ApplicationResult<PostNode> {
        let number = number
            .filter(|n| n.is_finite())
            .ok_or(DomainError::InvalidSeed)?;

        let username = self.users.display_name(owner)?;

        let post = self.store.insert_post(NewPost {
            user_id: owner,
            number,
        })?;
        info!("post {} seeded with {}", post.id, post.number);

        Ok(PostNode {
            post,
            username,
            comments: Vec::new(),
        })
    }

    /// Every post, newest first, with its comment trees.
    ///
    /// Stored results are shown as stored; nothing is recomputed here.
    #[instrument(level = "debug", skip(self))]
    pub fn forest(&self) -> ApplicationResult<Forest> {
        let mut posts = self.store.list_posts()?;
        let mut comments = self.store.list_comments()?;
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        comments.sort_by_key(|c| c.created_at);

        let names = self.users.display_names(
            posts
                .iter()
                .map(|p| p.user_id)
                .chain(comments.iter().map(|c| c.user_id)),
        )?;
        let fallback = self.users.fallback();

        let assembly = assemble_forest(posts, comments, |id| {
            names
                .get(&id)
                .cloned()
                .unwrap_or_else(|| fallback.to_string())
        });

        for id in &assembly.detached {
            warn!("comment {} has no reachable parent, shown at root level", id);
        }
        for id in &assembly.stray {
            warn!("comment {} references a missing post, skipped", id);
        }
        debug!("assembled {} posts", assembly.forest.len());
        Ok(assembly.forest)
    }

    /// One post with its comment trees.
    #[instrument(level = "debug", skip(self))]
    pub fn post_tree(&self, post_id: PostId) -> ApplicationResult<PostNode> {
        let post = self
            .store
            .get_post(post_id)?
            .ok_or(ApplicationError::PostNotFound(post_id))?;
        let mut comments = self.store.list_comments_for_post(post_id)?;
        comments.sort_by_key(|c| c.created_at);

        let names = self
            .users
            .display_names(std::iter::once(post.user_id).chain(comments.iter().map(|c| c.user_id)))?;
        let fallback = self.users.fallback();
        let name_of = |id: UserId| {
            names
                .get(&id)
                .cloned()
                .unwrap_or_else(|| fallback.to_string())
        };

        let tree = CommentTree::assemble(comments, |c| name_of(c.user_id));
        for id in &tree.detached {
            warn!("comment {} has no reachable parent, shown at root level", id);
        }

        Ok(PostNode {
            username: name_of(post.user_id),
            post,
            comments: tree.roots,
        })
    }
}
