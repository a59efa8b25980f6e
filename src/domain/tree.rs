//! Reassembly of flat, time-ordered comments into nested trees.
//!
//! Comments are grouped by parent once, into per-slot child lists indexed by
//! input position, then materialized bottom-up without recursion.

use std::collections::HashMap;

use itertools::Itertools;
use rayon::prelude::*;
use tracing::instrument;

use crate::domain::entities::{Comment, CommentId, CommentNode, Forest, Post, PostId, PostNode, UserId};

/// Assembled comment trees of one post.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentTree {
    /// Root-level nodes in input order, followed by promoted unreachable nodes.
    pub roots: Vec<CommentNode>,
    /// Comments placed at root level although they declare a parent:
    /// the parent is absent from the input or the node is unreachable.
    pub detached: Vec<CommentId>,
}

impl CommentTree {
    /// Build the trees for `comments`, which must be sorted by creation time
    /// ascending. Sibling order follows input order.
    #[instrument(level = "trace", skip_all, fields(count = comments.len()))]
    pub fn assemble<F>(comments: Vec<Comment>, mut username: F) -> Self
    where
        F: FnMut(&Comment) -> String,
    {
        let n = comments.len();

        let mut index_of: HashMap<CommentId, usize> = HashMap::with_capacity(n);
        for (idx, comment) in comments.iter().enumerate() {
            index_of.entry(comment.id).or_insert(idx);
        }

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut roots: Vec<usize> = Vec::new();
        let mut detached: Vec<CommentId> = Vec::new();
        for (idx, comment) in comments.iter().enumerate() {
            match comment.parent_comment_id {
                None => roots.push(idx),
                Some(parent_id) => match index_of.get(&parent_id) {
                    Some(&parent) if parent != idx => children[parent].push(idx),
                    _ => {
                        roots.push(idx);
                        detached.push(comment.id);
                    }
                },
            }
        }

        // Preorder over every root; anything left unvisited sits on a cycle
        // and gets promoted so no input comment is dropped.
        let mut visited = vec![false; n];
        let mut order: Vec<usize> = Vec::with_capacity(n);
        for &root in &roots {
            preorder(root, &children, &mut visited, &mut order);
        }
        for idx in 0..n {
            if !visited[idx] {
                roots.push(idx);
                detached.push(comments[idx].id);
                preorder(idx, &children, &mut visited, &mut order);
            }
        }

        // Reverse preorder sees every child before its parent.
        let mut pending: Vec<Option<Comment>> = comments.into_iter().map(Some).collect();
        let mut built: Vec<Option<CommentNode>> = (0..n).map(|_| None).collect();
        for &idx in order.iter().rev() {
            let kids: Vec<CommentNode> = children[idx]
                .iter()
                .filter_map(|&child| built[child].take())
                .collect();
            if let Some(comment) = pending[idx].take() {
                let username = username(&comment);
                built[idx] = Some(CommentNode {
                    comment,
                    username,
                    children: kids,
                });
            }
        }

        let roots = roots
            .into_iter()
            .filter_map(|idx| built[idx].take())
            .collect();

        Self { roots, detached }
    }

    /// Total number of nodes across all levels.
    pub fn len(&self) -> usize {
        self.roots.iter().map(CommentNode::size).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

fn preorder(start: usize, children: &[Vec<usize>], visited: &mut [bool], order: &mut Vec<usize>) {
    let mut stack = vec![start];
    while let Some(idx) = stack.pop() {
        if visited[idx] {
            continue;
        }
        visited[idx] = true;
        order.push(idx);
        stack.extend(children[idx].iter().rev().copied());
    }
}

/// Convenience wrapper returning only the root-level nodes.
pub fn assemble<F>(comments: Vec<Comment>, username: F) -> Vec<CommentNode>
where
    F: FnMut(&Comment) -> String,
{
    CommentTree::assemble(comments, username).roots
}

/// Result of assembling every post of a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ForestAssembly {
    pub forest: Forest,
    /// Comments promoted to root level inside their post.
    pub detached: Vec<CommentId>,
    /// Comments referencing a post that is not part of the snapshot.
    pub stray: Vec<CommentId>,
}

/// Assemble one tree per post.
///
/// `posts` keep their given order (newest first by contract); `comments`
/// must be sorted by creation time ascending and are split per post in a
/// single pass before the per-post assembly runs in parallel.
#[instrument(level = "debug", skip_all, fields(posts = posts.len(), comments = comments.len()))]
pub fn assemble_forest<F>(posts: Vec<Post>, comments: Vec<Comment>, username: F) -> ForestAssembly
where
    F: Fn(UserId) -> String + Sync,
{
    let mut by_post: HashMap<PostId, Vec<Comment>> = comments
        .into_iter()
        .map(|comment| (comment.post_id, comment))
        .into_group_map();

    let grouped: Vec<(Post, Vec<Comment>)> = posts
        .into_iter()
        .map(|post| {
            let comments = by_post.remove(&post.id).unwrap_or_default();
            (post, comments)
        })
        .collect();

    let stray: Vec<CommentId> = by_post
        .into_values()
        .flatten()
        .map(|comment| comment.id)
        .sorted()
        .collect();

    let assembled: Vec<(PostNode, Vec<CommentId>)> = grouped
        .into_par_iter()
        .map(|(post, comments)| {
            let tree = CommentTree::assemble(comments, |c| username(c.user_id));
            let node = PostNode {
                username: username(post.user_id),
                post,
                comments: tree.roots,
            };
            (node, tree.detached)
        })
        .collect();

    let mut forest = Vec::with_capacity(assembled.len());
    let mut detached = Vec::new();
    for (node, ids) in assembled {
        forest.push(node);
        detached.extend(ids);
    }

    ForestAssembly {
        forest,
        detached,
        stray,
    }
}
