//! Comment creation: left operand resolution, evaluation and persistence

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::application::services::UserService;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    evaluate, validate_operand, CommentId, CommentNode, DomainError, NewComment, Operator, PostId,
    UserId,
};
use crate::infrastructure::traits::Store;

/// A client-supplied field: the expected type, or whatever JSON arrived instead.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ClientValue<T> {
    Typed(T),
    Raw(Value),
}

impl<T> ClientValue<T> {
    pub fn typed(&self) -> Option<&T> {
        match self {
            ClientValue::Typed(value) => Some(value),
            ClientValue::Raw(_) => None,
        }
    }
}

/// Unvalidated input for a new comment, as received from a client.
///
/// Wrongly typed fields still deserialize; they are rejected by the same
/// checks as missing ones, in the same order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub post_id: Option<ClientValue<PostId>>,
    pub parent_comment_id: Option<ClientValue<CommentId>>,
    pub operator: Option<ClientValue<String>>,
    pub right_operand: Option<ClientValue<f64>>,
}

impl CommentRequest {
    pub fn new(
        post_id: PostId,
        parent_comment_id: Option<CommentId>,
        operator: impl Into<String>,
        right_operand: f64,
    ) -> Self {
        Self {
            post_id: Some(ClientValue::Typed(post_id)),
            parent_comment_id: parent_comment_id.map(ClientValue::Typed),
            operator: Some(ClientValue::Typed(operator.into())),
            right_operand: Some(ClientValue::Typed(right_operand)),
        }
    }
}

/// Input that passed every check not requiring the store.
#[derive(Debug, Clone, Copy)]
struct Validated {
    post_id: PostId,
    parent_comment_id: Option<CommentId>,
    operator: Operator,
    right_operand: f64,
}

pub struct CommentService {
    store: Arc<dyn Store>,
    users: UserService,
}

impl CommentService {
    pub fn new(store: Arc<dyn Store>, users: UserService) -> Self {
        Self { store, users }
    }

    /// Left operand for a comment: the post's number for a root comment,
    /// the parent's stored result for a reply.
    ///
    /// The parent lookup is scoped to `post_id`, so a parent from another
    /// post is reported as not found.
    #[instrument(level = "debug", skip(self))]
    pub fn resolve_left_operand(
        &self,
        post_id: PostId,
        parent_comment_id: Option<CommentId>,
    ) -> ApplicationResult<f64> {
        match parent_comment_id {
            None => {
                let post = self
                    .store
                    .get_post(post_id)?
                    .ok_or(ApplicationError::PostNotFound(post_id))?;
                Ok(post.number)
            }
            Some(parent_id) => {
                let parent = self
                    .store
                    .get_comment(parent_id, post_id)?
                    .ok_or(ApplicationError::ParentNotFound(parent_id))?;
                Ok(parent.result)
            }
        }
    }

    /// Result the request would produce, without writing anything.
    #[instrument(level = "debug", skip(self))]
    pub fn preview(&self, request: &CommentRequest) -> ApplicationResult<f64> {
        let input = Self::validate(request)?;
        self.compute(&input)
    }

    /// Validate, derive the result and persist a new comment owned by `owner`.
    ///
    /// All checks run before the single insert call; a rejected request never
    /// reaches the store's write path.
    #[instrument(level = "debug", skip(self))]
    pub fn create_comment(
        &self,
        owner: UserId,
        request: &CommentRequest,
    ) -> ApplicationResult<CommentNode> {
        let input = Self::validate(request)?;
        let result = self.compute(&input)?;
        let username = self.users.display_name(owner)?;

        let record = NewComment {
            user_id: owner,
            post_id: input.post_id,
            parent_comment_id: input.parent_comment_id,
            operator: input.operator,
            right_operand: input.right_operand,
            result,
        };
        let comment = self.store.insert_comment(record)?;
        info!(
            "comment {} on post {}: {} {} = {}",
            comment.id, comment.post_id, comment.operator, comment.right_operand, comment.result
        );

        Ok(CommentNode::leaf(comment, username))
    }

    /// Store-independent checks, first failure wins. Malformed ids are
    /// reported after the operator and operand checks, where a lookup would
    /// otherwise fail.
    fn validate(request: &CommentRequest) -> ApplicationResult<Validated> {
        let post_id = request
            .post_id
            .as_ref()
            .ok_or(ApplicationError::MissingPostId)?;
        let operator: Operator = match &request.operator {
            Some(ClientValue::Typed(symbol)) => symbol.parse::<Operator>()?,
            Some(ClientValue::Raw(raw)) => {
                return Err(DomainError::InvalidOperator(raw.to_string()).into())
            }
            None => return Err(DomainError::InvalidOperator(String::new()).into()),
        };
        let right_operand = validate_operand(
            operator,
            request.right_operand.as_ref().and_then(ClientValue::typed).copied(),
        )?;

        let post_id = *post_id
            .typed()
            .ok_or_else(|| malformed("postId", post_id))?;
        let parent_comment_id = match &request.parent_comment_id {
            None => None,
            Some(parent) => Some(
                *parent
                    .typed()
                    .ok_or_else(|| malformed("parentCommentId", parent))?,
            ),
        };
        Ok(Validated {
            post_id,
            parent_comment_id,
            operator,
            right_operand,
        })
    }

    fn compute(&self, input: &Validated) -> ApplicationResult<f64> {
        let left = self.resolve_left_operand(input.post_id, input.parent_comment_id)?;
        let result = evaluate(left, input.operator, input.right_operand)?;
        debug!(
            "{} {} {} = {}",
            left, input.operator, input.right_operand, result
        );
        Ok(result)
    }
}

fn malformed<T>(field: &'static str, value: &ClientValue<T>) -> ApplicationError {
    let value = match value {
        ClientValue::Raw(raw) => raw.to_string(),
        ClientValue::Typed(_) => String::new(),
    };
    ApplicationError::MalformedId { field, value }
}
