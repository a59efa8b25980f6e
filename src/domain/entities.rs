//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new_v4() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }
    };
}

entity_id!(
    /// Identifier of a post.
    PostId
);
entity_id!(
    /// Identifier of a comment.
    CommentId
);
entity_id!(
    /// Identifier of a user (owner reference).
    UserId
);

/// Arithmetic operator attached to a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
}

impl Operator {
    pub const ALL: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = DomainError;

    /// Exact symbol match only; no trimming or aliasing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.symbol() == s)
            .ok_or_else(|| DomainError::InvalidOperator(s.to_string()))
    }
}

/// A registered user. Only the identity part; credentials live elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

/// A post seeding a thread with its starting number. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub user_id: UserId,
    #[serde(deserialize_with = "number_or_text")]
    pub number: f64,
    pub created_at: DateTime<Utc>,
}

/// A comment applying `operator right_operand` to its left operand.
///
/// The left operand is the post's number for root comments and the parent's
/// `result` for replies. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub user_id: UserId,
    pub post_id: PostId,
    pub parent_comment_id: Option<CommentId>,
    pub operator: Operator,
    #[serde(deserialize_with = "number_or_text")]
    pub right_operand: f64,
    #[serde(deserialize_with = "number_or_text")]
    pub result: f64,
    pub created_at: DateTime<Utc>,
}

/// Post record handed to the store; id and timestamp are assigned on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub user_id: UserId,
    pub number: f64,
}

/// Comment record handed to the store; id and timestamp are assigned on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub user_id: UserId,
    pub post_id: PostId,
    pub parent_comment_id: Option<CommentId>,
    pub operator: Operator,
    pub right_operand: f64,
    pub result: f64,
}

/// A comment with its author's display name and its replies, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentNode {
    #[serde(flatten)]
    pub comment: Comment,
    pub username: String,
    pub children: Vec<CommentNode>,
}

impl CommentNode {
    pub fn leaf(comment: Comment, username: String) -> Self {
        Self {
            comment,
            username,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

/// A post with its author's display name and its root-level comment trees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostNode {
    #[serde(flatten)]
    pub post: Post,
    pub username: String,
    pub comments: Vec<CommentNode>,
}

impl PostNode {
    pub fn comment_count(&self) -> usize {
        self.comments.iter().map(CommentNode::size).sum()
    }
}

/// All posts, newest first, each with its assembled comment trees.
pub type Forest = Vec<PostNode>;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberRepr {
    Number(f64),
    Text(String),
}

/// Accept a JSON number or a numeric string; stores may keep numbers as text.
/// Only finite values are accepted.
fn number_or_text<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let (value, raw) = match NumberRepr::deserialize(deserializer)? {
        NumberRepr::Number(n) => (n, n.to_string()),
        NumberRepr::Text(s) => {
            let n = s
                .trim()
                .parse::<f64>()
                .map_err(|e| serde::de::Error::custom(format!("invalid number {s:?}: {e}")))?;
            (n, s)
        }
    };
    if value.is_finite() {
        Ok(value)
    } else {
        Err(serde::de::Error::custom(format!("non-finite number {raw:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("+", Operator::Add)]
    #[case("-", Operator::Subtract)]
    #[case("*", Operator::Multiply)]
    #[case("/", Operator::Divide)]
    fn test_operator_from_symbol(#[case] input: &str, #[case] expected: Operator) {
        assert_eq!(input.parse::<Operator>().unwrap(), expected);
        assert_eq!(expected.to_string(), input);
    }

    #[rstest]
    #[case("")]
    #[case("x")]
    #[case(" +")]
    #[case("%")]
    #[case("**")]
    fn test_operator_rejects_unknown_symbols(#[case] input: &str) {
        let err = input.parse::<Operator>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidOperator(s) if s == input));
    }

    #[test]
    fn test_comment_reads_numbers_stored_as_text() {
        let json = r#"{
            "id": "6f2c1d4e-0d6a-4a53-9a53-2f3f0d9b8c11",
            "user_id": "0b8e8a3e-51a4-4c4e-8a8e-59d3c4f9f0a2",
            "post_id": "1d7a0b73-0c4e-4c36-a6a5-5a9a3f0e2b6d",
            "parent_comment_id": null,
            "operator": "*",
            "right_operand": "2.5",
            "result": 25,
            "created_at": "2024-05-01T10:00:00Z"
        }"#;

        let comment: Comment = serde_json::from_str(json).unwrap();

        assert_eq!(comment.operator, Operator::Multiply);
        assert_eq!(comment.right_operand, 2.5);
        assert_eq!(comment.result, 25.0);
        assert!(comment.parent_comment_id.is_none());
    }

    #[test]
    fn test_post_rejects_non_numeric_text() {
        let json = r#"{
            "id": "1d7a0b73-0c4e-4c36-a6a5-5a9a3f0e2b6d",
            "user_id": "0b8e8a3e-51a4-4c4e-8a8e-59d3c4f9f0a2",
            "number": "ten",
            "created_at": "2024-05-01T10:00:00Z"
        }"#;

        assert!(serde_json::from_str::<Post>(json).is_err());
    }

    #[rstest]
    #[case("NaN")]
    #[case("inf")]
    #[case("-infinity")]
    #[case("1e400")]
    fn test_post_rejects_non_finite_text(#[case] number: &str) {
        let json = format!(
            r#"{{
            "id": "1d7a0b73-0c4e-4c36-a6a5-5a9a3f0e2b6d",
            "user_id": "0b8e8a3e-51a4-4c4e-8a8e-59d3c4f9f0a2",
            "number": "{number}",
            "created_at": "2024-05-01T10:00:00Z"
        }}"#
        );

        let err = serde_json::from_str::<Post>(&json).unwrap_err();

        assert!(err.to_string().contains("non-finite"));
    }

    #[test]
    fn test_comment_node_serializes_flat_with_numbers() {
        let comment = Comment {
            id: CommentId::new_v4(),
            user_id: UserId::new_v4(),
            post_id: PostId::new_v4(),
            parent_comment_id: None,
            operator: Operator::Add,
            right_operand: 5.0,
            result: 15.0,
            created_at: Utc::now(),
        };
        let node = CommentNode::leaf(comment, "alice".into());

        let value = serde_json::to_value(&node).unwrap();

        assert!(value["result"].is_number());
        assert!(value["right_operand"].is_number());
        assert_eq!(value["operator"], "+");
        assert_eq!(value["username"], "alice");
        assert!(value["parent_comment_id"].is_null());
        assert_eq!(value["children"].as_array().map(Vec::len), Some(0));
    }
}
