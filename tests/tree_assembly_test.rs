//! Structural properties of comment tree assembly

use chrono::{DateTime, Duration, TimeZone, Utc};
use rstest::rstest;

use numchain::domain::{assemble, Comment, CommentId, CommentNode, CommentTree, Operator, PostId, UserId};

fn at(step: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::milliseconds(step)
}

/// Deterministic pseudo-random thread: each comment picks an earlier comment
/// as parent, or none. Several comments share a timestamp.
fn thread(len: usize, seed: u64) -> Vec<Comment> {
    let post = PostId::new_v4();
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        state >> 33
    };

    let mut comments: Vec<Comment> = Vec::with_capacity(len);
    for i in 0..len {
        let pick = next() as usize % (i + 1);
        let parent = if pick == i { None } else { Some(comments[pick].id) };
        comments.push(Comment {
            id: CommentId::new_v4(),
            user_id: UserId::new_v4(),
            post_id: post,
            parent_comment_id: parent,
            operator: Operator::Add,
            right_operand: 1.0,
            result: i as f64,
            created_at: at((i / 3) as i64),
        });
    }
    comments
}

fn flatten(nodes: &[CommentNode]) -> Vec<&CommentNode> {
    let mut out = Vec::new();
    let mut stack: Vec<&CommentNode> = nodes.iter().rev().collect();
    while let Some(node) = stack.pop() {
        out.push(node);
        stack.extend(node.children.iter().rev());
    }
    out
}

fn position(input: &[Comment], id: CommentId) -> usize {
    input.iter().position(|c| c.id == id).unwrap()
}

#[rstest]
#[case(1, 7)]
#[case(10, 1)]
#[case(250, 42)]
#[case(2_000, 99)]
fn given_random_thread_when_assembled_then_node_count_is_preserved(
    #[case] len: usize,
    #[case] seed: u64,
) {
    let input = thread(len, seed);

    let tree = CommentTree::assemble(input, |_| String::new());

    assert_eq!(tree.len(), len);
    assert!(tree.detached.is_empty());
}

#[rstest]
#[case(50, 3)]
#[case(500, 11)]
fn given_random_thread_when_assembled_twice_then_trees_are_identical(
    #[case] len: usize,
    #[case] seed: u64,
) {
    let input = thread(len, seed);

    let first = assemble(input.clone(), |c| c.user_id.to_string());
    let second = assemble(input, |c| c.user_id.to_string());

    assert_eq!(first, second);
}

#[rstest]
#[case(300, 5)]
#[case(1_000, 77)]
fn given_random_thread_when_assembled_then_every_level_follows_input_order(
    #[case] len: usize,
    #[case] seed: u64,
) {
    let input = thread(len, seed);

    let roots = assemble(input.clone(), |_| String::new());

    let mut levels: Vec<&[CommentNode]> = vec![&roots];
    levels.extend(flatten(&roots).into_iter().map(|n| n.children.as_slice()));
    for level in levels {
        let positions: Vec<usize> = level.iter().map(|n| position(&input, n.comment.id)).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(level
            .windows(2)
            .all(|w| w[0].comment.created_at <= w[1].comment.created_at));
    }
}

#[rstest]
#[case(400, 8)]
fn given_random_thread_when_assembled_then_children_point_to_their_parent(
    #[case] len: usize,
    #[case] seed: u64,
) {
    let input = thread(len, seed);

    let roots = assemble(input, |_| String::new());

    assert!(roots.iter().all(|r| r.comment.parent_comment_id.is_none()));
    for node in flatten(&roots) {
        for child in &node.children {
            assert_eq!(child.comment.parent_comment_id, Some(node.comment.id));
        }
    }
}

#[test]
fn given_stored_results_when_assembled_then_values_are_not_recomputed() {
    let mut input = thread(20, 4);
    input[5].result = -1234.5;
    let id = input[5].id;

    let roots = assemble(input, |_| String::new());

    let node = flatten(&roots)
        .into_iter()
        .find(|n| n.comment.id == id)
        .unwrap();
    assert_eq!(node.comment.result, -1234.5);
}
