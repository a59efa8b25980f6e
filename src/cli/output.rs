//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;
use termtree::Tree;

use crate::domain::{CommentNode, PostNode};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

fn comment_label(node: &CommentNode) -> String {
    let c = &node.comment;
    format!(
        "{} {} = {}  {}",
        c.operator.to_string().cyan(),
        c.right_operand,
        c.result.to_string().bold(),
        format!("[{} · {}]", node.username, c.id).dimmed()
    )
}

fn comment_tree(node: &CommentNode) -> Tree<String> {
    Tree::new(comment_label(node)).with_leaves(node.children.iter().map(comment_tree))
}

/// Render a post and its comments as a tree.
pub fn post_tree(node: &PostNode) -> Tree<String> {
    let root = format!(
        "{}  {}",
        node.post.number.to_string().green().bold(),
        format!(
            "[{} · {} · {}]",
            node.username,
            node.post.id,
            node.post.created_at.format("%Y-%m-%d %H:%M:%S")
        )
        .dimmed()
    );
    Tree::new(root).with_leaves(node.comments.iter().map(comment_tree))
}
