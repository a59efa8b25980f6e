//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::{CommentId, PostId};

/// Chained arithmetic threads: posts seed a number, comments derive results from their parent
#[derive(Parser, Debug)]
#[command(name = "numchain")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Additional config file
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Store file (overrides config)
    #[arg(long, global = true, env = "NUMCHAIN_STORE", value_hint = ValueHint::FilePath)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Create and show posts
    Post {
        #[command(subcommand)]
        command: PostCommands,
    },

    /// Add comments
    Comment {
        #[command(subcommand)]
        command: CommentCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Register a username
    Add {
        /// Username (3+ characters of A-Z a-z 0-9 _ . -)
        name: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum PostCommands {
    /// Start a thread with a number
    Create {
        /// Posting user
        #[arg(short, long)]
        user: String,
        /// Starting number
        #[arg(allow_negative_numbers = true)]
        number: f64,
    },

    /// Show all posts with their comment trees, newest first
    List {
        /// Print JSON instead of trees
        #[arg(long)]
        json: bool,
    },

    /// Show one post with its comment tree
    Show {
        /// Post id
        id: PostId,
        /// Print JSON instead of a tree
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum CommentCommands {
    /// Apply an operation to a post or to another comment
    Add {
        /// Commenting user
        #[arg(short, long)]
        user: String,
        /// Post id
        #[arg(short, long)]
        post: PostId,
        /// Parent comment id (omit to comment on the post)
        #[arg(long)]
        parent: Option<CommentId>,
        /// Only print the result, do not store the comment
        #[arg(long)]
        dry_run: bool,
        /// Operator: + - * /
        #[arg(allow_hyphen_values = true)]
        operator: String,
        /// Right operand
        #[arg(allow_negative_numbers = true)]
        operand: f64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show global config file location
    Path,
}
