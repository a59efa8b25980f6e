//! Chained arithmetic threads.
//!
//! A post seeds a number; every comment applies one operator and a right
//! operand to its parent's value (the post's number or the parent comment's
//! result). Comments are stored flat and reassembled into one tree per post.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
