//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::Operator;

/// Domain errors represent business logic violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("invalid operator: {0:?} (expected one of + - * /)")]
    InvalidOperator(String),

    #[error("right operand must be a valid number")]
    InvalidOperand,

    #[error("cannot divide by zero")]
    DivisionByZero,

    #[error("result of {left} {operator} {right} is not a finite number")]
    NonFiniteResult {
        left: f64,
        operator: Operator,
        right: f64,
    },

    #[error("post number must be a valid number")]
    InvalidSeed,

    #[error("invalid username {0:?}: at least 3 characters of [A-Za-z0-9_.-]")]
    InvalidUsername(String),
}
