//! Arithmetic evaluation of a single comment step.

use crate::domain::entities::Operator;
use crate::domain::error::DomainError;

/// Apply `operator` to `left` and `right` with plain IEEE-754 arithmetic.
///
/// No rounding is performed, so `0.1 + 0.2` yields `0.30000000000000004`.
/// Division by zero (either sign) is rejected, as is any result that is not
/// finite.
pub fn evaluate(left: f64, operator: Operator, right: f64) -> Result<f64, DomainError> {
    let result = match operator {
        Operator::Add => left + right,
        Operator::Subtract => left - right,
        Operator::Multiply => left * right,
        Operator::Divide => {
            if right == 0.0 {
                return Err(DomainError::DivisionByZero);
            }
            left / right
        }
    };

    if !result.is_finite() {
        return Err(DomainError::NonFiniteResult {
            left,
            operator,
            right,
        });
    }
    Ok(result)
}

/// Check an operand before it reaches [`evaluate`].
pub fn validate_operand(operator: Operator, right: Option<f64>) -> Result<f64, DomainError> {
    let right = right
        .filter(|r| r.is_finite())
        .ok_or(DomainError::InvalidOperand)?;
    if operator == Operator::Divide && right == 0.0 {
        return Err(DomainError::DivisionByZero);
    }
    Ok(right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(10.0, Operator::Add, 5.0, 15.0)]
    #[case(10.0, Operator::Subtract, 15.0, -5.0)]
    #[case(15.0, Operator::Multiply, 2.0, 30.0)]
    #[case(30.0, Operator::Divide, 4.0, 7.5)]
    #[case(-3.0, Operator::Multiply, -3.0, 9.0)]
    #[case(1.0, Operator::Divide, 3.0, 1.0 / 3.0)]
    fn test_evaluate(
        #[case] left: f64,
        #[case] operator: Operator,
        #[case] right: f64,
        #[case] expected: f64,
    ) {
        assert_eq!(evaluate(left, operator, right).unwrap(), expected);
    }

    #[test]
    fn test_evaluate_keeps_float_representation_error() {
        let result = evaluate(0.1, Operator::Add, 0.2).unwrap();
        assert_ne!(result, 0.3);
        assert!((result - 0.3).abs() < 1e-12);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-0.0)]
    fn test_evaluate_rejects_division_by_zero(#[case] zero: f64) {
        assert_eq!(
            evaluate(10.0, Operator::Divide, zero),
            Err(DomainError::DivisionByZero)
        );
    }

    #[test]
    fn test_evaluate_rejects_overflow() {
        let err = evaluate(f64::MAX, Operator::Multiply, 10.0).unwrap_err();
        assert!(matches!(err, DomainError::NonFiniteResult { .. }));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(f64::NAN))]
    #[case(Some(f64::INFINITY))]
    #[case(Some(f64::NEG_INFINITY))]
    fn test_validate_operand_rejects_non_finite(#[case] right: Option<f64>) {
        assert_eq!(
            validate_operand(Operator::Add, right),
            Err(DomainError::InvalidOperand)
        );
    }

    #[test]
    fn test_validate_operand_checks_operand_before_zero_divisor() {
        assert_eq!(
            validate_operand(Operator::Divide, Some(f64::NAN)),
            Err(DomainError::InvalidOperand)
        );
        assert_eq!(
            validate_operand(Operator::Divide, Some(0.0)),
            Err(DomainError::DivisionByZero)
        );
        assert_eq!(validate_operand(Operator::Multiply, Some(0.0)), Ok(0.0));
    }
}
