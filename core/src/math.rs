//! Rounding and aggregation helpers available to formulas.

use crate::failure::{ArithmeticFault, Fault};

/// Round `x` up to the next unit at `digits` decimal places.
///
/// Ceiling, not nearest: staffing figures must never be under-provisioned
/// by fractional rounding. `round_up(24.01, 0) == 25.0`.
pub fn round_up(x: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (x * factor).ceil() / factor
}

/// Largest of `values`. Fails on an empty list.
pub fn max_of(values: &[f64]) -> Result<f64, Fault> {
    values
        .iter()
        .copied()
        .reduce(f64::max)
        .ok_or_else(|| Fault::arithmetic(ArithmeticFault::EmptyAggregate))
}

/// Sum of `values`, left to right. An empty list sums to zero.
pub fn sum_of(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, v| acc + v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_up_is_a_ceiling() {
        assert_eq!(round_up(24.01, 0), 25.0);
        assert_eq!(round_up(25.0, 0), 25.0);
        assert_eq!(round_up(0.0, 0), 0.0);
        assert_eq!(round_up(0.0001, 0), 1.0);
    }

    #[test]
    fn round_up_respects_digits() {
        assert_eq!(round_up(1.231, 2), 1.24);
        assert_eq!(round_up(1.5, 1), 1.5);
    }

    #[test]
    fn round_up_of_negative_moves_toward_zero() {
        assert_eq!(round_up(-1.5, 0), -1.0);
    }

    #[test]
    fn max_of_picks_largest_and_rejects_empty() {
        assert_eq!(max_of(&[3.0, 9.0, 4.0]).unwrap(), 9.0);
        assert_eq!(
            max_of(&[]),
            Err(Fault::arithmetic(ArithmeticFault::EmptyAggregate))
        );
    }

    #[test]
    fn sum_of_empty_is_zero() {
        assert_eq!(sum_of(&[]), 0.0);
        assert_eq!(sum_of(&[1.0, 2.5, 3.5]), 7.0);
    }
}
