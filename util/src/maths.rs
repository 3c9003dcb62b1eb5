//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Limit a value to an upper bound using `min`, returning the limited value
/// and `true` if the limit was applied.
///
/// Only the upper bound is enforced, callers apply the sign afterwards so
/// that the magnitude of a demand is limited rather than its value.
pub fn limit_max<T>(value: T, max: T) -> (T, bool)
where
    T: Float
{
    if value > max {
        (max, true)
    }
    else {
        (value, false)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_limit_max() {
        assert_eq!(limit_max(1.78f64, 0.5), (0.5, true));
        assert_eq!(limit_max(0.5f64, 0.5), (0.5, false));
        assert_eq!(limit_max(0.0f64, 0.5), (0.0, false));
        assert_eq!(limit_max(-3.0f64, 0.5), (-3.0, false));
    }
}
