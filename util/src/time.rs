//! General time utility functions

use chrono;
use std::time::Duration;

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    duration.num_nanoseconds()
        .map(|ns| ns as f64 / NANOS_PER_SECOND as f64)
}

/// Get the period of a cycle running at the given frequency.
///
/// Returns `None` if the frequency is not a positive, finite number.
pub fn period_from_frequency(frequency_hz: f64) -> Option<Duration> {
    if frequency_hz.is_finite() && frequency_hz > 0.0 {
        Some(Duration::from_secs_f64(1.0 / frequency_hz))
    }
    else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_to_seconds() {
        let d = chrono::Duration::milliseconds(1500);
        assert_eq!(duration_to_seconds(d), Some(1.5));
    }

    #[test]
    fn test_period_from_frequency() {
        assert_eq!(period_from_frequency(10.0), Some(Duration::from_millis(100)));
        assert_eq!(period_from_frequency(0.0), None);
        assert_eq!(period_from_frequency(-5.0), None);
        assert_eq!(period_from_frequency(std::f64::NAN), None);
    }
}
