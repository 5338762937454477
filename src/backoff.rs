//! Backoff delay calculation.

use std::time::Duration;

/// Calculate the delay before retry `k` (1-indexed; `k = 1` is the first
/// retry after the initial attempt).
///
/// Deterministic multiplicative growth: `timeout * factor^(k - 1)`. No
/// jitter, no cap, no minimum. `factor = 1` yields a constant delay and
/// `timeout = 0` yields no delay at all.
///
/// Delays saturate at [`Duration::MAX`] rather than overflowing, including
/// when the exponent itself exceeds what the growth computation can
/// represent. `retry = 0` is out of contract: debug builds assert, release
/// builds treat it as the first retry.
///
/// # Examples
///
/// ```rust
/// use resurge::backoff::delay_for_retry;
/// use std::time::Duration;
///
/// let base = Duration::from_millis(100);
///
/// // Delay doubles with factor 2: 100ms, 200ms, 400ms
/// assert_eq!(delay_for_retry(1, base, 2.0), Duration::from_millis(100));
/// assert_eq!(delay_for_retry(2, base, 2.0), Duration::from_millis(200));
/// assert_eq!(delay_for_retry(3, base, 2.0), Duration::from_millis(400));
///
/// // Factor 1 never grows
/// assert_eq!(delay_for_retry(7, base, 1.0), Duration::from_millis(100));
/// ```
pub fn delay_for_retry(retry: u32, timeout: Duration, factor: f64) -> Duration {
    debug_assert!(retry >= 1, "retry is 1-indexed");
    if retry <= 1 || factor == 1.0 || timeout.is_zero() {
        return timeout;
    }
    // Exponents past i32::MAX would wrap in powi; at that point the true
    // delay is astronomically large anyway, so clamp and let the growth
    // saturate.
    let exponent = i32::try_from(retry - 1).unwrap_or(i32::MAX);
    let scale = factor.powi(exponent);
    Duration::try_from_secs_f64(timeout.as_secs_f64() * scale).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod backoff_tests {
    use super::*;

    #[test]
    fn test_first_retry_uses_base_timeout() {
        assert_eq!(
            delay_for_retry(1, Duration::from_millis(250), 3.0),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_factor_one_is_constant() {
        let base = Duration::from_millis(500);
        assert_eq!(delay_for_retry(1, base, 1.0), base);
        assert_eq!(delay_for_retry(5, base, 1.0), base);
        assert_eq!(delay_for_retry(50, base, 1.0), base);
    }

    #[test]
    fn test_zero_timeout_yields_zero_delay() {
        assert_eq!(delay_for_retry(1, Duration::ZERO, 2.0), Duration::ZERO);
        assert_eq!(delay_for_retry(4, Duration::ZERO, 2.0), Duration::ZERO);
    }

    #[test]
    fn test_exponential_growth() {
        let base = Duration::from_millis(100);
        assert_eq!(delay_for_retry(1, base, 2.0), Duration::from_millis(100));
        assert_eq!(delay_for_retry(2, base, 2.0), Duration::from_millis(200));
        assert_eq!(delay_for_retry(3, base, 2.0), Duration::from_millis(400));
        assert_eq!(delay_for_retry(4, base, 2.0), Duration::from_millis(800));
    }

    #[test]
    fn test_fractional_factor() {
        let base = Duration::from_millis(100);
        assert_eq!(delay_for_retry(2, base, 1.5), Duration::from_millis(150));
        assert_eq!(delay_for_retry(3, base, 1.5), Duration::from_millis(225));
    }

    #[test]
    fn test_monotonic_for_factor_above_one() {
        let base = Duration::from_millis(10);
        let mut previous = delay_for_retry(1, base, 1.7);
        for k in 2..12 {
            let next = delay_for_retry(k, base, 1.7);
            assert!(next > previous, "delay must grow at retry {k}");
            previous = next;
        }
    }

    #[test]
    fn test_overflow_saturates() {
        assert_eq!(
            delay_for_retry(u32::MAX, Duration::from_secs(1), 10.0),
            Duration::MAX
        );
    }

    #[test]
    fn test_saturation_holds_past_exponent_limits() {
        let base = Duration::from_millis(10);
        let at_limit = delay_for_retry(i32::MAX as u32 + 1, base, 10.0);
        let past_limit = delay_for_retry(i32::MAX as u32 + 2, base, 10.0);

        assert_eq!(at_limit, Duration::MAX);
        assert!(past_limit >= at_limit, "delay must never shrink");
    }

    #[test]
    fn test_zero_timeout_never_saturates() {
        assert_eq!(delay_for_retry(u32::MAX, Duration::ZERO, 10.0), Duration::ZERO);
    }

    #[test]
    #[should_panic(expected = "1-indexed")]
    fn test_retry_zero_is_out_of_contract() {
        delay_for_retry(0, Duration::from_millis(10), 2.0);
    }
}
