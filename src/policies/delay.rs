//! # Randomized delay ranges.
//!
//! [`DelayRange`] models every simulated duration in the bank: the stagger between
//! customer arrivals and the time a teller spends with the manager or in the safe.
//! The exact numbers carry no meaning for the coordination protocol; they only shape
//! how agents interleave.
//!
//! - [`DelayRange::ZERO`]: no delay at all (useful for tests)
//! - [`DelayRange::fixed`]: the same duration every time
//! - [`DelayRange::millis`]: uniform in `[min, max]` milliseconds, inclusive

use rand::Rng;
use std::time::Duration;

/// Inclusive range a delay is sampled from.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use bankfloor::DelayRange;
///
/// let safe = DelayRange::millis(10, 50);
/// let d = safe.sample();
/// assert!(d >= Duration::from_millis(10) && d <= Duration::from_millis(50));
///
/// assert_eq!(DelayRange::fixed(Duration::from_millis(7)).sample(), Duration::from_millis(7));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelayRange {
    /// Lower bound (inclusive).
    pub min: Duration,
    /// Upper bound (inclusive).
    pub max: Duration,
}

impl DelayRange {
    /// No delay.
    pub const ZERO: DelayRange = DelayRange {
        min: Duration::ZERO,
        max: Duration::ZERO,
    };

    /// Creates a range from explicit bounds.
    pub const fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// Creates a range of whole milliseconds, both ends inclusive.
    pub const fn millis(min: u64, max: u64) -> Self {
        Self::new(Duration::from_millis(min), Duration::from_millis(max))
    }

    /// A range that always yields `d`.
    pub const fn fixed(d: Duration) -> Self {
        Self::new(d, d)
    }

    /// True when `min <= max`.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    /// Draws one delay uniformly from `[min, max]`.
    ///
    /// ### Note
    /// An inverted range never panics: it collapses to `min`. [`Config::validate`](crate::Config::validate)
    /// rejects such ranges before a bank is built.
    pub fn sample(&self) -> Duration {
        if self.min >= self.max {
            return self.min;
        }
        let lo = self.min.as_micros().min(u128::from(u64::MAX)) as u64;
        let hi = self.max.as_micros().min(u128::from(u64::MAX)) as u64;

        let mut rng = rand::rng();
        Duration::from_micros(rng.random_range(lo..=hi))
    }
}

impl Default for DelayRange {
    /// Returns [`DelayRange::ZERO`].
    fn default() -> Self {
        DelayRange::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_range_is_zero() {
        assert_eq!(DelayRange::ZERO.sample(), Duration::ZERO);
        assert_eq!(DelayRange::default(), DelayRange::ZERO);
    }

    #[test]
    fn test_fixed_range_is_constant() {
        let range = DelayRange::fixed(Duration::from_millis(25));
        for _ in 0..20 {
            assert_eq!(range.sample(), Duration::from_millis(25));
        }
    }

    #[test]
    fn test_sample_stays_within_bounds() {
        let range = DelayRange::millis(5, 30);
        for _ in 0..500 {
            let d = range.sample();
            assert!(
                d >= Duration::from_millis(5) && d <= Duration::from_millis(30),
                "sample {:?} outside [5ms, 30ms]",
                d
            );
        }
    }

    #[test]
    fn test_inverted_range_collapses_to_min() {
        let range = DelayRange::millis(40, 10);
        assert!(!range.is_valid());
        assert_eq!(range.sample(), Duration::from_millis(40));
    }
}
