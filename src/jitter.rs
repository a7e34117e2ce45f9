//! Jitter applied to pause delays.
//!
//! - `None`: exact backoff delay, useful in tests.
//! - `Full`: uniform in `[0, delay]`.
//! - `Equal`: uniform in `[delay/2, delay]`.
//! - `Decorrelated`: `min(max, random(base, previous * 3))`, tracking the previous sleep.
//!
//! Uses `rand`'s thread-local RNG; deterministic RNGs can be injected via [`Jitter::apply_with_rng`].

use rand::{rng, Rng};
use std::sync::Mutex;
use std::time::Duration;

/// Errors returned by jitter configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JitterError {
    #[error("decorrelated jitter: base ({base:?}) must not exceed max ({max:?})")]
    BaseExceedsMax { base: Duration, max: Duration },
}

/// State for decorrelated jitter.
#[derive(Debug)]
pub struct Decorrelated {
    base: Duration,
    max: Duration,
    previous: Mutex<Duration>,
}

impl Clone for Decorrelated {
    fn clone(&self) -> Self {
        Self { base: self.base, max: self.max, previous: Mutex::new(self.previous()) }
    }
}

impl Decorrelated {
    fn previous(&self) -> Duration {
        *self.previous.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Jitter strategy.
#[derive(Debug, Clone, Default)]
pub enum Jitter {
    #[default]
    None,
    Full,
    Equal,
    Decorrelated(Decorrelated),
}

impl Jitter {
    /// Uniform in `[0, delay]`.
    pub fn full() -> Self {
        Jitter::Full
    }

    /// Uniform in `[delay / 2, delay]`.
    pub fn equal() -> Self {
        Jitter::Equal
    }

    /// Decorrelated jitter between `base` and `max`. Fails if `base > max`.
    pub fn decorrelated(base: Duration, max: Duration) -> Result<Self, JitterError> {
        if base > max {
            return Err(JitterError::BaseExceedsMax { base, max });
        }
        Ok(Jitter::Decorrelated(Decorrelated { base, max, previous: Mutex::new(base) }))
    }

    /// Jitter `delay` with the thread-local RNG.
    pub fn apply(&self, delay: Duration) -> Duration {
        self.apply_with_rng(delay, &mut rng())
    }

    /// Jitter `delay` with a caller-supplied RNG.
    pub fn apply_with_rng<R: Rng>(&self, delay: Duration, rng: &mut R) -> Duration {
        match self {
            Jitter::None => delay,
            Jitter::Full => {
                let millis = millis_saturated(delay);
                if millis == 0 {
                    return Duration::ZERO;
                }
                Duration::from_millis(rng.random_range(0..=millis))
            }
            Jitter::Equal => {
                let millis = millis_saturated(delay);
                if millis == 0 {
                    return Duration::ZERO;
                }
                Duration::from_millis(rng.random_range(millis / 2..=millis))
            }
            Jitter::Decorrelated(state) => {
                let base = millis_saturated(state.base);
                let max = millis_saturated(state.max);
                let mut previous =
                    state.previous.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                let upper = millis_saturated(*previous).saturating_mul(3).min(max);
                let lower = base.min(upper);
                *previous = Duration::from_millis(rng.random_range(lower..=upper));
                *previous
            }
        }
    }
}

fn millis_saturated(duration: Duration) -> u64 {
    duration.as_millis().try_into().unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn none_is_identity() {
        assert_eq!(Jitter::None.apply(Duration::from_secs(1)), Duration::from_secs(1));
    }

    #[test]
    fn full_and_equal_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let delay = Duration::from_millis(1000);
        for _ in 0..100 {
            assert!(Jitter::full().apply_with_rng(delay, &mut rng) <= delay);
            let equal = Jitter::equal().apply_with_rng(delay, &mut rng);
            assert!(equal >= Duration::from_millis(500) && equal <= delay);
        }
    }

    #[test]
    fn zero_delay_stays_zero() {
        assert_eq!(Jitter::full().apply(Duration::ZERO), Duration::ZERO);
        assert_eq!(Jitter::equal().apply(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn decorrelated_grows_from_previous_and_respects_bounds() {
        let mut rng = StdRng::seed_from_u64(123);
        let jitter = Jitter::decorrelated(Duration::from_millis(100), Duration::from_secs(10)).unwrap();

        let first = jitter.apply_with_rng(Duration::ZERO, &mut rng);
        assert!(first >= Duration::from_millis(100) && first <= Duration::from_millis(300));

        let upper = (first.as_millis() * 3).min(10_000);
        let second = jitter.apply_with_rng(Duration::ZERO, &mut rng);
        assert!(second.as_millis() >= 100 && second.as_millis() <= upper);
    }

    #[test]
    fn decorrelated_rejects_inverted_bounds() {
        let err = Jitter::decorrelated(Duration::from_secs(5), Duration::from_secs(1)).unwrap_err();
        assert_eq!(
            err,
            JitterError::BaseExceedsMax { base: Duration::from_secs(5), max: Duration::from_secs(1) }
        );
    }
}
