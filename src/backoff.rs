//! Delay curves for [`Pause`](crate::Pause).
//!
//! A pause asks its [`Backoff`] how long to wait after the 1-based attempt that just failed.
//! Attempt `0` has no failure behind it, so it never waits.
//!
//! ```rust
//! use std::time::Duration;
//! use failsafe::Backoff;
//!
//! let curve = Backoff::exponential(Duration::from_millis(50)).with_max(Duration::from_millis(300))?;
//! let waits: Vec<_> = (1..=5).map(|attempt| curve.delay(attempt).as_millis()).collect();
//! assert_eq!(waits, vec![50, 100, 200, 300, 300]);
//! # Ok::<(), failsafe::BackoffError>(())
//! ```
//!
//! No curve ever asks for more than [`MAX_PAUSE`].

use std::time::Duration;

/// Longest delay any curve produces (one day).
pub const MAX_PAUSE: Duration = Duration::from_secs(24 * 60 * 60);

/// Rejected cap passed to [`Backoff::with_max`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackoffError {
    #[error("a constant pause has nothing to cap")]
    FlatCurve,
    #[error("pause cap must be non-zero")]
    ZeroCap,
    #[error("pause cap {cap:?} is shorter than the first delay {first:?}")]
    CapBelowFirstDelay { first: Duration, cap: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Curve {
    Constant(Duration),
    Linear(Duration),
    Exponential(Duration),
}

/// Delay curve keyed by the failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backoff {
    curve: Curve,
    cap: Option<Duration>,
}

impl Backoff {
    /// Wait `delay` after every failure.
    pub fn constant(delay: Duration) -> Self {
        Self { curve: Curve::Constant(delay), cap: None }
    }

    /// Wait `step` after the first failure, `2 * step` after the second, and so on.
    pub fn linear(step: Duration) -> Self {
        Self { curve: Curve::Linear(step), cap: None }
    }

    /// Wait `first` after the first failure, doubling after each further one.
    pub fn exponential(first: Duration) -> Self {
        Self { curve: Curve::Exponential(first), cap: None }
    }

    /// Never wait longer than `cap`. Only growing curves accept a cap.
    pub fn with_max(mut self, cap: Duration) -> Result<Self, BackoffError> {
        let first = match self.curve {
            Curve::Constant(_) => return Err(BackoffError::FlatCurve),
            Curve::Linear(first) | Curve::Exponential(first) => first,
        };
        if cap.is_zero() {
            return Err(BackoffError::ZeroCap);
        }
        if cap < first {
            return Err(BackoffError::CapBelowFirstDelay { first, cap });
        }
        self.cap = Some(cap);
        Ok(self)
    }

    /// Delay after `attempt` failed.
    pub fn delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let uncapped = match self.curve {
            Curve::Constant(delay) => Some(delay),
            Curve::Linear(step) => step.checked_mul(attempt),
            Curve::Exponential(first) => 1u32
                .checked_shl(attempt - 1)
                .and_then(|factor| first.checked_mul(factor)),
        }
        .unwrap_or(MAX_PAUSE);
        self.cap.map_or(uncapped, |cap| uncapped.min(cap)).min(MAX_PAUSE)
    }
}
