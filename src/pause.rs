//! Attempt-aware delays between retries.
//!
//! A [`Pause`] combines a [`Backoff`] curve, [`Jitter`], and a caller-supplied [`Sleeper`].
//! Attached to a link with [`Link::pause`](crate::Link::pause), it hands
//! `jitter(backoff.delay(attempt))` to the sleeper after the link's modifier, on attempts the
//! link retries. The crate never picks a sleeper on the caller's behalf.
//!
//! ```rust
//! use failsafe::{Backoff, Jitter, Pause, TrackingSleeper};
//! use std::time::Duration;
//!
//! let sleeper = TrackingSleeper::new();
//! let pause = Pause::new(Backoff::linear(Duration::from_millis(10)), sleeper.clone())
//!     .with_jitter(Jitter::None);
//! pause.wait(3);
//! assert_eq!(sleeper.calls(), vec![Duration::from_millis(30)]);
//! ```

use crate::{Backoff, Jitter, Sleeper};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct Pause {
    backoff: Backoff,
    jitter: Jitter,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for Pause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pause")
            .field("backoff", &self.backoff)
            .field("jitter", &self.jitter)
            .field("sleeper", &"<sleeper>")
            .finish()
    }
}

impl Pause {
    /// Pause with no jitter that waits through `sleeper`.
    pub fn new<S>(backoff: Backoff, sleeper: S) -> Self
    where
        S: Sleeper + 'static,
    {
        Self { backoff, jitter: Jitter::None, sleeper: Arc::new(sleeper) }
    }

    pub fn with_jitter(mut self, jitter: Jitter) -> Self {
        self.jitter = jitter;
        self
    }

    /// Replace the sleeper.
    pub fn with_sleeper<S>(mut self, sleeper: S) -> Self
    where
        S: Sleeper + 'static,
    {
        self.sleeper = Arc::new(sleeper);
        self
    }

    /// Delay that would follow a failure on `attempt`.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.jitter.apply(self.backoff.delay(attempt))
    }

    /// Block for the delay that follows a failure on `attempt`.
    pub fn wait(&self, attempt: u32) {
        let delay = self.delay(attempt);
        if delay.is_zero() {
            return;
        }
        tracing::trace!(attempt, delay_ms = delay.as_millis() as u64, "failsafe pause");
        self.sleeper.sleep(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TrackingSleeper;

    #[test]
    fn waits_follow_the_backoff_curve() {
        let sleeper = TrackingSleeper::new();
        let pause = Pause::new(Backoff::exponential(Duration::from_millis(100)), sleeper.clone());
        for attempt in 1..=3 {
            pause.wait(attempt);
        }
        assert_eq!(
            sleeper.calls(),
            vec![Duration::from_millis(100), Duration::from_millis(200), Duration::from_millis(400)]
        );
    }

    #[test]
    fn waits_go_only_to_the_supplied_sleeper() {
        let first = TrackingSleeper::new();
        let second = TrackingSleeper::new();
        let pause = Pause::new(Backoff::constant(Duration::from_millis(7)), first.clone())
            .with_sleeper(second.clone());
        pause.wait(1);
        assert!(first.calls().is_empty());
        assert_eq!(second.calls(), vec![Duration::from_millis(7)]);
    }

    #[test]
    fn zero_delays_do_not_reach_the_sleeper() {
        let sleeper = TrackingSleeper::new();
        let pause = Pause::new(Backoff::constant(Duration::ZERO), sleeper.clone());
        pause.wait(1);
        pause.wait(0);
        assert!(sleeper.calls().is_empty());
    }

    #[test]
    fn jitter_bounds_the_delay() {
        let pause = Pause::new(Backoff::constant(Duration::from_millis(50)), crate::InstantSleeper)
            .with_jitter(Jitter::full());
        for attempt in 1..20 {
            assert!(pause.delay(attempt) <= Duration::from_millis(50));
        }
    }
}
