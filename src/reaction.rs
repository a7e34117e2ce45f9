//! Reactions taken when a handler matches a failure.
//!
//! A [`Reaction`] resolves to an [`Outcome`] given the current 1-based attempt number. Only
//! [`Reaction::RetryBudget`] looks at the attempt; every other variant is constant.

use crate::Outcome;
use std::fmt;

/// Configured response to a matched failure.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Reaction {
    /// Always ask for another attempt.
    Continue,
    /// Absorb the failure without escalating it.
    Suppress,
    /// A compensating step ran; stop retrying.
    Unwind,
    /// Stop retrying.
    Stop,
    /// Re-raise the failure.
    Propagate,
    /// Retry while `attempt < limit`, then defer to `fallback`.
    ///
    /// A `limit` of `0` or `1` never retries: the fallback resolves on the first attempt.
    RetryBudget { limit: u32, fallback: Box<Reaction> },
}

impl Reaction {
    /// Retry budget that propagates once exhausted.
    pub fn retry(limit: u32) -> Self {
        Self::retry_then(limit, Reaction::Propagate)
    }

    /// Retry budget with an explicit fallback.
    pub fn retry_then(limit: u32, fallback: Reaction) -> Self {
        Reaction::RetryBudget { limit, fallback: Box::new(fallback) }
    }

    /// Resolve this reaction for the given attempt.
    pub fn resolve(&self, attempt: u32) -> Outcome {
        match self {
            Reaction::Continue => Outcome::Continue,
            Reaction::Suppress => Outcome::Suppressed,
            Reaction::Unwind | Reaction::Stop => Outcome::Stop,
            Reaction::Propagate => Outcome::Propagate,
            Reaction::RetryBudget { limit, fallback } => {
                if attempt < *limit {
                    Outcome::Continue
                } else {
                    fallback.resolve(attempt)
                }
            }
        }
    }

    /// The attempt budget, if this is a retry reaction.
    pub fn attempt_limit(&self) -> Option<u32> {
        match self {
            Reaction::RetryBudget { limit, .. } => Some(*limit),
            _ => None,
        }
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reaction::Continue => f.write_str("continue"),
            Reaction::Suppress => f.write_str("suppress"),
            Reaction::Unwind => f.write_str("unwind"),
            Reaction::Stop => f.write_str("stop"),
            Reaction::Propagate => f.write_str("propagate"),
            Reaction::RetryBudget { limit, fallback } => {
                write!(f, "retry(limit={}, then {})", limit, fallback)
            }
        }
    }
}
