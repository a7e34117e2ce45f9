//! Outcome algebra driving the retry loop.
//!
//! Every reaction in a handler chain resolves to an [`Outcome`]. Outcomes are folded left to
//! right with [`Outcome::combine`], seeded with [`Outcome::Stop`].
//!
//! Rules, evaluated in order:
//! 1. If neither operand is `Suppressed` and either is `Propagate`, the result is `Propagate`.
//! 2. Otherwise, if either operand is `Continue`, the result is `Continue`.
//! 3. Otherwise the result is `Stop`.
//!
//! `combine` never yields `Suppressed`, so a completed fold is always `Continue`, `Stop`, or
//! `Propagate`.
//!
//! ```rust
//! use failsafe::Outcome;
//!
//! assert_eq!(Outcome::Stop.combine(Outcome::Continue), Outcome::Continue);
//! assert_eq!(Outcome::Propagate.combine(Outcome::Continue), Outcome::Propagate);
//! assert_eq!(Outcome::Propagate.combine(Outcome::Suppressed), Outcome::Stop);
//! ```

use std::fmt;

/// Decision produced by a reaction or by a folded handler chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Outcome {
    /// Invoke the protected operation again.
    Continue,
    /// Terminate; the failure is absorbed.
    Stop,
    /// Terminate; the failure is re-raised to the caller.
    Propagate,
    /// The failure was handled and deliberately not escalated. Only meaningful as a fold operand.
    Suppressed,
}

impl Outcome {
    /// Combine two outcomes. Pure and total.
    pub fn combine(self, other: Outcome) -> Outcome {
        use Outcome::*;

        let suppressed = self == Suppressed || other == Suppressed;
        if !suppressed && (self == Propagate || other == Propagate) {
            return Propagate;
        }
        if self == Continue || other == Continue {
            return Continue;
        }
        Stop
    }

    /// Left fold over `outcomes`, seeded with `Stop`. Does not short-circuit.
    pub fn fold<I>(outcomes: I) -> Outcome
    where
        I: IntoIterator<Item = Outcome>,
    {
        outcomes.into_iter().fold(Outcome::Stop, Outcome::combine)
    }

    /// True for the outcomes that end the retry loop.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::Continue)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Outcome::Continue => "continue",
            Outcome::Stop => "stop",
            Outcome::Propagate => "propagate",
            Outcome::Suppressed => "suppressed",
        };
        f.write_str(name)
    }
}
